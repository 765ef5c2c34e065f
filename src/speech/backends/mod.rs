//! Speech backends

// Native TTS via the tts crate (Speech Dispatcher, AVFoundation, ...)
pub mod native;

// espeak-ng subprocess, used on WSL and when Speech Dispatcher is missing
pub mod espeak;

// Writes messages to the terminal when no voice is available
pub mod echo;
