//! Speech synthesizer abstraction
//!
//! Every report ends up here. Backends differ per platform but share one
//! small trait so the rest of the program never cares which is active.

use super::backends::echo::EchoSynth;
use super::backends::espeak::EspeakSynth;
use super::backends::native::NativeSynth;
use crate::platform::is_wsl;
use crate::Result;
use log::{info, warn};

/// Speech synthesizer trait
pub trait Synth: Send {
    /// Set speech rate (0-100, where 50 is normal)
    fn set_rate(&mut self, rate: u8) -> Result<()>;

    /// Set speech volume (0-100)
    fn set_volume(&mut self, volume: u8) -> Result<()>;

    /// Set voice by index (platform-specific)
    fn set_voice_idx(&mut self, idx: usize) -> Result<()>;

    /// Speak text, interrupting nothing
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Silence current speech
    fn cancel(&mut self) -> Result<()>;
}

/// Create a platform-appropriate speech synthesizer
///
/// - WSL: espeak-ng, then native
/// - Linux: native (Speech Dispatcher), then espeak-ng
/// - Others: native
///
/// When no voice can be brought up, messages are written to the terminal
/// instead so reports are never lost.
pub fn create_synth() -> Result<Box<dyn Synth>> {
    let platform = std::env::consts::OS;
    let wsl = platform == "linux" && is_wsl();

    if wsl {
        info!("Detected WSL environment, trying espeak-ng first");
        match EspeakSynth::new() {
            Ok(synth) => return Ok(Box::new(synth)),
            Err(e) => info!("espeak-ng backend unavailable: {}", e),
        }
    }

    match NativeSynth::new() {
        Ok(synth) => {
            info!("Using native TTS backend on {}", platform);
            return Ok(Box::new(synth));
        }
        Err(e) => info!("Native TTS backend unavailable: {}", e),
    }

    if platform == "linux" && !wsl {
        match EspeakSynth::new() {
            Ok(synth) => return Ok(Box::new(synth)),
            Err(e) => info!("espeak-ng backend unavailable: {}", e),
        }
    }

    warn!("No speech backend available, reports will be printed");
    Ok(Box::new(EchoSynth::stderr()))
}
