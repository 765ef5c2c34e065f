//! Native TTS backend using the tts crate
//!
//! Speech Dispatcher on Linux, AVFoundation on macOS, SAPI/WinRT on Windows.

use crate::speech::Synth;
use crate::{ReporterError, Result};
use log::{debug, error, warn};
use tts::Tts;

pub struct NativeSynth {
    tts: Tts,
}

impl NativeSynth {
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");
        let tts = Tts::default()
            .map_err(|e| ReporterError::Speech(format!("Failed to initialize TTS: {}", e)))?;
        Ok(Self { tts })
    }

    /// Map 0-100 onto the engine's own rate range
    fn convert_rate(&self, rate: u8) -> f32 {
        let min = self.tts.min_rate();
        let max = self.tts.max_rate();
        min + (max - min) * (rate.min(100) as f32 / 100.0)
    }

    /// Map 0-100 onto the engine's own volume range
    fn convert_volume(&self, volume: u8) -> f32 {
        let min = self.tts.min_volume();
        let max = self.tts.max_volume();
        min + (max - min) * (volume.min(100) as f32 / 100.0)
    }
}

impl Synth for NativeSynth {
    fn set_rate(&mut self, rate: u8) -> Result<()> {
        debug!("Setting rate to {}", rate);
        if !self.tts.supported_features().rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let converted = self.convert_rate(rate);
        self.tts
            .set_rate(converted)
            .map_err(|e| ReporterError::Speech(format!("Failed to set rate: {}", e)))?;
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        debug!("Setting volume to {}", volume);
        if !self.tts.supported_features().volume {
            warn!("Volume control not supported on this platform");
            return Ok(());
        }

        let converted = self.convert_volume(volume);
        self.tts
            .set_volume(converted)
            .map_err(|e| ReporterError::Speech(format!("Failed to set volume: {}", e)))?;
        Ok(())
    }

    fn set_voice_idx(&mut self, idx: usize) -> Result<()> {
        if !self.tts.supported_features().voice {
            warn!("Voice selection not supported on this platform");
            return Ok(());
        }

        let voices = self
            .tts
            .voices()
            .map_err(|e| ReporterError::Speech(format!("Failed to get voices: {}", e)))?;

        match voices.get(idx) {
            Some(voice) => {
                debug!("Selecting voice {}: {}", idx, voice.name());
                self.tts
                    .set_voice(voice)
                    .map_err(|e| ReporterError::Speech(format!("Failed to set voice: {}", e)))?;
            }
            None => warn!(
                "Voice index {} out of range (have {} voices)",
                idx,
                voices.len()
            ),
        }
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        self.tts.speak(text, false).map_err(|e| {
            error!("Failed to speak: {}", e);
            ReporterError::Speech(format!("Speak failed: {}", e))
        })?;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            ReporterError::Speech(format!("Cancel failed: {}", e))
        })?;
        Ok(())
    }
}
