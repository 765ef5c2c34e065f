//! espeak-ng subprocess backend
//!
//! Each utterance spawns one espeak-ng process; cancelling kills it. Audio
//! goes wherever espeak-ng sends it (PulseAudio under WSLg).

use crate::speech::Synth;
use crate::{ReporterError, Result};
use log::{debug, error, info};
use std::process::{Child, Command, Stdio};

const WSLG_PULSE_PATH: &str = "/mnt/wslg/PulseServer";

const VOICES: &[&str] = &["en", "en-us", "en-gb", "es", "fr", "de", "it", "pt", "ru"];

pub struct EspeakSynth {
    current: Option<Child>,
    program: String,
    rate: u8,
    volume: u8,
    voice: &'static str,
}

impl EspeakSynth {
    pub fn new() -> Result<Self> {
        let program = Self::find_espeak()?;
        debug!("Found espeak-ng at {}", program);

        // WSLg exposes PulseAudio on a socket espeak-ng won't find by itself
        if std::env::var_os("PULSE_SERVER").is_none()
            && std::path::Path::new(WSLG_PULSE_PATH).exists()
        {
            info!("Using WSLg PulseAudio server at {}", WSLG_PULSE_PATH);
            std::env::set_var("PULSE_SERVER", WSLG_PULSE_PATH);
        }

        Ok(Self {
            current: None,
            program,
            rate: 50,
            volume: 80,
            voice: VOICES[0],
        })
    }

    fn find_espeak() -> Result<String> {
        for candidate in ["espeak-ng", "/usr/bin/espeak-ng"] {
            let ok = Command::new(candidate)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false);
            if ok {
                return Ok(candidate.to_string());
            }
        }
        Err(ReporterError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// 0-100 onto espeak-ng words per minute (80-450)
    fn speed(rate: u8) -> u16 {
        80 + (rate.min(100) as u16 * 370 / 100)
    }

    /// 0-100 onto espeak-ng amplitude (0-200)
    fn amplitude(volume: u8) -> u16 {
        volume.min(100) as u16 * 2
    }

    fn stop_current(&mut self) {
        if let Some(mut child) = self.current.take() {
            if child.kill().is_ok() {
                let _ = child.wait();
            }
        }
    }
}

impl Synth for EspeakSynth {
    fn set_rate(&mut self, rate: u8) -> Result<()> {
        self.rate = rate;
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.volume = volume;
        Ok(())
    }

    fn set_voice_idx(&mut self, idx: usize) -> Result<()> {
        self.voice = VOICES.get(idx).copied().unwrap_or(VOICES[0]);
        debug!("espeak-ng voice {}", self.voice);
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.stop_current();

        debug!("Speaking: {}", text);
        let child = Command::new(&self.program)
            .arg("-v")
            .arg(self.voice)
            .arg("-s")
            .arg(Self::speed(self.rate).to_string())
            .arg("-a")
            .arg(Self::amplitude(self.volume).to_string())
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                error!("Failed to spawn espeak-ng: {}", e);
                ReporterError::Speech(format!("Failed to start espeak-ng: {}", e))
            })?;
        self.current = Some(child);
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        self.stop_current();
        Ok(())
    }
}

impl Drop for EspeakSynth {
    fn drop(&mut self) {
        self.stop_current();
    }
}
