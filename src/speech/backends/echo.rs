//! Text fallback backend
//!
//! Writes each message on its own line. The terminal is in raw mode while
//! the host runs, so lines end with CRLF.

use crate::speech::Synth;
use crate::Result;
use std::io::{self, Write};

pub struct EchoSynth<W: Write + Send> {
    out: W,
}

impl EchoSynth<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> EchoSynth<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Synth for EchoSynth<W> {
    fn set_rate(&mut self, _rate: u8) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: u8) -> Result<()> {
        Ok(())
    }

    fn set_voice_idx(&mut self, _idx: usize) -> Result<()> {
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        write!(self.out, "\r\n[{}] {}\r\n", crate::APP_NAME, text)?;
        self.out.flush()?;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_writes_line() {
        let mut synth = EchoSynth::new(Vec::new());
        synth.speak("firefox is using 1.0 GB of physical ram").unwrap();
        synth.speak("").unwrap();

        let out = String::from_utf8(synth.into_inner()).unwrap();
        assert_eq!(out, "\r\n[resreport] firefox is using 1.0 GB of physical ram\r\n");
    }
}
