//! Error types for resreport

use std::io;
use thiserror::Error;

/// Main error type for resreport
#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("PTY error: {0}")]
    Pty(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Process probe error: {0}")]
    Probe(#[from] crate::resources::ProbeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for resreport operations
pub type Result<T> = std::result::Result<T, ReporterError>;

impl From<String> for ReporterError {
    fn from(s: String) -> Self {
        ReporterError::Other(s)
    }
}

impl From<&str> for ReporterError {
    fn from(s: &str) -> Self {
        ReporterError::Other(s.to_string())
    }
}

impl From<nix::errno::Errno> for ReporterError {
    fn from(e: nix::errno::Errno) -> Self {
        ReporterError::Io(io::Error::from_raw_os_error(e as i32))
    }
}
