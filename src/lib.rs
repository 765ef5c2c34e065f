//! resreport - focused program resource reporter
//!
//! Runs a shell inside a pseudo-terminal and, on Alt-key gestures, speaks
//! the CPU and memory usage of whatever program currently owns the
//! terminal foreground.

pub mod error;
pub mod input;
pub mod platform;
pub mod resources;
pub mod speech;
pub mod state;
pub mod terminal;

pub use error::{ReporterError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "resreport";
