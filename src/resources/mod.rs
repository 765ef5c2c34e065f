//! Process resource sampling and reporting
//!
//! Everything here runs synchronously inside a gesture handler: resolve the
//! processes belonging to the focused program, sample them once, format a
//! sentence and hand it back for speaking.

pub mod cores;
pub mod format;
pub mod probe;
pub mod report;

pub use probe::{ProbeError, ProcessProbe, SysinfoProbe};
pub use report::{Reporter, ReporterSettings, ResourceAction};
