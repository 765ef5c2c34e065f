//! Turn a focused process into a spoken sentence
//!
//! The reporter never fails: every error is folded into one of a few fixed
//! messages so a gesture always produces speech.

use super::cores::{accumulate, distribute};
use super::format::{average, format_cores, format_size};
use super::probe::{ProbeError, ProcessProbe};
use log::{debug, warn};
use std::time::Duration;

pub const MSG_NO_PROCESS: &str = "Cannot access program information";
pub const MSG_ACCESS_DENIED: &str = "Cannot access process (requires administrator privileges)";
pub const MSG_PROCESS_ENDED: &str = "Program is no longer running";
pub const MSG_GENERAL: &str = "Cannot get process information";

/// What a gesture asks the reporter for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    /// Usage of each logical core
    CpuCores,
    /// Mean usage across all cores
    AverageCpu,
    /// Resident memory
    Memory,
}

/// Sampling knobs, loaded from the `[sampling]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterSettings {
    /// How long a CPU measurement runs
    pub cpu_interval: Duration,
    /// Fold descendants into the focused program's numbers
    pub include_children: bool,
}

impl Default for ReporterSettings {
    fn default() -> Self {
        Self {
            cpu_interval: Duration::from_millis(250),
            include_children: true,
        }
    }
}

/// Why a report could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    NoProcess,
    Ended,
    Denied,
    General,
}

impl Failure {
    fn message(&self) -> &'static str {
        match self {
            Failure::NoProcess => MSG_NO_PROCESS,
            Failure::Ended => MSG_PROCESS_ENDED,
            Failure::Denied => MSG_ACCESS_DENIED,
            Failure::General => MSG_GENERAL,
        }
    }
}

impl From<ProbeError> for Failure {
    fn from(e: ProbeError) -> Self {
        match e {
            ProbeError::NoSuchProcess(_) => Failure::Ended,
            ProbeError::AccessDenied(_) => Failure::Denied,
            ProbeError::Other(msg) => {
                debug!("Probe failure: {}", msg);
                Failure::General
            }
        }
    }
}

/// Samples the focused program and formats the result
pub struct Reporter<P: ProcessProbe> {
    probe: P,
    settings: ReporterSettings,
}

impl<P: ProcessProbe> Reporter<P> {
    pub fn new(probe: P, settings: ReporterSettings) -> Self {
        Self { probe, settings }
    }

    pub fn settings(&self) -> &ReporterSettings {
        &self.settings
    }

    /// Produce the sentence for `action`
    ///
    /// `focused` is the result of focus resolution: `Ok(None)` when no
    /// program owns the foreground.
    pub fn report(
        &mut self,
        action: ResourceAction,
        focused: std::result::Result<Option<u32>, ProbeError>,
    ) -> String {
        let pid = match focused {
            Ok(Some(pid)) => pid,
            Ok(None) => return MSG_NO_PROCESS.to_string(),
            Err(e) => {
                warn!("Focus resolution failed: {}", e);
                return Failure::from(e).message().to_string();
            }
        };

        self.probe.refresh();
        let result = match action {
            ResourceAction::CpuCores => self.cpu_cores_report(pid),
            ResourceAction::AverageCpu => self.average_cpu_report(pid),
            ResourceAction::Memory => self.memory_report(pid),
        };

        match result {
            Ok(text) => text,
            Err(failure) => {
                warn!("{:?} report for pid {} failed: {:?}", action, pid, failure);
                failure.message().to_string()
            }
        }
    }

    /// Root pid plus live descendants; empty if the root itself is gone
    pub fn collect(&self, pid: u32) -> Vec<u32> {
        if !self.probe.is_alive(pid) {
            return Vec::new();
        }

        let mut pids = vec![pid];
        if self.settings.include_children {
            pids.extend(
                self.probe
                    .descendants(pid)
                    .into_iter()
                    .filter(|child| self.probe.is_alive(*child)),
            );
        }
        debug!("Collected {} processes for pid {}", pids.len(), pid);
        pids
    }

    fn program_name(&self, pid: u32) -> Result<String, Failure> {
        if !self.probe.is_alive(pid) {
            return Err(Failure::NoProcess);
        }
        self.probe.name(pid).ok_or(Failure::NoProcess)
    }

    fn memory_report(&mut self, pid: u32) -> Result<String, Failure> {
        let name = self.program_name(pid)?;

        let mut total: u64 = 0;
        for member in self.collect(pid) {
            // Members can exit between listing and reading; skip them
            match self.probe.memory(member) {
                Ok(bytes) => total = total.saturating_add(bytes),
                Err(ProbeError::NoSuchProcess(_)) => continue,
                Err(e) if member == pid => return Err(e.into()),
                Err(e) => debug!("Skipping pid {}: {}", member, e),
            }
        }

        if total == 0 {
            return Err(Failure::Ended);
        }
        Ok(format!(
            "{} is using {} of physical ram",
            name,
            format_size(total)
        ))
    }

    /// Per-core usage summed over all members of the program
    fn sample_cores(&mut self, pid: u32) -> Result<Vec<f32>, Failure> {
        let members = self.collect(pid);
        if members.is_empty() {
            return Err(Failure::NoProcess);
        }

        let cores = self.probe.logical_cores();
        let samples = self
            .probe
            .cpu_percent(&members, self.settings.cpu_interval)?;
        if samples.is_empty() {
            return Err(Failure::Ended);
        }

        let mut all_cores = Vec::with_capacity(cores);
        for (_, percent) in samples {
            accumulate(&mut all_cores, &distribute(percent, cores));
        }
        Ok(all_cores)
    }

    fn cpu_cores_report(&mut self, pid: u32) -> Result<String, Failure> {
        let name = self.program_name(pid)?;
        let cores = self.sample_cores(pid)?;
        Ok(format!("{}, CPU Usage: {}", name, format_cores(&cores)))
    }

    fn average_cpu_report(&mut self, pid: u32) -> Result<String, Failure> {
        let name = self.program_name(pid)?;
        let cores = self.sample_cores(pid)?;
        Ok(format!(
            "{}, Average CPU Usage: {:.1}%",
            name,
            average(&cores)
        ))
    }
}
