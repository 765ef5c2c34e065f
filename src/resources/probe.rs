//! Operating system process queries
//!
//! `ProcessProbe` is the boundary between the reporter and the OS. The
//! production implementation sits on `sysinfo`; tests substitute a fake
//! with fixed numbers.

use log::{debug, trace};
use std::collections::HashMap;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use thiserror::Error;

/// Failure while reading statistics for a process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("process {0} no longer exists")]
    NoSuchProcess(u32),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("{0}")]
    Other(String),
}

/// Read-only view of OS process statistics
pub trait ProcessProbe {
    /// Refresh the process table. Called once at the start of each report.
    fn refresh(&mut self);

    /// Executable name of a process
    fn name(&self, pid: u32) -> Option<String>;

    /// True when the process exists and is running, sleeping, in disk
    /// sleep or waking
    fn is_alive(&self, pid: u32) -> bool;

    /// All descendants of `pid` (children, grandchildren, ...)
    fn descendants(&self, pid: u32) -> Vec<u32>;

    /// Resident set size in bytes
    fn memory(&self, pid: u32) -> Result<u64, ProbeError>;

    /// Number of logical CPUs
    fn logical_cores(&self) -> usize;

    /// Measure CPU usage of `pids` over `interval`
    ///
    /// Values are process-wide percentages, so a process saturating two
    /// cores reports 200. Processes that vanish during the measurement are
    /// left out of the result.
    fn cpu_percent(
        &mut self,
        pids: &[u32],
        interval: Duration,
    ) -> Result<Vec<(u32, f32)>, ProbeError>;
}

/// Statuses in which a process is considered alive for reporting
pub fn is_reportable_status(status: ProcessStatus) -> bool {
    matches!(
        status,
        ProcessStatus::Run
            | ProcessStatus::Sleep
            | ProcessStatus::UninterruptibleDiskSleep
            | ProcessStatus::Waking
    )
}

/// Walk a parent table breadth first and collect every descendant of `root`
pub fn descendants_of<I>(root: u32, parents: I) -> Vec<u32>
where
    I: IntoIterator<Item = (u32, Option<u32>)>,
{
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for (pid, parent) in parents {
        if let Some(parent) = parent {
            if parent != pid {
                children.entry(parent).or_default().push(pid);
            }
        }
    }

    let mut found = Vec::new();
    let mut queue = vec![root];
    while let Some(pid) = queue.pop() {
        if let Some(kids) = children.remove(&pid) {
            for kid in kids {
                if kid != root {
                    found.push(kid);
                    queue.push(kid);
                }
            }
        }
    }
    found.sort_unstable();
    found
}

/// `ProcessProbe` backed by a persistent `sysinfo::System`
pub struct SysinfoProbe {
    sys: System,
    cores: usize,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_list(CpuRefreshKind::nothing());
        let cores = sys.cpus().len().max(1);
        debug!("sysinfo probe ready, {} logical cores", cores);
        Self { sys, cores }
    }

    fn refresh_kind() -> ProcessRefreshKind {
        ProcessRefreshKind::nothing().with_cpu().with_memory()
    }

    fn lookup(&self, pid: u32) -> Option<&sysinfo::Process> {
        self.sys.process(Pid::from_u32(pid))
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProbe {
    fn refresh(&mut self) {
        let count =
            self.sys
                .refresh_processes_specifics(ProcessesToUpdate::All, true, Self::refresh_kind());
        trace!("Refreshed {} processes", count);
    }

    fn name(&self, pid: u32) -> Option<String> {
        self.lookup(pid)
            .map(|p| p.name().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.lookup(pid)
            .map(|p| is_reportable_status(p.status()))
            .unwrap_or(false)
    }

    fn descendants(&self, pid: u32) -> Vec<u32> {
        // Linux lists threads as tasks; only real processes count as children
        let table = self
            .sys
            .processes()
            .iter()
            .filter(|(_, p)| p.thread_kind().is_none())
            .map(|(pid, p)| (pid.as_u32(), p.parent().map(|pp| pp.as_u32())));
        descendants_of(pid, table)
    }

    fn memory(&self, pid: u32) -> Result<u64, ProbeError> {
        self.lookup(pid)
            .map(|p| p.memory())
            .ok_or(ProbeError::NoSuchProcess(pid))
    }

    fn logical_cores(&self) -> usize {
        self.cores
    }

    fn cpu_percent(
        &mut self,
        pids: &[u32],
        interval: Duration,
    ) -> Result<Vec<(u32, f32)>, ProbeError> {
        let targets: Vec<Pid> = pids.iter().copied().map(Pid::from_u32).collect();

        // cpu_usage() is relative to the previous refresh, so take a baseline
        // and then measure over the interval
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&targets),
            true,
            Self::refresh_kind(),
        );
        std::thread::sleep(interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&targets),
            true,
            Self::refresh_kind(),
        );

        let usage: Vec<(u32, f32)> = targets
            .iter()
            .filter_map(|pid| self.sys.process(*pid).map(|p| (pid.as_u32(), p.cpu_usage())))
            .collect();

        debug!("CPU sample for {:?}: {:?}", pids, usage);
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendants_of_tree() {
        // 1 -> 10 -> 100, 1 -> 11, 2 -> 20
        let table = vec![
            (1, None),
            (10, Some(1)),
            (11, Some(1)),
            (100, Some(10)),
            (2, None),
            (20, Some(2)),
        ];
        assert_eq!(descendants_of(1, table.clone()), vec![10, 11, 100]);
        assert_eq!(descendants_of(10, table.clone()), vec![100]);
        assert_eq!(descendants_of(100, table), Vec::<u32>::new());
    }

    #[test]
    fn test_descendants_of_ignores_cycles() {
        let table = vec![(1, Some(2)), (2, Some(1)), (3, Some(3))];
        assert_eq!(descendants_of(1, table), vec![2]);
    }

    #[test]
    fn test_reportable_status() {
        assert!(is_reportable_status(ProcessStatus::Run));
        assert!(is_reportable_status(ProcessStatus::Sleep));
        assert!(!is_reportable_status(ProcessStatus::Zombie));
        assert!(!is_reportable_status(ProcessStatus::Dead));
    }

    #[test]
    fn test_sysinfo_probe_sees_itself() {
        let mut probe = SysinfoProbe::new();
        probe.refresh();
        let me = std::process::id();

        assert!(probe.name(me).is_some());
        assert!(probe.is_alive(me));
        assert!(probe.memory(me).unwrap_or(0) > 0);
        assert!(probe.logical_cores() >= 1);
    }

    #[test]
    fn test_sysinfo_probe_cpu_sample() {
        let mut probe = SysinfoProbe::new();
        probe.refresh();
        let me = std::process::id();

        let usage = probe
            .cpu_percent(&[me], Duration::from_millis(250))
            .expect("sample own process");
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].0, me);
        assert!(usage[0].1 >= 0.0);
    }

    #[test]
    fn test_sysinfo_probe_unknown_pid() {
        let mut probe = SysinfoProbe::new();
        probe.refresh();
        // PIDs are bounded well below u32::MAX on every supported platform
        let bogus = u32::MAX - 1;
        assert!(probe.name(bogus).is_none());
        assert!(!probe.is_alive(bogus));
        assert_eq!(probe.memory(bogus), Err(ProbeError::NoSuchProcess(bogus)));
    }
}
