//! Point-in-time process snapshots
//!
//! A [`Collector`] enumerates processes through a [`ProcessSource`], parses
//! each record and drops the ones that fail. CPU percentages need two
//! snapshots and are filled in by [`Snapshot::apply_cpu_percent`].

use std::collections::HashMap;
use std::time::Instant;

use super::error::{ProcessError, ProcessResult};
use super::identity::IdentityResolver;
use super::process::{parse_record, Process};
use super::source::ProcessSource;

/// Processes captured together, ordered by ascending pid.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Captured processes
    pub processes: Vec<Process>,
    /// Monotonic capture time
    pub captured_at: Instant,
    /// System-wide CPU ticks at capture time
    pub total_cpu_ticks: u64,
    /// Seconds since boot at capture time
    pub uptime_seconds: Option<f64>,
}

impl Snapshot {
    /// An empty snapshot, used before the first collection.
    pub fn empty() -> Self {
        Self {
            processes: Vec::new(),
            captured_at: Instant::now(),
            total_cpu_ticks: 0,
            uptime_seconds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Looks up a process by pid.
    pub fn find(&self, pid: u32) -> Option<&Process> {
        self.processes
            .binary_search_by_key(&pid, |p| p.pid)
            .ok()
            .map(|i| &self.processes[i])
    }

    /// Computes each process's CPU percentage against `prev`.
    ///
    /// A pid with no prior sample, or whose start tick changed (the pid was
    /// reused), gets 0 until the next refresh.
    pub fn apply_cpu_percent(&mut self, prev: &Snapshot) {
        let total_delta = self.total_cpu_ticks.saturating_sub(prev.total_cpu_ticks);

        let baseline: HashMap<u32, (u64, u64)> = prev
            .processes
            .iter()
            .map(|p| (p.pid, (p.start_tick, p.cpu_ticks())))
            .collect();

        for process in &mut self.processes {
            process.cpu_percent = match baseline.get(&process.pid) {
                Some(&(start, ticks)) if start == process.start_tick => {
                    cpu_percent(ticks, process.cpu_ticks(), total_delta)
                }
                _ => 0.0,
            };
        }
    }
}

/// `100 * process tick delta / total tick delta`, clamped to `[0, 100]`.
pub fn cpu_percent(prev_ticks: u64, now_ticks: u64, total_delta: u64) -> f64 {
    if total_delta == 0 {
        return 0.0;
    }
    let process_delta = now_ticks.saturating_sub(prev_ticks);
    (100.0 * process_delta as f64 / total_delta as f64).clamp(0.0, 100.0)
}

/// Builds [`Snapshot`]s from a process source.
pub struct Collector {
    source: Box<dyn ProcessSource>,
    resolver: Box<dyn IdentityResolver>,
}

impl Collector {
    pub fn new(source: Box<dyn ProcessSource>, resolver: Box<dyn IdentityResolver>) -> Self {
        Self { source, resolver }
    }

    /// Captures a new snapshot.
    ///
    /// Only a failure to enumerate pids fails the whole collection; individual
    /// processes that vanish or fail to parse are skipped.
    pub fn collect(&self) -> ProcessResult<Snapshot> {
        let total_cpu_ticks = match self.source.total_cpu_ticks() {
            Ok(ticks) => ticks,
            Err(e) => {
                log::warn!("CPU tick total unavailable: {}", e);
                0
            }
        };

        let pids = self.source.list_pids()?;
        let mut processes = Vec::with_capacity(pids.len());
        let mut skipped = 0usize;

        for pid in pids {
            let parsed = self
                .source
                .read_record(pid)
                .and_then(|record| parse_record(pid, &record, self.resolver.as_ref()));

            match parsed {
                Ok(process) => processes.push(process),
                Err(ProcessError::TransientAbsence { pid }) => {
                    log::debug!("Process {} exited during collection", pid);
                }
                Err(e) => {
                    skipped += 1;
                    log::warn!("Skipping process {}: {}", pid, e);
                }
            }
        }

        processes.sort_by_key(|p| p.pid);
        processes.dedup_by_key(|p| p.pid);

        if skipped > 0 {
            log::debug!("Collected {} processes, skipped {}", processes.len(), skipped);
        }

        Ok(Snapshot {
            processes,
            captured_at: Instant::now(),
            total_cpu_ticks,
            uptime_seconds: self.source.uptime_seconds(),
        })
    }
}
