//! Kernel-facing record sources
//!
//! [`ProcessSource`] is the seam between the snapshot collector and the
//! operating system. [`ProcFs`] reads a procfs mount; tests substitute an
//! in-memory table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::PROC_ROOT;

use super::error::{ProcessError, ProcessResult};
use super::process::RawRecord;

/// Number of leading `cpu` line fields counted towards the tick total:
/// user, nice, system, idle, iowait, irq, softirq, steal. The guest fields
/// that follow are already included in user and nice.
const CPU_TICK_FIELDS: usize = 8;

/// Source of live process data.
pub trait ProcessSource {
    /// Lists the ids of currently visible processes.
    fn list_pids(&self) -> ProcessResult<Vec<u32>>;

    /// Reads the raw record of `pid`.
    ///
    /// Returns `TransientAbsence` if the process no longer exists.
    fn read_record(&self, pid: u32) -> ProcessResult<RawRecord>;

    /// Cumulative CPU ticks across all categories since boot.
    fn total_cpu_ticks(&self) -> ProcessResult<u64>;

    /// Seconds since boot, if known.
    fn uptime_seconds(&self) -> Option<f64> {
        None
    }
}

/// [`ProcessSource`] backed by a procfs directory tree.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    /// Reads from the system's `/proc`.
    pub fn new() -> Self {
        Self::with_root(PROC_ROOT)
    }

    /// Reads from an arbitrary directory laid out like `/proc`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(name)
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource for ProcFs {
    fn list_pids(&self) -> ProcessResult<Vec<u32>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| ProcessError::io(self.root.display().to_string(), &e))?;

        let mut pids: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                name.parse::<u32>().ok().filter(|&pid| pid > 0)
            })
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn read_record(&self, pid: u32) -> ProcessResult<RawRecord> {
        let stat = match read_lossy(&self.pid_file(pid, "stat")) {
            Ok(text) => text,
            Err(e) if is_gone(&e) => return Err(ProcessError::TransientAbsence { pid }),
            Err(e) => return Err(ProcessError::io(format!("stat of process {}", pid), &e)),
        };

        // stat alone is enough to describe a process; status only adds detail
        let status = match read_lossy(&self.pid_file(pid, "status")) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("No status for process {}: {}", pid, e);
                String::new()
            }
        };

        Ok(RawRecord { stat, status })
    }

    fn total_cpu_ticks(&self) -> ProcessResult<u64> {
        let path = self.root.join("stat");
        let data = fs::read_to_string(&path)
            .map_err(|e| ProcessError::io(path.display().to_string(), &e))?;
        parse_total_cpu_ticks(&data).ok_or_else(|| ProcessError::Io {
            context: path.display().to_string(),
            message: "no aggregate cpu line".to_string(),
        })
    }

    fn uptime_seconds(&self) -> Option<f64> {
        fs::read_to_string(self.root.join("uptime"))
            .ok()?
            .split_whitespace()
            .next()?
            .parse()
            .ok()
    }
}

/// Sums the aggregate `cpu ` line of `/proc/stat`.
pub fn parse_total_cpu_ticks(data: &str) -> Option<u64> {
    let line = data.lines().find(|l| l.starts_with("cpu "))?;
    Some(
        line.split_whitespace()
            .skip(1)
            .take(CPU_TICK_FIELDS)
            .filter_map(|s| s.parse::<u64>().ok())
            .sum(),
    )
}

fn read_lossy(path: &Path) -> io::Result<String> {
    fs::read(path).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// A vanished process shows up as ENOENT or ESRCH depending on timing.
fn is_gone(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(libc::ESRCH)
}
