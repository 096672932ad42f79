//! Process model and `/proc/<pid>` record parsing
//!
//! A [`Process`] is built from two raw text blobs: the positional `stat` line
//! and the keyed `status` block. Parsing is pure; the owner lookup goes through
//! an [`IdentityResolver`] supplied by the caller.

use super::error::{ProcessError, ProcessResult};
use super::identity::IdentityResolver;

/// Number of whitespace-separated fields that must follow the `(comm)` span.
const STAT_FIELDS_REQUIRED: usize = 20;

// Field positions after the closing parenthesis
const FIELD_STATE: usize = 0;
const FIELD_PPID: usize = 1;
const FIELD_UTIME: usize = 11;
const FIELD_STIME: usize = 12;
const FIELD_THREADS: usize = 17;
const FIELD_STARTTIME: usize = 19;

/// Single-character scheduler state reported by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskWait,
    Zombie,
    Stopped,
    TraceStop,
    Dead,
    Unknown,
}

impl ProcessState {
    /// Maps a kernel state code to a state.
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => ProcessState::Running,
            // 'I' is an idle kernel thread; it behaves like a sleeper
            'S' | 'I' => ProcessState::Sleeping,
            'D' => ProcessState::DiskWait,
            'Z' => ProcessState::Zombie,
            'T' => ProcessState::Stopped,
            't' => ProcessState::TraceStop,
            'X' | 'x' => ProcessState::Dead,
            _ => ProcessState::Unknown,
        }
    }

    /// The canonical one-letter code
    pub fn code(&self) -> char {
        match self {
            ProcessState::Running => 'R',
            ProcessState::Sleeping => 'S',
            ProcessState::DiskWait => 'D',
            ProcessState::Zombie => 'Z',
            ProcessState::Stopped => 'T',
            ProcessState::TraceStop => 't',
            ProcessState::Dead => 'X',
            ProcessState::Unknown => '?',
        }
    }

    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            ProcessState::Running => "Running",
            ProcessState::Sleeping => "Sleeping",
            ProcessState::DiskWait => "Disk Sleep",
            ProcessState::Zombie => "Zombie",
            ProcessState::Stopped => "Stopped",
            ProcessState::TraceStop => "Tracing",
            ProcessState::Dead => "Dead",
            ProcessState::Unknown => "Unknown",
        }
    }
}

/// Snapshot of one process at one instant.
///
/// Values from different snapshots share nothing but the pid.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Process ID
    pub pid: u32,
    /// Parent process ID (0 = no parent)
    pub ppid: u32,
    /// Executable name from the `(comm)` span
    pub name: String,
    /// Scheduler state
    pub state: ProcessState,
    /// Resolved login name, or the numeric uid as text
    pub user: String,
    /// Virtual memory size in kB
    pub vm_size_kb: u64,
    /// Resident set size in kB
    pub vm_rss_kb: u64,
    /// CPU ticks spent in user mode
    pub utime: u64,
    /// CPU ticks spent in kernel mode
    pub stime: u64,
    /// Number of threads
    pub threads: u32,
    /// Start time in ticks since boot
    pub start_tick: u64,
    /// CPU usage percentage, filled in once a baseline sample exists
    pub cpu_percent: f64,
}

impl Process {
    /// Total CPU ticks consumed so far
    pub fn cpu_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// Raw text of one process's record sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Contents of `/proc/<pid>/stat`
    pub stat: String,
    /// Contents of `/proc/<pid>/status` (empty if it could not be read)
    pub status: String,
}

/// Parses one process record into a [`Process`].
///
/// The name is taken between the first `(` and the last `)`, so names that
/// themselves contain parentheses survive intact.
pub fn parse_record(
    pid: u32,
    record: &RawRecord,
    resolver: &dyn IdentityResolver,
) -> ProcessResult<Process> {
    let stat = parse_stat(pid, &record.stat)?;
    let status = parse_status(pid, &record.status)?;

    let user = match status.uid {
        Some(uid) => resolver.resolve(uid).unwrap_or_else(|| uid.to_string()),
        None => "?".to_string(),
    };

    Ok(Process {
        pid,
        ppid: stat.ppid,
        name: stat.name,
        state: stat.state,
        user,
        vm_size_kb: status.vm_size_kb,
        vm_rss_kb: status.vm_rss_kb,
        utime: stat.utime,
        stime: stat.stime,
        threads: stat.threads,
        start_tick: stat.start_tick,
        cpu_percent: 0.0,
    })
}

/// Fields of interest from the stat line
#[derive(Debug)]
struct StatFields {
    name: String,
    state: ProcessState,
    ppid: u32,
    utime: u64,
    stime: u64,
    threads: u32,
    start_tick: u64,
}

fn parse_stat(pid: u32, line: &str) -> ProcessResult<StatFields> {
    let open = line
        .find('(')
        .ok_or_else(|| ProcessError::malformed(pid, "stat line has no '('"))?;
    let close = line
        .rfind(')')
        .ok_or_else(|| ProcessError::malformed(pid, "stat line has no ')'"))?;
    if close < open {
        return Err(ProcessError::malformed(pid, "')' precedes '(' in stat line"));
    }

    let name = line[open + 1..close].to_string();
    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    if fields.len() < STAT_FIELDS_REQUIRED {
        return Err(ProcessError::malformed(
            pid,
            format!(
                "stat line has {} fields after name, expected {}",
                fields.len(),
                STAT_FIELDS_REQUIRED
            ),
        ));
    }

    let mut state_chars = fields[FIELD_STATE].chars();
    let state = match (state_chars.next(), state_chars.next()) {
        (Some(c), None) => ProcessState::from_code(c),
        _ => return Err(ProcessError::malformed(pid, "state is not a single character")),
    };

    let threads: u32 = parse_field(pid, &fields, FIELD_THREADS, "num_threads")?;

    Ok(StatFields {
        name,
        state,
        ppid: parse_field(pid, &fields, FIELD_PPID, "ppid")?,
        utime: parse_field(pid, &fields, FIELD_UTIME, "utime")?,
        stime: parse_field(pid, &fields, FIELD_STIME, "stime")?,
        // The kernel never reports zero threads for a live task
        threads: threads.max(1),
        start_tick: parse_field(pid, &fields, FIELD_STARTTIME, "starttime")?,
    })
}

fn parse_field<T: std::str::FromStr>(
    pid: u32,
    fields: &[&str],
    index: usize,
    label: &str,
) -> ProcessResult<T> {
    fields[index]
        .parse()
        .map_err(|_| ProcessError::malformed(pid, format!("{} is not numeric: {:?}", label, fields[index])))
}

/// Fields of interest from the status block
#[derive(Debug, Default)]
struct StatusFields {
    vm_size_kb: u64,
    vm_rss_kb: u64,
    uid: Option<u32>,
}

fn parse_status(pid: u32, block: &str) -> ProcessResult<StatusFields> {
    let mut fields = StatusFields::default();

    // Later duplicates overwrite earlier ones
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "VmSize" => fields.vm_size_kb = parse_kb(pid, "VmSize", value)?,
            "VmRSS" => fields.vm_rss_kb = parse_kb(pid, "VmRSS", value)?,
            "Uid" => {
                let real = value
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| ProcessError::malformed(pid, format!("bad Uid value {:?}", value.trim())))?;
                fields.uid = Some(real);
            }
            _ => {}
        }
    }

    Ok(fields)
}

/// Parses a value such as `"   10240 kB"`.
fn parse_kb(pid: u32, key: &str, value: &str) -> ProcessResult<u64> {
    let value = value.trim();
    let number = value.strip_suffix("kB").unwrap_or(value).trim();
    number
        .parse()
        .map_err(|_| ProcessError::malformed(pid, format!("bad {} value {:?}", key, value)))
}
