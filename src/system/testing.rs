//! In-memory fakes shared by unit tests

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use super::control::{validate_nice, validate_pid, ProcessControl, SignalKind};
use super::error::{ProcessError, ProcessResult};
use super::identity::IdentityResolver;
use super::process::{Process, ProcessState, RawRecord};
use super::source::ProcessSource;

/// Formats a kernel-shaped stat line.
pub fn stat_line(pid: u32, name: &str, state: char, ppid: u32, utime: u64, stime: u64) -> String {
    stat_line_with_start(pid, name, state, ppid, utime, stime, 100)
}

pub fn stat_line_with_start(
    pid: u32,
    name: &str,
    state: char,
    ppid: u32,
    utime: u64,
    stime: u64,
    start: u64,
) -> String {
    format!(
        "{pid} ({name}) {state} {ppid} {pid} {pid} 0 -1 4194304 0 0 0 0 \
         {utime} {stime} 0 0 20 0 1 0 {start} 1000000 100"
    )
}

/// Formats a status block with the three keys the parser reads.
pub fn status_block(vm_size_kb: u64, vm_rss_kb: u64, uid: u32) -> String {
    format!(
        "Name:\tx\nState:\tS (sleeping)\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\n\
         VmSize:\t{vm_size_kb} kB\nVmRSS:\t{vm_rss_kb} kB\nThreads:\t1\n"
    )
}

/// Builds a process value directly.
pub fn process(pid: u32, ppid: u32, name: &str) -> Process {
    Process {
        pid,
        ppid,
        name: name.to_string(),
        state: ProcessState::Sleeping,
        user: "root".to_string(),
        vm_size_kb: 0,
        vm_rss_kb: 0,
        utime: 0,
        stime: 0,
        threads: 1,
        start_tick: 100,
        cpu_percent: 0.0,
    }
}

/// One process in a [`FakeProcTable`].
#[derive(Debug, Clone)]
pub struct FakeProc {
    pub ppid: u32,
    pub name: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub start: u64,
    pub vm_rss_kb: u64,
    pub uid: u32,
    raw: Option<RawRecord>,
}

#[derive(Debug, Default)]
struct TableInner {
    procs: BTreeMap<u32, FakeProc>,
    listed_only: BTreeSet<u32>,
    total_ticks: u64,
    fail_enumeration: bool,
}

/// Mutable in-memory process table; clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeProcTable {
    inner: Rc<RefCell<TableInner>>,
}

impl FakeProcTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, pid: u32, ppid: u32, name: &str) {
        self.add_with_start(pid, ppid, name, 100);
    }

    pub fn add_with_start(&self, pid: u32, ppid: u32, name: &str, start: u64) {
        self.inner.borrow_mut().procs.insert(
            pid,
            FakeProc {
                ppid,
                name: name.to_string(),
                state: 'S',
                utime: 0,
                stime: 0,
                start,
                vm_rss_kb: 0,
                uid: 0,
                raw: None,
            },
        );
    }

    /// Adds a process whose record text is used verbatim.
    pub fn add_raw(&self, pid: u32, stat: &str, status: &str) {
        self.add(pid, 0, "");
        self.update(pid, |p| {
            p.raw = Some(RawRecord {
                stat: stat.to_string(),
                status: status.to_string(),
            })
        });
    }

    /// Lists a pid whose record cannot be read, as if it exited mid-scan.
    pub fn add_listed_only(&self, pid: u32) {
        self.inner.borrow_mut().listed_only.insert(pid);
    }

    pub fn remove(&self, pid: u32) {
        self.inner.borrow_mut().procs.remove(&pid);
    }

    pub fn update(&self, pid: u32, f: impl FnOnce(&mut FakeProc)) {
        if let Some(p) = self.inner.borrow_mut().procs.get_mut(&pid) {
            f(p);
        }
    }

    pub fn set_ticks(&self, pid: u32, utime: u64, stime: u64) {
        self.update(pid, |p| {
            p.utime = utime;
            p.stime = stime;
        });
    }

    pub fn set_total_ticks(&self, ticks: u64) {
        self.inner.borrow_mut().total_ticks = ticks;
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.inner.borrow_mut().fail_enumeration = fail;
    }
}

impl ProcessSource for FakeProcTable {
    fn list_pids(&self) -> ProcessResult<Vec<u32>> {
        let inner = self.inner.borrow();
        if inner.fail_enumeration {
            return Err(ProcessError::Io {
                context: "fake proc".to_string(),
                message: "enumeration disabled".to_string(),
            });
        }
        let mut pids: Vec<u32> = inner.procs.keys().chain(inner.listed_only.iter()).copied().collect();
        pids.sort_unstable();
        pids.dedup();
        Ok(pids)
    }

    fn read_record(&self, pid: u32) -> ProcessResult<RawRecord> {
        let inner = self.inner.borrow();
        let p = inner
            .procs
            .get(&pid)
            .ok_or(ProcessError::TransientAbsence { pid })?;
        if let Some(raw) = &p.raw {
            return Ok(raw.clone());
        }
        Ok(RawRecord {
            stat: stat_line_with_start(pid, &p.name, p.state, p.ppid, p.utime, p.stime, p.start),
            status: status_block(p.vm_rss_kb * 2, p.vm_rss_kb, p.uid),
        })
    }

    fn total_cpu_ticks(&self) -> ProcessResult<u64> {
        Ok(self.inner.borrow().total_ticks)
    }

    fn uptime_seconds(&self) -> Option<f64> {
        Some(3_700.0)
    }
}

/// Fixed uid to name table.
#[derive(Debug, Default)]
pub struct FakeResolver {
    names: HashMap<u32, String>,
}

impl FakeResolver {
    pub fn with(entries: &[(u32, &str)]) -> Self {
        Self {
            names: entries.iter().map(|(uid, n)| (*uid, n.to_string())).collect(),
        }
    }
}

impl IdentityResolver for FakeResolver {
    fn resolve(&self, uid: u32) -> Option<String> {
        self.names.get(&uid).cloned()
    }
}

/// A call recorded by [`FakeControl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCall {
    Signal(u32, SignalKind),
    Priority(u32, i32),
}

#[derive(Debug, Default)]
struct ControlInner {
    calls: Vec<ControlCall>,
    failure: Option<ProcessError>,
    table: Option<FakeProcTable>,
}

/// Control surface that records calls; clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeControl {
    inner: Rc<RefCell<ControlInner>>,
}

impl FakeControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes terminating signals remove the target from `table`.
    pub fn killing_from(table: &FakeProcTable) -> Self {
        let control = Self::new();
        control.inner.borrow_mut().table = Some(table.clone());
        control
    }

    /// Makes every subsequent call fail with `err`.
    pub fn fail_with(&self, err: ProcessError) {
        self.inner.borrow_mut().failure = Some(err);
    }

    pub fn calls(&self) -> Vec<ControlCall> {
        self.inner.borrow().calls.clone()
    }
}

impl ProcessControl for FakeControl {
    fn send_signal(&self, pid: u32, signal: SignalKind) -> ProcessResult<()> {
        validate_pid(pid)?;
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(ControlCall::Signal(pid, signal));
        if let Some(err) = inner.failure.clone() {
            return Err(err);
        }
        if matches!(signal, SignalKind::Terminate | SignalKind::Kill) {
            if let Some(table) = &inner.table {
                table.remove(pid);
            }
        }
        Ok(())
    }

    fn set_priority(&self, pid: u32, nice: i32) -> ProcessResult<()> {
        validate_pid(pid)?;
        validate_nice(nice)?;
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(ControlCall::Priority(pid, nice));
        match inner.failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
