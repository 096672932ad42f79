//! Sorting options for the process list

use std::cmp::Ordering;

use crate::system::Process;

/// Sort column options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Pid,
    Name,
    User,
    Cpu,
    Memory,
    State,
    Parent,
}

impl SortField {
    /// Get display name for the sort column
    pub fn name(&self) -> &'static str {
        match self {
            SortField::Pid => "PID",
            SortField::Name => "Name",
            SortField::User => "User",
            SortField::Cpu => "CPU%",
            SortField::Memory => "Memory",
            SortField::State => "State",
            SortField::Parent => "PPID",
        }
    }

    /// Parses a field name as accepted on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pid" => Some(SortField::Pid),
            "name" => Some(SortField::Name),
            "user" | "owner" => Some(SortField::User),
            "cpu" => Some(SortField::Cpu),
            "mem" | "memory" => Some(SortField::Memory),
            "state" => Some(SortField::State),
            "ppid" | "parent" => Some(SortField::Parent),
            _ => None,
        }
    }

    /// Natural ascending order of two processes on this field.
    pub fn compare(&self, a: &Process, b: &Process) -> Ordering {
        match self {
            SortField::Pid => a.pid.cmp(&b.pid),
            SortField::Name => a.name.cmp(&b.name),
            SortField::User => a.user.cmp(&b.user),
            SortField::Cpu => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortField::Memory => a.vm_rss_kb.cmp(&b.vm_rss_kb),
            SortField::State => a.state.code().cmp(&b.state.code()),
            SortField::Parent => a.ppid.cmp(&b.ppid),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the sorted column
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Stable sort of `processes` in place; equal keys keep their input order.
pub fn sort_processes(processes: &mut [&Process], field: SortField, direction: SortDirection) {
    processes.sort_by(|a, b| {
        let cmp = field.compare(a, b);
        match direction {
            SortDirection::Ascending => cmp,
            SortDirection::Descending => cmp.reverse(),
        }
    });
}

fn top_by<'a>(processes: &'a [Process], field: SortField, n: usize) -> Vec<&'a Process> {
    let mut sorted: Vec<&Process> = processes.iter().collect();
    sort_processes(&mut sorted, field, SortDirection::Descending);
    sorted.truncate(n);
    sorted
}

/// The `n` busiest processes; all of them when there are fewer than `n`.
pub fn top_by_cpu(processes: &[Process], n: usize) -> Vec<&Process> {
    top_by(processes, SortField::Cpu, n)
}

/// The `n` largest processes by resident memory; all of them when there are fewer than `n`.
pub fn top_by_memory(processes: &[Process], n: usize) -> Vec<&Process> {
    top_by(processes, SortField::Memory, n)
}
