//! Process filters and the filter query language
//!
//! Filters are plain predicates over [`Process`]; a query such as
//! `user:root mem:1000- ssh` parses into a list of them that must all match.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::system::{Process, ProcessState};

/// A single predicate over a process.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessFilter {
    /// Case-insensitive substring of the executable name
    Name(String),
    /// Exact owner display name
    User(String),
    /// Exact scheduler state
    State(ProcessState),
    /// Inclusive pid range
    PidRange(RangeInclusive<u32>),
    /// Inclusive resident-memory range in kB
    MemoryRange(RangeInclusive<u64>),
    /// Inclusive CPU-percent range
    CpuRange(RangeInclusive<f64>),
    /// Exact parent pid; this is also how "children of X" is expressed
    Parent(u32),
    /// Case-insensitive substring of the name or the owner
    Search(String),
}

impl ProcessFilter {
    /// Returns true if `process` satisfies this filter.
    pub fn matches(&self, process: &Process) -> bool {
        match self {
            ProcessFilter::Name(needle) => contains_ignore_case(&process.name, needle),
            ProcessFilter::User(user) => process.user == *user,
            ProcessFilter::State(state) => process.state == *state,
            ProcessFilter::PidRange(range) => range.contains(&process.pid),
            ProcessFilter::MemoryRange(range) => range.contains(&process.vm_rss_kb),
            ProcessFilter::CpuRange(range) => range.contains(&process.cpu_percent),
            ProcessFilter::Parent(ppid) => process.ppid == *ppid,
            ProcessFilter::Search(needle) => {
                contains_ignore_case(&process.name, needle)
                    || contains_ignore_case(&process.user, needle)
            }
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns true if `process` satisfies every filter; an empty chain matches all.
pub fn matches_all(filters: &[ProcessFilter], process: &Process) -> bool {
    filters.iter().all(|f| f.matches(process))
}

/// Keeps the processes that satisfy every filter, preserving order.
pub fn apply_filters<'a>(
    processes: impl IntoIterator<Item = &'a Process>,
    filters: &[ProcessFilter],
) -> Vec<&'a Process> {
    processes
        .into_iter()
        .filter(|p| matches_all(filters, p))
        .collect()
}

/// Direct children of `ppid`.
pub fn children_of(processes: &[Process], ppid: u32) -> Vec<&Process> {
    apply_filters(processes, &[ProcessFilter::Parent(ppid)])
}

/// Parses filter text into a chain of filters.
///
/// Tokens are whitespace separated. `user:`, `state:`, `pid:`, `mem:`, `cpu:`
/// and `ppid:` select typed filters; ranges are `A-B`, `A-`, `-B` or a single
/// value. Anything else, including a typed token whose value does not parse,
/// becomes a [`ProcessFilter::Search`].
pub fn parse_query(query: &str) -> Vec<ProcessFilter> {
    query
        .split_whitespace()
        .map(|token| parse_token(token).unwrap_or_else(|| ProcessFilter::Search(token.to_string())))
        .collect()
}

fn parse_token(token: &str) -> Option<ProcessFilter> {
    let (key, value) = token.split_once(':')?;
    if value.is_empty() {
        return None;
    }
    match key.to_lowercase().as_str() {
        "name" => Some(ProcessFilter::Name(value.to_string())),
        "user" => Some(ProcessFilter::User(value.to_string())),
        "state" => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(code), None) => Some(ProcessFilter::State(ProcessState::from_code(code))),
                _ => None,
            }
        }
        "pid" => parse_range(value, 0, u32::MAX).map(ProcessFilter::PidRange),
        "mem" => parse_range(value, 0, u64::MAX).map(ProcessFilter::MemoryRange),
        "cpu" => parse_range(value, 0.0, f64::MAX).map(ProcessFilter::CpuRange),
        "ppid" => value.parse().ok().map(ProcessFilter::Parent),
        _ => None,
    }
}

fn parse_range<T>(value: &str, lowest: T, highest: T) -> Option<RangeInclusive<T>>
where
    T: FromStr + PartialOrd + Copy,
{
    let (lo, hi) = match value.split_once('-') {
        Some((lo, hi)) => (lo, hi),
        None => (value, value),
    };
    let lo = if lo.is_empty() { lowest } else { lo.parse().ok()? };
    let hi = if hi.is_empty() { highest } else { hi.parse().ok()? };
    if lo > hi {
        return None;
    }
    Some(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::process;

    fn pids(procs: &[&Process]) -> Vec<u32> {
        procs.iter().map(|p| p.pid).collect()
    }

    fn sample() -> Vec<Process> {
        let mut procs = vec![
            process(1, 0, "systemd"),
            process(10, 1, "Firefox"),
            process(11, 1, "bash"),
            process(12, 11, "vim"),
        ];
        procs[1].user = "alice".to_string();
        procs[1].vm_rss_kb = 900_000;
        procs[1].cpu_percent = 35.0;
        procs[2].user = "alice".to_string();
        procs[2].vm_rss_kb = 4_000;
        procs[3].user = "bob".to_string();
        procs[3].state = ProcessState::Running;
        procs[3].vm_rss_kb = 12_000;
        procs
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let procs = vec![process(10, 1, "Firefox"), process(11, 1, "bash")];
        let found = apply_filters(&procs, &[ProcessFilter::Name("firefox".to_string())]);
        assert_eq!(pids(&found), vec![10]);
    }

    #[test]
    fn test_typed_filters() {
        let procs = sample();
        let user = apply_filters(&procs, &[ProcessFilter::User("alice".to_string())]);
        assert_eq!(pids(&user), vec![10, 11]);

        // user match is exact, not substring
        assert!(apply_filters(&procs, &[ProcessFilter::User("ali".to_string())]).is_empty());

        let running = apply_filters(&procs, &[ProcessFilter::State(ProcessState::Running)]);
        assert_eq!(pids(&running), vec![12]);

        let mem = apply_filters(&procs, &[ProcessFilter::MemoryRange(4_000..=12_000)]);
        assert_eq!(pids(&mem), vec![11, 12]);

        let pid = apply_filters(&procs, &[ProcessFilter::PidRange(10..=11)]);
        assert_eq!(pids(&pid), vec![10, 11]);

        let cpu = apply_filters(&procs, &[ProcessFilter::CpuRange(35.0..=100.0)]);
        assert_eq!(pids(&cpu), vec![10]);

        assert_eq!(pids(&children_of(&procs, 1)), vec![10, 11]);
        assert!(children_of(&procs, 12).is_empty());
    }

    #[test]
    fn test_search_matches_name_or_owner() {
        let procs = sample();
        let found = apply_filters(&procs, &[ProcessFilter::Search("BOB".to_string())]);
        assert_eq!(pids(&found), vec![12]);

        let found = apply_filters(&procs, &[ProcessFilter::Search("sh".to_string())]);
        assert_eq!(pids(&found), vec![11]);
    }

    #[test]
    fn test_chained_filters_all_apply() {
        let procs = sample();
        let filters = parse_query("user:alice mem:10000-");
        assert_eq!(pids(&apply_filters(&procs, &filters)), vec![10]);
        assert_eq!(pids(&apply_filters(&procs, &[])), vec![1, 10, 11, 12]);
    }

    #[test]
    fn test_parse_query_tokens() {
        assert_eq!(
            parse_query("pid:100-200 ppid:1 ssh"),
            vec![
                ProcessFilter::PidRange(100..=200),
                ProcessFilter::Parent(1),
                ProcessFilter::Search("ssh".to_string()),
            ]
        );
        assert_eq!(parse_query("pid:-5"), vec![ProcessFilter::PidRange(0..=5)]);
        assert_eq!(parse_query("pid:42"), vec![ProcessFilter::PidRange(42..=42)]);
        assert_eq!(parse_query("state:Z"), vec![ProcessFilter::State(ProcessState::Zombie)]);
        assert!(parse_query("   ").is_empty());
    }

    #[test]
    fn test_invalid_typed_token_becomes_search() {
        assert_eq!(
            parse_query("pid:abc"),
            vec![ProcessFilter::Search("pid:abc".to_string())]
        );
        assert_eq!(
            parse_query("mem:50-10"),
            vec![ProcessFilter::Search("mem:50-10".to_string())]
        );
        assert_eq!(
            parse_query("user:"),
            vec![ProcessFilter::Search("user:".to_string())]
        );
    }
}
