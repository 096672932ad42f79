//! Session state and core logic

use std::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_REFRESH_MS, MAX_REFRESH_MS, MIN_REFRESH_MS, VISIBLE_ROWS_OVERHEAD,
};
use crate::system::units::clock_ticks_per_second;
use crate::system::{Collector, Process, ProcessControl, Snapshot};

use super::filter::{matches_all, parse_query, ProcessFilter};
use super::sort::{sort_processes, SortDirection, SortField};
use super::tree_builder::ProcessTree;
use super::SessionMode;

/// Initial session settings, usually built from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Refresh interval in milliseconds
    pub refresh_ms: u64,
    /// Initial filter query
    pub filter: String,
    /// Initial sort column
    pub sort_field: SortField,
    /// Initial sort direction
    pub sort_direction: SortDirection,
    /// Start in tree view mode
    pub tree_view: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_ms: DEFAULT_REFRESH_MS,
            filter: String::new(),
            sort_field: SortField::Pid,
            sort_direction: SortDirection::Ascending,
            tree_view: false,
        }
    }
}

/// One displayed row: an index into the snapshot plus tree decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    /// Position in `Snapshot::processes`
    pub index: usize,
    /// Tree depth (0 in flat view)
    pub depth: usize,
    /// Tree guide prefix (empty in flat view)
    pub guide: String,
}

/// Interactive session state
pub struct Session {
    collector: Collector,
    control: Box<dyn ProcessControl>,
    /// Latest snapshot
    pub snapshot: Snapshot,
    /// Filtered and sorted view of `snapshot`
    pub projection: Vec<ProjectedRow>,
    /// Selected row in `projection`, `None` when it is empty
    pub selected: Option<usize>,
    /// First visible row
    pub scroll_offset: usize,
    /// Number of process rows the terminal can show
    pub visible_rows: usize,
    /// Current sort column
    pub sort_field: SortField,
    /// Current sort direction
    pub sort_direction: SortDirection,
    /// Raw filter text as typed
    pub filter: String,
    filters: Vec<ProcessFilter>,
    /// Whether we're in tree view mode
    pub tree_view: bool,
    /// Current input mode
    pub mode: SessionMode,
    /// Message shown on the status line (if any)
    pub status: Option<String>,
    /// Status text set by the last failed refresh, cleared on recovery
    refresh_error: Option<String>,
    /// Time of the last successful or attempted refresh
    pub last_refresh: Option<Instant>,
    /// Refresh interval in milliseconds
    pub refresh_interval_ms: u64,
    /// Kernel clock ticks per second, for the TIME+ column
    pub clock_hz: u64,
}

impl Session {
    /// Creates a session. Nothing is collected until the first refresh.
    pub fn new(collector: Collector, control: Box<dyn ProcessControl>, config: &SessionConfig) -> Self {
        Self {
            collector,
            control,
            snapshot: Snapshot::empty(),
            projection: Vec::new(),
            selected: None,
            scroll_offset: 0,
            visible_rows: 20,
            sort_field: config.sort_field,
            sort_direction: config.sort_direction,
            filters: parse_query(&config.filter),
            filter: config.filter.clone(),
            tree_view: config.tree_view,
            mode: SessionMode::Idle,
            status: None,
            refresh_error: None,
            last_refresh: None,
            refresh_interval_ms: config.refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
            clock_hz: clock_ticks_per_second(),
        }
    }

    pub(super) fn control(&self) -> &dyn ProcessControl {
        self.control.as_ref()
    }

    /// Collects a new snapshot and rebuilds the projection.
    ///
    /// On a total collection failure the previous snapshot and projection
    /// are kept and the failure is reported on the status line.
    pub fn refresh(&mut self, now: Instant) {
        self.last_refresh = Some(now);

        let mut snapshot = match self.collector.collect() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Refresh failed: {}", e);
                let message = format!("Failed to read process table: {}", e);
                self.status = Some(message.clone());
                self.refresh_error = Some(message);
                return;
            }
        };

        if let Some(message) = self.refresh_error.take() {
            log::info!("Process table readable again");
            if self.status.as_deref() == Some(message.as_str()) {
                self.status = None;
            }
        }

        // Resolve the selection against the outgoing snapshot
        let prev_pid = self.selected_pid();
        let prev_index = self.selected;

        snapshot.apply_cpu_percent(&self.snapshot);
        self.snapshot = snapshot;
        self.reproject_from(prev_pid, prev_index);
    }

    /// Refreshes if the interval has elapsed. Only honoured while idle.
    ///
    /// # Returns
    /// `true` if a refresh happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.mode.is_idle() {
            return false;
        }
        let due = match self.last_refresh {
            Some(last) => now.saturating_duration_since(last) >= self.refresh_interval(),
            None => true,
        };
        if due {
            self.refresh(now);
        }
        due
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Rebuilds the projection from the current snapshot, keeping the
    /// selection on the same process where possible.
    pub fn reproject(&mut self) {
        let prev_pid = self.selected_pid();
        let prev_index = self.selected;
        self.reproject_from(prev_pid, prev_index);
    }

    fn reproject_from(&mut self, prev_pid: Option<u32>, prev_index: Option<usize>) {
        self.projection = project(
            &self.snapshot,
            &self.filters,
            self.sort_field,
            self.sort_direction,
            self.tree_view,
        );
        self.reconcile_selection(prev_pid, prev_index);
    }

    fn reconcile_selection(&mut self, prev_pid: Option<u32>, prev_index: Option<usize>) {
        let len = self.projection.len();
        self.selected = if len == 0 {
            None
        } else if let Some(pos) = prev_pid.and_then(|pid| self.position_of(pid)) {
            Some(pos)
        } else {
            Some(prev_index.unwrap_or(0).min(len - 1))
        };
        self.ensure_visible();
    }

    /// Row index of `pid` in the projection
    pub fn position_of(&self, pid: u32) -> Option<usize> {
        self.projection
            .iter()
            .position(|row| self.snapshot.processes[row.index].pid == pid)
    }

    /// Process shown at projection row `row`
    pub fn process_at(&self, row: usize) -> Option<&Process> {
        self.projection
            .get(row)
            .and_then(|r| self.snapshot.processes.get(r.index))
    }

    /// Currently selected process
    pub fn selected_process(&self) -> Option<&Process> {
        self.selected.and_then(|row| self.process_at(row))
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_process().map(|p| p.pid)
    }

    /// Selects a sort column. The same column flips direction; a new
    /// column starts ascending.
    pub fn select_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggle();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
        log::debug!("Sort by {} {:?}", field.name(), self.sort_direction);
        self.reproject();
    }

    /// Replaces the filter text and re-applies it.
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
        self.filters = parse_query(text);
        self.reproject();
    }

    /// Toggles between flat and tree view.
    pub fn toggle_tree_view(&mut self) {
        self.tree_view = !self.tree_view;
        self.reproject();
    }

    /// Increases refresh interval (slower refresh).
    ///
    /// Steps: 250ms → 500ms → 1s → 2s → 5s → 10s
    pub fn increase_refresh_interval(&mut self) {
        self.refresh_interval_ms = match self.refresh_interval_ms {
            x if x >= 5000 => 10000,
            x if x >= 2000 => 5000,
            x if x >= 1000 => 2000,
            x if x >= 500 => 1000,
            _ => 500,
        };
    }

    /// Decreases refresh interval (faster refresh).
    ///
    /// Steps: 10s → 5s → 2s → 1s → 500ms → 250ms
    pub fn decrease_refresh_interval(&mut self) {
        self.refresh_interval_ms = match self.refresh_interval_ms {
            x if x <= 500 => 250,
            x if x <= 1000 => 500,
            x if x <= 2000 => 1000,
            x if x <= 5000 => 2000,
            _ => 5000,
        };
    }

    /// Formats refresh interval for display.
    ///
    /// # Returns
    /// A string like "2.0s" or "500ms" depending on interval.
    pub fn format_refresh_interval(&self) -> String {
        if self.refresh_interval_ms >= 1000 {
            format!("{:.1}s", self.refresh_interval_ms as f64 / 1000.0)
        } else {
            format!("{}ms", self.refresh_interval_ms)
        }
    }

    /// Adapts the visible window to a new terminal height.
    pub fn resize(&mut self, height: u16) {
        self.visible_rows = (height as usize).saturating_sub(VISIBLE_ROWS_OVERHEAD).max(1);
        self.ensure_visible();
    }
}

/// Filters, then sorts (flat view) or orders as a tree (tree view).
fn project(
    snapshot: &Snapshot,
    filters: &[ProcessFilter],
    field: SortField,
    direction: SortDirection,
    tree_view: bool,
) -> Vec<ProjectedRow> {
    let position = |pid: u32| {
        snapshot
            .processes
            .binary_search_by_key(&pid, |p| p.pid)
            .ok()
    };

    if tree_view {
        let tree = ProcessTree::build(&snapshot.processes);
        return tree
            .rows()
            .into_iter()
            .filter_map(|row| {
                let index = position(row.pid)?;
                matches_all(filters, &snapshot.processes[index]).then_some(ProjectedRow {
                    index,
                    depth: row.depth,
                    guide: row.guide,
                })
            })
            .collect();
    }

    let mut view: Vec<&Process> = snapshot
        .processes
        .iter()
        .filter(|p| matches_all(filters, p))
        .collect();
    sort_processes(&mut view, field, direction);

    view.into_iter()
        .filter_map(|p| position(p.pid))
        .map(|index| ProjectedRow {
            index,
            depth: 0,
            guide: String::new(),
        })
        .collect()
}
