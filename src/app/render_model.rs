//! What the terminal should show, independent of how it is drawn

use crate::constants::{APP_VERSION, DISPLAY_NAME, MAX_TREE_INDENT_DEPTH};
use crate::system::{format_cpu_time, format_kb, format_uptime, Process};

use super::state::{ProjectedRow, Session};
use super::SessionMode;

/// Width of the USER column
const USER_WIDTH: usize = 10;

/// One visible process row
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRow {
    /// Fully formatted line
    pub text: String,
    /// Used to colour the row
    pub cpu_percent: f64,
}

/// Everything the drawing side needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub header: String,
    pub column_header: String,
    /// Rows already windowed by the scroll offset
    pub rows: Vec<RenderRow>,
    /// Highlighted row within `rows`
    pub highlighted: Option<usize>,
    pub status: String,
    pub hint: String,
    pub show_help: bool,
}

impl Session {
    /// Builds the render request for the current state.
    pub fn render_request(&self) -> RenderRequest {
        let rows = self
            .projection
            .iter()
            .skip(self.scroll_offset)
            .take(self.visible_rows)
            .filter_map(|row| {
                let process = self.snapshot.processes.get(row.index)?;
                Some(RenderRow {
                    text: self.format_row(process, row),
                    cpu_percent: process.cpu_percent,
                })
            })
            .collect();

        let highlighted = self
            .selected
            .and_then(|sel| sel.checked_sub(self.scroll_offset))
            .filter(|&i| i < self.visible_rows);

        RenderRequest {
            header: self.header_text(),
            column_header: column_header(),
            rows,
            highlighted,
            status: self.status_text(),
            hint: self.hint_text().to_string(),
            show_help: self.mode.is_help(),
        }
    }

    fn header_text(&self) -> String {
        let uptime = self
            .snapshot
            .uptime_seconds
            .map(|s| format_uptime(s as u64))
            .unwrap_or_else(|| "?".to_string());
        let count = if self.filter.is_empty() {
            format!("Processes: {}", self.snapshot.len())
        } else {
            format!("Showing: {}/{}", self.projection.len(), self.snapshot.len())
        };
        let view = if self.tree_view {
            "View: Tree".to_string()
        } else {
            format!(
                "Sort: {} {}",
                self.sort_field.name(),
                self.sort_direction.arrow()
            )
        };
        format!(
            " {} v{}  |  Up: {}  |  {}  |  {}  |  Refresh: {}",
            DISPLAY_NAME,
            APP_VERSION,
            uptime,
            count,
            view,
            self.format_refresh_interval()
        )
    }

    fn format_row(&self, p: &Process, row: &ProjectedRow) -> String {
        let name = if row.depth == 0 {
            p.name.clone()
        } else {
            // Deep trees keep only the innermost guide columns
            let skip = row.depth.saturating_sub(MAX_TREE_INDENT_DEPTH) * 4;
            let guide: String = row.guide.chars().skip(skip + 4).collect();
            format!("{}{}", guide, p.name)
        };
        let mut user = p.user.clone();
        if user.chars().count() > USER_WIDTH {
            user = user.chars().take(USER_WIDTH - 1).collect::<String>() + "+";
        }
        format!(
            " {:>7} {:>7} {:<width$} {} {:>5.1} {:>7} {:>7} {:>4} {:>10}  {}",
            p.pid,
            p.ppid,
            user,
            p.state.code(),
            p.cpu_percent,
            format_kb(p.vm_size_kb),
            format_kb(p.vm_rss_kb),
            p.threads,
            format_cpu_time(p.cpu_ticks(), self.clock_hz),
            name,
            width = USER_WIDTH
        )
    }

    fn status_text(&self) -> String {
        match &self.mode {
            SessionMode::ConfirmingKill { pid, name } => format!(
                "Kill {} (PID {})? Press Y to confirm, any other key to cancel",
                name, pid
            ),
            SessionMode::FilterInput => format!("Filter: {}█", self.filter),
            SessionMode::PriorityInput { pid, name, buffer } => {
                format!("Nice value for {} (PID {}) [-20..19]: {}█", name, pid, buffer)
            }
            SessionMode::Idle | SessionMode::Help => {
                if let Some(status) = &self.status {
                    status.clone()
                } else if !self.filter.is_empty() {
                    format!("Filter: \"{}\" (press / to edit, Esc to clear)", self.filter)
                } else {
                    String::new()
                }
            }
        }
    }

    fn hint_text(&self) -> &'static str {
        match self.mode {
            SessionMode::Idle => {
                " q:Quit  k:Kill  n:Nice  /:Filter  t:Tree  P/N/U/C/M/S/A:Sort  r:Refresh  ?:Help"
            }
            SessionMode::ConfirmingKill { .. } => " y:Confirm  any other key:Cancel  q:Quit",
            SessionMode::Help => " Press any key to close help",
            SessionMode::FilterInput => " Enter/Esc:Done  Backspace:Delete",
            SessionMode::PriorityInput { .. } => " Enter:Apply  Esc:Cancel",
        }
    }
}

fn column_header() -> String {
    format!(
        " {:>7} {:>7} {:<width$} {} {:>5} {:>7} {:>7} {:>4} {:>10}  {}",
        "PID",
        "PPID",
        "USER",
        "S",
        "CPU%",
        "VIRT",
        "RES",
        "THR",
        "TIME+",
        "NAME",
        width = USER_WIDTH
    )
}
