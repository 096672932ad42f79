//! Help overlay rendering

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::constants::{HELP_DIALOG_WIDTH, HELP_KEY_COL_WIDTH};

use super::utils::fit_width;

/// Help content definition
const HELP_LINES: &[(&str, &str)] = &[
    ("NAVIGATION", ""),
    ("  Up/Down", "Move selection up/down"),
    ("  PgUp/PgDn", "Scroll by page"),
    ("  Home/End", "Jump to first/last process"),
    ("", ""),
    ("PROCESS ACTIONS", ""),
    ("  k", "Kill selected process (SIGTERM)"),
    ("  n", "Set nice value (-20..19)"),
    ("", ""),
    ("VIEW OPTIONS", ""),
    ("  P N U C", "Sort by pid/name/user/cpu"),
    ("  M S A", "Sort by memory/state/ppid"),
    ("  t", "Toggle tree view"),
    ("  /", "Filter (user: state: pid: mem:"),
    ("", "  cpu: ppid: or plain text)"),
    ("  Esc", "Clear filter"),
    ("", ""),
    ("SETTINGS", ""),
    ("  [", "Slow down refresh"),
    ("  ]", "Speed up refresh"),
    ("  r", "Refresh now"),
    ("", ""),
    ("OTHER", ""),
    ("  h ? F1", "Show this help"),
    ("  q", "Quit application"),
    ("  Ctrl+C", "Quit application"),
];

fn bordered_line<W: Write>(out: &mut W, x: u16, y: u16, content: &str, fg: Color) -> io::Result<()> {
    let inner_width = HELP_DIALOG_WIDTH - 2;
    queue!(
        out,
        MoveTo(x, y),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(fg),
        Print("│"),
        Print(fit_width(content, inner_width)),
        Print("│"),
        ResetColor
    )
}

/// Renders the help overlay showing all keyboard shortcuts
pub fn render_help_overlay<W: Write>(out: &mut W, width: usize, height: usize) -> io::Result<()> {
    let box_width = HELP_DIALOG_WIDTH;
    let inner_width = box_width - 2;
    let box_height = (HELP_LINES.len() + 4).min(height.saturating_sub(2));
    if box_height < 4 {
        return Ok(());
    }
    let start_x = (width.saturating_sub(box_width) / 2) as u16;
    let start_y = height.saturating_sub(box_height) / 2;

    queue!(
        out,
        MoveTo(start_x, start_y as u16),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("┌{}┐", "─".repeat(inner_width))),
        ResetColor
    )?;

    let title = "Keyboard Shortcuts";
    let title_line = format!("{:^w$}", title, w = inner_width);
    bordered_line(out, start_x, (start_y + 1) as u16, &title_line, Color::Yellow)?;

    queue!(
        out,
        MoveTo(start_x, (start_y + 2) as u16),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("├{}┤", "─".repeat(inner_width))),
        ResetColor
    )?;

    let last_content_row = start_y + box_height - 1;
    for (i, (key, desc)) in HELP_LINES.iter().enumerate() {
        let y = start_y + 3 + i;
        if y >= last_content_row {
            break;
        }
        let y = y as u16;

        if desc.is_empty() {
            // Section header or blank line
            let header = if key.is_empty() { String::new() } else { format!(" {}", key) };
            bordered_line(out, start_x, y, &header, Color::Cyan)?;
        } else {
            queue!(
                out,
                MoveTo(start_x, y),
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print("│"),
                SetForegroundColor(Color::Green),
                Print(format!(" {:<kw$}", key, kw = HELP_KEY_COL_WIDTH)),
                SetForegroundColor(Color::White),
                Print(fit_width(desc, inner_width - HELP_KEY_COL_WIDTH - 1)),
                Print("│"),
                ResetColor
            )?;
        }
    }

    let hint = " Press any key to close ";
    let hint_padding = inner_width.saturating_sub(hint.len()) / 2;
    queue!(
        out,
        MoveTo(start_x, last_content_row as u16),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print("└"),
        Print("─".repeat(hint_padding)),
        SetForegroundColor(Color::Yellow),
        Print(hint),
        SetForegroundColor(Color::White),
        Print("─".repeat(inner_width - hint_padding - hint.len())),
        Print("┘"),
        ResetColor
    )
}
