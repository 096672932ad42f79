//! Terminal rendering logic

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::app::RenderRequest;

use super::help::render_help_overlay;
use super::utils::{cpu_color, fit_width};

/// Draws one frame of `request` onto a `width` x `height` terminal.
pub fn render<W: Write>(out: &mut W, request: &RenderRequest, width: u16, height: u16) -> io::Result<()> {
    let width = width as usize;
    let height = height as usize;

    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    // === HEADER ===
    queue!(
        out,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(fit_width(&request.header, width)),
        ResetColor,
        Print("\r\n"),
        SetBackgroundColor(Color::DarkGrey),
        SetForegroundColor(Color::White),
        Print(fit_width(&request.column_header, width)),
        ResetColor,
        Print("\r\n")
    )?;

    // === PROCESS LIST ===
    let list_rows = height.saturating_sub(crate::constants::VISIBLE_ROWS_OVERHEAD);
    for (i, row) in request.rows.iter().take(list_rows).enumerate() {
        let line = fit_width(&row.text, width);
        if request.highlighted == Some(i) {
            queue!(
                out,
                SetBackgroundColor(Color::DarkCyan),
                SetForegroundColor(Color::White),
                Print(line),
                ResetColor
            )?;
        } else {
            queue!(
                out,
                SetForegroundColor(cpu_color(row.cpu_percent)),
                Print(line),
                ResetColor
            )?;
        }
        queue!(out, Print("\r\n"))?;
    }
    for _ in request.rows.len().min(list_rows)..list_rows {
        queue!(out, Print(format!("{:width$}\r\n", "", width = width)))?;
    }

    // === FOOTER ===
    queue!(
        out,
        SetForegroundColor(Color::Yellow),
        Print(fit_width(&format!(" {}", request.status), width)),
        ResetColor,
        Print("\r\n"),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(fit_width(&request.hint, width)),
        ResetColor
    )?;

    if request.show_help {
        render_help_overlay(out, width, height)?;
    }

    out.flush()
}
