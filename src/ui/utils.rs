//! Utility functions for UI rendering

use crossterm::style::Color;

use crate::constants::{CPU_THRESHOLD_CRITICAL, CPU_THRESHOLD_MODERATE, CPU_THRESHOLD_WARNING};

/// Truncates a string to fit within a given width.
///
/// If the string exceeds `max_len` characters, it is truncated and "..." is
/// appended. Counts characters, not bytes, so tree guides and non-ASCII
/// names are never split mid-character.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Pads or truncates `s` to exactly `width` characters.
#[must_use]
pub fn fit_width(s: &str, width: usize) -> String {
    format!("{:<width$}", truncate_string(s, width), width = width)
}

/// Returns a color based on CPU usage percentage for visual indication.
///
/// # Color Thresholds
/// * Red - Critical usage (≥80%)
/// * Yellow - Warning level (≥50%)
/// * Cyan - Moderate usage (≥20%)
/// * Green - Low usage (<20%)
#[must_use]
pub fn cpu_color(percent: f64) -> Color {
    if percent >= CPU_THRESHOLD_CRITICAL {
        Color::Red
    } else if percent >= CPU_THRESHOLD_WARNING {
        Color::Yellow
    } else if percent >= CPU_THRESHOLD_MODERATE {
        Color::Cyan
    } else {
        Color::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a long process name", 10), "a long ...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
        assert_eq!(truncate_string("├── sshd: alice", 8), "├── s...");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("ab", 4), "ab  ");
        assert_eq!(fit_width("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_cpu_color() {
        assert_eq!(cpu_color(95.0), Color::Red);
        assert_eq!(cpu_color(50.0), Color::Yellow);
        assert_eq!(cpu_color(20.0), Color::Cyan);
        assert_eq!(cpu_color(0.0), Color::Green);
    }
}
