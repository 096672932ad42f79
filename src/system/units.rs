//! Human-readable formatting of sizes, durations and CPU ticks

/// Kernel clock ticks per second, as reported by `sysconf(_SC_CLK_TCK)`.
pub fn clock_ticks_per_second() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as u64
    } else {
        100
    }
}

/// Formats a kilobyte count with a binary unit suffix.
///
/// # Returns
/// * `String` - e.g. "512K", "1.5M", "2.0G"
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = MB * 1024;

    if kb >= GB {
        format!("{:.1}G", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.1}M", kb as f64 / MB as f64)
    } else {
        format!("{}K", kb)
    }
}

/// Formats uptime as a human-readable string
///
/// # Arguments
/// * `seconds` - Uptime in seconds
///
/// # Returns
/// * `String` - Formatted string like "5s", "2m", "1h 30m", "2d 5h"
pub fn format_uptime(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let mins = seconds / 60;
        let secs = seconds % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        }
    }
}

/// Formats accumulated CPU ticks as `M:SS.hh`, like top's TIME+ column.
pub fn format_cpu_time(ticks: u64, ticks_per_second: u64) -> String {
    let hz = ticks_per_second.max(1);
    let hundredths = ticks * 100 / hz;
    let secs = hundredths / 100;
    format!("{}:{:02}.{:02}", secs / 60, secs % 60, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(30), "30s");
        assert_eq!(format_uptime(90), "1m 30s");
        assert_eq!(format_uptime(3660), "1h 1m");
        assert_eq!(format_uptime(90000), "1d 1h");
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(512), "512K");
        assert_eq!(format_kb(1536), "1.5M");
        assert_eq!(format_kb(2 * 1024 * 1024), "2.0G");
    }

    #[test]
    fn test_format_cpu_time() {
        assert_eq!(format_cpu_time(0, 100), "0:00.00");
        assert_eq!(format_cpu_time(6150, 100), "1:01.50");
        assert_eq!(format_cpu_time(250, 250), "0:01.00");
    }

    #[test]
    fn test_clock_ticks_positive() {
        assert!(clock_ticks_per_second() > 0);
    }
}
