//! Centralized constants for the application
//!
//! This module contains all magic numbers and configuration constants
//! used throughout the application, making them easy to find and modify.

// ============================================================================
// Application Info
// ============================================================================

/// Application name displayed in header
pub const DISPLAY_NAME: &str = "Linux Process Manager";

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version from Cargo.toml
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// System Paths
// ============================================================================

/// Mount point of the proc filesystem
pub const PROC_ROOT: &str = "/proc";

/// User database used to resolve uids to names
pub const PASSWD_PATH: &str = "/etc/passwd";

/// Environment variable naming the log file; logging is off when unset
pub const LOG_FILE_ENV: &str = "LPM_LOG_FILE";

// ============================================================================
// Refresh Rate (milliseconds)
// ============================================================================

/// Default refresh interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 2000;

/// Minimum allowed refresh interval
pub const MIN_REFRESH_MS: u64 = 250;

/// Maximum allowed refresh interval
pub const MAX_REFRESH_MS: u64 = 10000;

/// How long the main loop waits for a key before checking the timer
pub const POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// Navigation
// ============================================================================

/// Lines subtracted from terminal height to calculate visible rows
/// (header, column header, status and hint lines)
pub const VISIBLE_ROWS_OVERHEAD: usize = 5;

// ============================================================================
// Process Tree
// ============================================================================

/// Maximum indentation depth for tree view display
pub const MAX_TREE_INDENT_DEPTH: usize = 8;

// ============================================================================
// Scheduling Priority
// ============================================================================

/// Highest scheduling priority (most favourable)
pub const NICE_MIN: i32 = -20;

/// Lowest scheduling priority
pub const NICE_MAX: i32 = 19;

// ============================================================================
// Help Dialog Formatting
// ============================================================================

/// Width of the help dialog box
pub const HELP_DIALOG_WIDTH: usize = 52;

/// Width of the key column in help dialog
pub const HELP_KEY_COL_WIDTH: usize = 14;

// ============================================================================
// CPU Usage Thresholds (for coloring)
// ============================================================================

/// CPU usage threshold for red color (critical)
pub const CPU_THRESHOLD_CRITICAL: f64 = 80.0;

/// CPU usage threshold for yellow color (warning)
pub const CPU_THRESHOLD_WARNING: f64 = 50.0;

/// CPU usage threshold for cyan color (moderate)
pub const CPU_THRESHOLD_MODERATE: f64 = 20.0;
