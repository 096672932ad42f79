//! Session mode enum
//!
//! Defines mutually exclusive session modes, ensuring only one mode can be
//! active at a time. The modal variants carry the data they need, so a
//! pending kill can never lose track of its target.

/// The current input mode of the session.
///
/// The mode determines how keyboard input is handled and what is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Normal process list browsing (default mode)
    #[default]
    Idle,

    /// Waiting for y/n before terminating `pid`
    ConfirmingKill { pid: u32, name: String },

    /// Help overlay showing keyboard shortcuts
    Help,

    /// Editing the filter text
    FilterInput,

    /// Typing a new nice value for `pid`
    PriorityInput {
        pid: u32,
        name: String,
        buffer: String,
    },
}

impl SessionMode {
    /// Returns true if in normal browsing mode
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionMode::Idle)
    }

    /// Returns true if showing help overlay
    #[inline]
    pub fn is_help(&self) -> bool {
        matches!(self, SessionMode::Help)
    }

    /// Returns true if waiting for kill confirmation
    #[inline]
    pub fn is_confirming_kill(&self) -> bool {
        matches!(self, SessionMode::ConfirmingKill { .. })
    }
}
