//! Custom error types for type-safe error handling
//!
//! Parsing and collection errors are process-local: the collector skips the
//! offending process and keeps going. Control errors end up in the session's
//! status line.

use std::fmt;
use std::io;

use nix::errno::Errno;

// ============================================================================
// Process Error
// ============================================================================

/// Errors that can occur while reading or acting on a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Process vanished between enumeration and read
    TransientAbsence {
        /// PID that disappeared
        pid: u32,
    },

    /// A record had an unexpected shape
    MalformedRecord {
        /// PID whose record failed to parse
        pid: u32,
        /// What was wrong with it
        reason: String,
    },

    /// The OS refused the operation - typically requires root
    PermissionDenied {
        /// Target PID
        pid: u32,
    },

    /// The target process does not exist
    NotFound {
        /// Target PID
        pid: u32,
    },

    /// Rejected before reaching the OS
    InvalidArgument {
        /// Description of what was invalid
        reason: String,
    },

    /// Reading a system-wide source failed
    Io {
        /// What was being read
        context: String,
        /// Underlying error message
        message: String,
    },

    /// A system call failed with an errno we do not classify
    Os {
        /// Name of the failing operation
        operation: &'static str,
        /// Raw errno value
        code: i32,
    },
}

impl ProcessError {
    /// Builds a malformed-record error for `pid`.
    pub fn malformed(pid: u32, reason: impl Into<String>) -> Self {
        ProcessError::MalformedRecord {
            pid,
            reason: reason.into(),
        }
    }

    /// Builds an invalid-argument error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        ProcessError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Wraps an I/O error that occurred while reading `context`.
    pub fn io(context: impl Into<String>, err: &io::Error) -> Self {
        ProcessError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Classifies an errno returned by a control call on `pid`.
    pub fn from_errno(operation: &'static str, pid: u32, errno: Errno) -> Self {
        match errno {
            Errno::EPERM | Errno::EACCES => ProcessError::PermissionDenied { pid },
            Errno::ESRCH => ProcessError::NotFound { pid },
            other => ProcessError::Os {
                operation,
                code: other as i32,
            },
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::TransientAbsence { pid } => {
                write!(f, "Process {} exited while being read", pid)
            }
            ProcessError::MalformedRecord { pid, reason } => {
                write!(f, "Malformed record for process {}: {}", pid, reason)
            }
            ProcessError::PermissionDenied { pid } => {
                write!(f, "Permission denied for process {} - try running as root", pid)
            }
            ProcessError::NotFound { pid } => {
                write!(f, "Process {} not found or has terminated", pid)
            }
            ProcessError::InvalidArgument { reason } => {
                write!(f, "Invalid argument: {}", reason)
            }
            ProcessError::Io { context, message } => {
                write!(f, "Cannot read {}: {}", context, message)
            }
            ProcessError::Os { operation, code } => {
                write!(f, "{} failed (errno {})", operation, code)
            }
        }
    }
}

impl std::error::Error for ProcessError {}

/// Result type for process operations
pub type ProcessResult<T> = Result<T, ProcessError>;
