//! Signal delivery and scheduling priority changes
//!
//! Calls are synchronous and fire-and-forget: a successful `send_signal`
//! means the kernel accepted the signal, not that the target has exited.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use crate::constants::{NICE_MAX, NICE_MIN};

use super::error::{ProcessError, ProcessResult};

/// Signals the process manager knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Terminate,
    Kill,
    Interrupt,
    Hangup,
    Stop,
    Continue,
    User1,
    User2,
}

impl SignalKind {
    /// Conventional signal name
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::Terminate => "SIGTERM",
            SignalKind::Kill => "SIGKILL",
            SignalKind::Interrupt => "SIGINT",
            SignalKind::Hangup => "SIGHUP",
            SignalKind::Stop => "SIGSTOP",
            SignalKind::Continue => "SIGCONT",
            SignalKind::User1 => "SIGUSR1",
            SignalKind::User2 => "SIGUSR2",
        }
    }

    fn to_nix(self) -> Signal {
        match self {
            SignalKind::Terminate => Signal::SIGTERM,
            SignalKind::Kill => Signal::SIGKILL,
            SignalKind::Interrupt => Signal::SIGINT,
            SignalKind::Hangup => Signal::SIGHUP,
            SignalKind::Stop => Signal::SIGSTOP,
            SignalKind::Continue => Signal::SIGCONT,
            SignalKind::User1 => Signal::SIGUSR1,
            SignalKind::User2 => Signal::SIGUSR2,
        }
    }
}

/// Operations that act on a live process.
pub trait ProcessControl {
    /// Sends `signal` to `pid`.
    fn send_signal(&self, pid: u32, signal: SignalKind) -> ProcessResult<()>;

    /// Sets the nice value of `pid`; must be within `[-20, 19]`.
    fn set_priority(&self, pid: u32, nice: i32) -> ProcessResult<()>;
}

/// Rejects pid 0 and pids the kernel's pid type cannot represent.
pub fn validate_pid(pid: u32) -> ProcessResult<i32> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(raw),
        _ => Err(ProcessError::invalid(format!("{} is not a valid process id", pid))),
    }
}

/// Rejects nice values outside `[-20, 19]`.
pub fn validate_nice(nice: i32) -> ProcessResult<i32> {
    if (NICE_MIN..=NICE_MAX).contains(&nice) {
        Ok(nice)
    } else {
        Err(ProcessError::invalid(format!(
            "priority {} is outside {}..={}",
            nice, NICE_MIN, NICE_MAX
        )))
    }
}

/// [`ProcessControl`] that talks to the running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemControl;

impl ProcessControl for SystemControl {
    fn send_signal(&self, pid: u32, kind: SignalKind) -> ProcessResult<()> {
        let raw = validate_pid(pid)?;
        match signal::kill(Pid::from_raw(raw), kind.to_nix()) {
            Ok(()) => {
                log::info!("Sent {} to PID {}", kind.name(), pid);
                Ok(())
            }
            Err(errno) => {
                log::error!("Failed to send {} to PID {}: {}", kind.name(), pid, errno);
                Err(ProcessError::from_errno("kill", pid, errno))
            }
        }
    }

    fn set_priority(&self, pid: u32, nice: i32) -> ProcessResult<()> {
        let raw = validate_pid(pid)?;
        let nice = validate_nice(nice)?;

        // SAFETY: setpriority only reads its scalar arguments.
        let result = unsafe { libc::setpriority(libc::PRIO_PROCESS, raw as libc::id_t, nice) };
        if result == 0 {
            log::info!("Set PID {} priority to {}", pid, nice);
            Ok(())
        } else {
            let errno = nix::errno::Errno::last();
            log::error!("Failed to set PID {} priority: {}", pid, errno);
            Err(ProcessError::from_errno("setpriority", pid, errno))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_rejected_before_os_call() {
        let control = SystemControl;
        assert!(matches!(
            control.set_priority(std::process::id(), 20),
            Err(ProcessError::InvalidArgument { .. })
        ));
        assert!(matches!(
            control.set_priority(std::process::id(), -21),
            Err(ProcessError::InvalidArgument { .. })
        ));
        assert!(matches!(
            control.send_signal(0, SignalKind::Terminate),
            Err(ProcessError::InvalidArgument { .. })
        ));
        assert!(matches!(
            control.send_signal(u32::MAX, SignalKind::Terminate),
            Err(ProcessError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_nice_bounds_inclusive() {
        assert_eq!(validate_nice(-20), Ok(-20));
        assert_eq!(validate_nice(19), Ok(19));
    }

    #[test]
    fn test_continue_to_self_succeeds() {
        assert!(SystemControl
            .send_signal(std::process::id(), SignalKind::Continue)
            .is_ok());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(SignalKind::Terminate.name(), "SIGTERM");
        assert_eq!(SignalKind::Kill.name(), "SIGKILL");
    }
}
