//! Process management operations (kill, priority)

use std::time::Instant;

use super::state::Session;
use super::SessionMode;
use crate::system::SignalKind;

impl Session {
    /// Requests to kill the currently selected process (shows confirmation)
    pub fn request_kill(&mut self) {
        let Some(process) = self.selected_process() else {
            return;
        };
        self.mode = SessionMode::ConfirmingKill {
            pid: process.pid,
            name: process.name.clone(),
        };
    }

    /// Sends SIGTERM to the pending target, then refreshes.
    pub fn confirm_kill(&mut self, now: Instant) {
        let (pid, name) = match &self.mode {
            SessionMode::ConfirmingKill { pid, name } => (*pid, name.clone()),
            _ => return,
        };
        self.mode = SessionMode::Idle;

        self.status = Some(match self.control().send_signal(pid, SignalKind::Terminate) {
            Ok(()) => format!("Sent {} to {} (PID {})", SignalKind::Terminate.name(), name, pid),
            Err(e) => format!("Failed to terminate {} (PID {}): {}", name, pid, e),
        });
        self.refresh(now);
    }

    /// Cancels the pending kill
    pub fn cancel_kill(&mut self) {
        if self.mode.is_confirming_kill() {
            self.mode = SessionMode::Idle;
        }
    }

    /// Opens the nice-value prompt for the selected process
    pub fn request_priority(&mut self) {
        let Some(process) = self.selected_process() else {
            return;
        };
        self.mode = SessionMode::PriorityInput {
            pid: process.pid,
            name: process.name.clone(),
            buffer: String::new(),
        };
    }

    /// Applies the typed nice value and returns to idle.
    pub fn apply_priority(&mut self, now: Instant) {
        let (pid, name, buffer) = match &self.mode {
            SessionMode::PriorityInput { pid, name, buffer } => (*pid, name.clone(), buffer.clone()),
            _ => return,
        };
        self.mode = SessionMode::Idle;

        let nice = match buffer.trim().parse::<i32>() {
            Ok(nice) => nice,
            Err(_) => {
                self.status = Some(format!("Invalid priority '{}'", buffer));
                return;
            }
        };

        self.status = Some(match self.control().set_priority(pid, nice) {
            Ok(()) => format!("{} (PID {}): nice {}", name, pid, nice),
            Err(e) => format!("Failed to set priority of {} (PID {}): {}", name, pid, e),
        });
        self.refresh(now);
    }
}
