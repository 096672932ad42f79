//! Input/keyboard event handling
//!
//! Keys are routed by the current [`SessionMode`]:
//! - Idle (process list navigation, sorting, commands)
//! - ConfirmingKill (y confirms, anything else cancels)
//! - Help (any key dismisses)
//! - FilterInput / PriorityInput (text entry)
//!
//! Ctrl-C quits from every mode.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};

use super::state::Session;
use super::{SessionMode, SortField};

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue running the session
    Continue,
    /// Exit the session
    Exit,
}

impl Session {
    /// Handles one key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> KeyAction {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Exit;
        }

        match self.mode {
            SessionMode::Idle => self.handle_idle_key(code, now),
            SessionMode::ConfirmingKill { .. } => self.handle_confirm_kill_key(code, now),
            SessionMode::Help => self.handle_help_key(code),
            SessionMode::FilterInput => self.handle_filter_key(code),
            SessionMode::PriorityInput { .. } => self.handle_priority_key(code, now),
        }
    }

    /// Handles key events when help overlay is shown
    fn handle_help_key(&mut self, code: KeyCode) -> KeyAction {
        if code == KeyCode::Char('q') {
            return KeyAction::Exit;
        }
        // Any other key closes help
        self.mode = SessionMode::Idle;
        KeyAction::Continue
    }

    /// Handles key events in confirm kill mode
    fn handle_confirm_kill_key(&mut self, code: KeyCode, now: Instant) -> KeyAction {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_kill(now),
            KeyCode::Char('q') => return KeyAction::Exit,
            _ => self.cancel_kill(),
        }
        KeyAction::Continue
    }

    /// Handles key events in filter mode
    fn handle_filter_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.mode = SessionMode::Idle;
            }
            KeyCode::Backspace => {
                let mut text = self.filter.clone();
                text.pop();
                self.set_filter(&text);
            }
            KeyCode::Char(c) => {
                let text = format!("{}{}", self.filter, c);
                self.set_filter(&text);
            }
            _ => {}
        }
        KeyAction::Continue
    }

    /// Handles key events while typing a nice value
    fn handle_priority_key(&mut self, code: KeyCode, now: Instant) -> KeyAction {
        match code {
            KeyCode::Enter => self.apply_priority(now),
            KeyCode::Esc => self.mode = SessionMode::Idle,
            KeyCode::Backspace => {
                if let SessionMode::PriorityInput { buffer, .. } = &mut self.mode {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let SessionMode::PriorityInput { buffer, .. } = &mut self.mode {
                    if c.is_ascii_digit() || (c == '-' && buffer.is_empty()) {
                        buffer.push(c);
                    }
                }
            }
            _ => {}
        }
        KeyAction::Continue
    }

    /// Handles key events in normal mode (process list).
    /// Returns `KeyAction::Exit` if the session should quit.
    fn handle_idle_key(&mut self, code: KeyCode, now: Instant) -> KeyAction {
        match code {
            KeyCode::Char('q') => return KeyAction::Exit,
            KeyCode::Char('k') => self.request_kill(),
            KeyCode::Char('n') => self.request_priority(),
            KeyCode::Char('r') => self.refresh(now),
            KeyCode::Char('t') => self.toggle_tree_view(),
            KeyCode::Char('P') => self.select_sort(SortField::Pid),
            KeyCode::Char('N') => self.select_sort(SortField::Name),
            KeyCode::Char('U') => self.select_sort(SortField::User),
            KeyCode::Char('C') => self.select_sort(SortField::Cpu),
            KeyCode::Char('M') => self.select_sort(SortField::Memory),
            KeyCode::Char('S') => self.select_sort(SortField::State),
            KeyCode::Char('A') => self.select_sort(SortField::Parent),
            KeyCode::Char('[') => self.increase_refresh_interval(),
            KeyCode::Char(']') => self.decrease_refresh_interval(),
            KeyCode::Char('/') => self.mode = SessionMode::FilterInput,
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.mode = SessionMode::Help;
            }
            KeyCode::Esc => self.set_filter(""),
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Home => self.jump_to_start(),
            KeyCode::End => self.jump_to_end(),
            _ => {}
        }
        KeyAction::Continue
    }
}
