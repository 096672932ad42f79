//! Navigation methods for the session

use super::state::Session;

impl Session {
    fn last_row(&self) -> Option<usize> {
        self.projection.len().checked_sub(1)
    }

    fn select_clamped(&mut self, row: usize) {
        self.selected = self.last_row().map(|last| row.min(last));
        self.ensure_visible();
    }

    /// Moves selection up by one row.
    pub fn move_up(&mut self) {
        if let Some(row) = self.selected {
            self.select_clamped(row.saturating_sub(1));
        }
    }

    /// Moves selection down by one row.
    pub fn move_down(&mut self) {
        if let Some(row) = self.selected {
            self.select_clamped(row + 1);
        }
    }

    /// Moves selection up by one page.
    pub fn page_up(&mut self) {
        if let Some(row) = self.selected {
            self.select_clamped(row.saturating_sub(self.visible_rows));
        }
    }

    /// Moves selection down by one page.
    pub fn page_down(&mut self) {
        if let Some(row) = self.selected {
            self.select_clamped(row + self.visible_rows);
        }
    }

    /// Jumps selection to the first process.
    pub fn jump_to_start(&mut self) {
        self.select_clamped(0);
    }

    /// Jumps selection to the last process.
    pub fn jump_to_end(&mut self) {
        self.select_clamped(usize::MAX);
    }

    /// Scrolls just enough to keep the selected row inside the window.
    pub fn ensure_visible(&mut self) {
        let Some(row) = self.selected else {
            self.scroll_offset = 0;
            return;
        };
        let window = self.visible_rows.max(1);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + window {
            self.scroll_offset = row + 1 - window;
        }
    }
}
