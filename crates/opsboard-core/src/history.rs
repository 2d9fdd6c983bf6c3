//! Snapshot history with an explicit cursor.
//!
//! Transient updates during a gesture go through [`History::mutate`], which
//! rewrites the current snapshot in place. A finished gesture calls
//! [`History::commit`] exactly once, which drops any redo tail and appends.

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A linear snapshot history.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The snapshot the cursor points at.
    pub fn present(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Replace the current snapshot without creating an undo step.
    pub fn mutate(&mut self, value: T) {
        self.entries[self.cursor] = value;
    }

    /// Append a new snapshot, discarding anything past the cursor.
    pub fn commit(&mut self, value: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(value);
        self.cursor += 1;

        if self.entries.len() > MAX_UNDO_HISTORY {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step the cursor back.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step the cursor forward.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.entries.len()
    }
}
