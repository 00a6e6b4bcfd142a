use std::collections::VecDeque;

use crate::app::domain::buffer::BufferSet;

/// Snapshots kept when no capacity is configured, current state included.
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Linear, bounded undo history of whole buffer-set snapshots.
///
/// `entries[cursor]` is always the state currently shown. Recording after an
/// undo drops every entry past the cursor, so there is never more than one
/// redo branch.
pub struct HistoryManager {
    entries: VecDeque<BufferSet>,
    cursor: usize,
    capacity: usize,
}

impl HistoryManager {
    pub fn new(initial: BufferSet) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// The capacity is clamped to `1..=DEFAULT_HISTORY_CAPACITY`; the current
    /// state is always kept.
    pub fn with_capacity(initial: BufferSet, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, DEFAULT_HISTORY_CAPACITY);
        let mut entries = VecDeque::with_capacity(capacity + 1);
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity,
        }
    }

    pub fn record(&mut self, snapshot: BufferSet) {
        if self.can_redo() {
            let discarded = self.entries.len() - self.cursor - 1;
            self.entries.truncate(self.cursor + 1);
            tracing::debug!("Discarded {} redo state(s)", discarded);
        }

        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry and return the state to restore, or `None` at the
    /// oldest entry.
    pub fn undo(&mut self) -> Option<&BufferSet> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!("Undo to history position {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&BufferSet> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!("Redo to history position {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &VecDeque<BufferSet> {
        &self.entries
    }

    pub fn current(&self) -> &BufferSet {
        &self.entries[self.cursor]
    }
}
