use crate::app::controllers::focus::FocusTracker;
use crate::app::controllers::history::{HistoryManager, DEFAULT_HISTORY_CAPACITY};
use crate::app::domain::buffer::{BufferId, BufferSet};

/// Sole writer of the buffer set. Every content-affecting change ends in
/// exactly one history record; undo and redo install snapshots without
/// recording.
pub struct BufferSetManager {
    set: BufferSet,
    history: HistoryManager,
}

impl BufferSetManager {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        let set = BufferSet::new();
        let history = HistoryManager::with_capacity(set.clone(), capacity);
        Self { set, history }
    }

    pub fn buffers(&self) -> &BufferSet {
        &self.set
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn count(&self) -> usize {
        self.set.len()
    }

    pub fn content(&self, id: BufferId) -> Option<&str> {
        self.set.get(id).map(|b| b.content.as_str())
    }

    pub fn add_buffer(&mut self) -> BufferId {
        let id = self.set.push_empty();
        tracing::debug!("Added buffer {}", id);
        self.record();
        id
    }

    /// Remove a buffer and keep `focus` pointing at the same logical buffer.
    /// Refused silently when it is the only buffer left.
    pub fn remove_buffer(&mut self, id: BufferId, focus: &mut FocusTracker) -> bool {
        if !self.set.remove(id) {
            tracing::debug!("Refused to remove buffer {} ({} left)", id, self.set.len());
            return false;
        }
        tracing::debug!("Removed buffer {}", id);
        self.record();
        focus.on_buffer_removed(id, self.set.len());
        true
    }

    pub fn set_content(&mut self, id: BufferId, content: String) -> bool {
        if !self.set.set_content(id, content) {
            return false;
        }
        self.record();
        true
    }

    /// Swap in a whole new set, e.g. one opened from the file store.
    pub fn replace_all(&mut self, set: BufferSet) {
        tracing::debug!("Replacing buffer set ({} buffer(s))", set.len());
        self.set = set;
        self.record();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.set = snapshot.clone();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.set = snapshot.clone();
                true
            }
            None => false,
        }
    }

    fn record(&mut self) {
        self.history.record(self.set.clone());
    }
}

impl Default for BufferSetManager {
    fn default() -> Self {
        Self::new()
    }
}
