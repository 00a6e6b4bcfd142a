use std::collections::HashMap;

use crate::app::domain::buffer::BufferId;
use crate::app::domain::focus::SelectionRange;

/// Live caret access for the widgets that display buffers.
///
/// The engine only ever sees offsets through this trait; it never holds on
/// to a widget.
pub trait CursorQuery {
    /// Current selection of the widget showing `id`, or `None` when the
    /// widget cannot report one.
    fn query(&self, id: BufferId) -> Option<SelectionRange>;

    /// Move the widget's caret. Called by deferred restores after the
    /// widget has re-rendered.
    fn place_caret(&mut self, id: BufferId, selection: SelectionRange);
}

/// In-memory caret per buffer, standing in for a real widget tree.
#[derive(Debug, Default)]
pub struct CaretTable {
    carets: HashMap<BufferId, SelectionRange>,
}

impl CaretTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: BufferId, selection: SelectionRange) {
        self.carets.insert(id, selection);
    }

    /// Make `id` report no selection, like a widget that lost its caret.
    pub fn forget(&mut self, id: BufferId) {
        self.carets.remove(&id);
    }

    pub fn clear(&mut self) {
        self.carets.clear();
    }
}

impl CursorQuery for CaretTable {
    fn query(&self, id: BufferId) -> Option<SelectionRange> {
        self.carets.get(&id).copied()
    }

    fn place_caret(&mut self, id: BufferId, selection: SelectionRange) {
        self.set(id, selection);
    }
}
