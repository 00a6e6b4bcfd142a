use crate::app::domain::buffer::{BufferId, BufferSet};
use crate::app::domain::focus::{FocusState, SelectionRange};

/// Remembers which buffer the keyboard is typing into.
#[derive(Debug, Default)]
pub struct FocusTracker {
    state: FocusState,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last writer wins; called on focus, click and selection change.
    pub fn focus(&mut self, id: BufferId, selection: SelectionRange) {
        self.state = FocusState {
            active_id: Some(id),
            selection,
        };
    }

    pub fn current_focus(&self) -> FocusState {
        self.state
    }

    pub fn active_id(&self) -> Option<BufferId> {
        self.state.active_id
    }

    /// Keep the selection of the focused buffer, without moving focus.
    pub fn set_selection(&mut self, selection: SelectionRange) {
        if self.state.active_id.is_some() {
            self.state.selection = selection;
        }
    }

    /// Follow a removal: if the removed buffer had focus, move it to the
    /// buffer that slid into its place (or the new last one); if a later
    /// buffer had focus, shift it down with the reindexing.
    pub fn on_buffer_removed(&mut self, removed: BufferId, new_count: usize) {
        let Some(active) = self.state.active_id else {
            return;
        };
        if active == removed {
            let target = removed.0.min(new_count.saturating_sub(1));
            self.state = FocusState {
                active_id: Some(BufferId(target)),
                selection: SelectionRange::caret(0),
            };
        } else if active > removed {
            self.state.active_id = Some(BufferId(active.0 - 1));
        }
    }

    /// Pull the focus back inside `set` after the whole set was swapped
    /// (undo, redo, open).
    pub fn reconcile(&mut self, set: &BufferSet) {
        let Some(active) = self.state.active_id else {
            return;
        };
        let id = if set.contains(active) { active } else { set.last_id() };
        let len = set.get(id).map(|b| b.char_len()).unwrap_or(0);
        self.state = FocusState {
            active_id: Some(id),
            selection: self.state.selection.clamp_to(len),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let mut tracker = FocusTracker::new();
        assert_eq!(tracker.active_id(), None);

        tracker.focus(BufferId(0), SelectionRange::caret(2));
        tracker.focus(BufferId(1), SelectionRange::new(1, 3));
        let state = tracker.current_focus();
        assert_eq!(state.active_id, Some(BufferId(1)));
        assert_eq!(state.selection, SelectionRange::new(1, 3));
    }

    #[test]
    fn test_set_selection_requires_focus() {
        let mut tracker = FocusTracker::new();
        tracker.set_selection(SelectionRange::caret(4));
        assert_eq!(tracker.current_focus(), FocusState::default());
    }

    #[test]
    fn test_removing_focused_buffer_moves_focus_to_successor() {
        let mut tracker = FocusTracker::new();
        tracker.focus(BufferId(1), SelectionRange::caret(3));
        tracker.on_buffer_removed(BufferId(1), 2);
        assert_eq!(tracker.active_id(), Some(BufferId(1)));
        assert_eq!(tracker.current_focus().selection, SelectionRange::caret(0));
    }

    #[test]
    fn test_removing_focused_last_buffer_moves_focus_back() {
        let mut tracker = FocusTracker::new();
        tracker.focus(BufferId(2), SelectionRange::caret(0));
        tracker.on_buffer_removed(BufferId(2), 2);
        assert_eq!(tracker.active_id(), Some(BufferId(1)));
    }

    #[test]
    fn test_removing_earlier_buffer_shifts_focus() {
        let mut tracker = FocusTracker::new();
        tracker.focus(BufferId(2), SelectionRange::caret(5));
        tracker.on_buffer_removed(BufferId(0), 2);
        assert_eq!(tracker.active_id(), Some(BufferId(1)));
        assert_eq!(tracker.current_focus().selection, SelectionRange::caret(5));
    }

    #[test]
    fn test_removing_later_buffer_keeps_focus() {
        let mut tracker = FocusTracker::new();
        tracker.focus(BufferId(0), SelectionRange::caret(1));
        tracker.on_buffer_removed(BufferId(1), 1);
        assert_eq!(tracker.active_id(), Some(BufferId(0)));
    }

    #[test]
    fn test_reconcile_clamps_id_and_selection() {
        let mut tracker = FocusTracker::new();
        tracker.focus(BufferId(3), SelectionRange::new(2, 10));
        tracker.reconcile(&BufferSet::from_contents(["abc", "hello"]));
        let state = tracker.current_focus();
        assert_eq!(state.active_id, Some(BufferId(1)));
        assert_eq!(state.selection, SelectionRange::new(2, 5));
    }

    #[test]
    fn test_reconcile_without_focus_is_noop() {
        let mut tracker = FocusTracker::new();
        tracker.reconcile(&BufferSet::new());
        assert_eq!(tracker.active_id(), None);
    }
}
