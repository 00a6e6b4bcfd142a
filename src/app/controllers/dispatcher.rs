//! Virtual keyboard input dispatch.
//!
//! Turns keyboard events into buffer edits. After an edit the caret is not
//! moved right away: a [`PendingRestore`] is queued and only runs once the
//! host has re-rendered (see [`InputDispatcher::run_deferred`]), and in any
//! case before the next event is handled.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::app::controllers::buffers::BufferSetManager;
use crate::app::controllers::focus::FocusTracker;
use crate::app::domain::buffer::BufferId;
use crate::app::domain::focus::SelectionRange;
use crate::app::domain::messages::{ActionCommand, InputEvent, StyleCommand};
use crate::app::infrastructure::cursor::CursorQuery;
use crate::app::services::text_ops::{delete_char_before, delete_word_before, replace_range};

/// What happens to a queued caret restore when focus moves to another
/// buffer before the restore has run. A focus report for the buffer a
/// restore targets always wins over that restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RestorePolicy {
    /// Drop restores queued for buffers that no longer have focus.
    #[default]
    CancelOnFocusChange,
    /// Run them anyway against the buffer they were queued for.
    TargetOriginal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRestore {
    pub buffer: BufferId,
    pub selection: SelectionRange,
}

/// Result of handling one input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing changed.
    Ignored,
    /// Content of this buffer changed and a snapshot was recorded.
    Edited(BufferId),
    /// Presentation-only change for the presentation layer to apply.
    Styled(BufferId, StyleCommand),
    /// Undo or redo installed another snapshot.
    HistoryMoved,
}

pub struct InputDispatcher {
    pending: VecDeque<PendingRestore>,
    policy: RestorePolicy,
}

impl InputDispatcher {
    pub fn new(policy: RestorePolicy) -> Self {
        Self {
            pending: VecDeque::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RestorePolicy {
        self.policy
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingRestore> {
        self.pending.iter()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Handle one keyboard event. Restores left over from the previous
    /// event run first.
    pub fn dispatch<C: CursorQuery + ?Sized>(
        &mut self,
        event: InputEvent,
        buffers: &mut BufferSetManager,
        focus: &mut FocusTracker,
        cursor: &mut C,
    ) -> DispatchOutcome {
        self.run_deferred(focus, cursor);
        tracing::trace!("Dispatching {:?}", event);

        match event {
            InputEvent::Char(text) => {
                let outcome = self.insert_text(&text, buffers, focus, cursor);
                if matches!(outcome, DispatchOutcome::Edited(_)) {
                    focus.reconcile(buffers.buffers());
                }
                outcome
            }
            InputEvent::Style(command) => match focus.active_id() {
                Some(id) => DispatchOutcome::Styled(id, command),
                None => DispatchOutcome::Ignored,
            },
            InputEvent::Action(action) => {
                let outcome = self.apply_action(action, buffers, focus, cursor);
                if outcome != DispatchOutcome::Ignored {
                    focus.reconcile(buffers.buffers());
                }
                outcome
            }
        }
    }

    /// Run every queued restore. Returns how many ran.
    pub fn run_deferred<C: CursorQuery + ?Sized>(
        &mut self,
        focus: &mut FocusTracker,
        cursor: &mut C,
    ) -> usize {
        let mut ran = 0;
        while let Some(restore) = self.pending.pop_front() {
            cursor.place_caret(restore.buffer, restore.selection);
            if focus.active_id() == Some(restore.buffer) {
                focus.set_selection(restore.selection);
            }
            ran += 1;
        }
        ran
    }

    /// Tell the dispatcher focus or selection moved. The reported selection
    /// is newer than any restore queued for `id`, so those are dropped;
    /// restores for other buffers follow the restore policy.
    pub fn on_focus_changed(&mut self, id: BufferId) {
        let before = self.pending.len();
        match self.policy {
            RestorePolicy::CancelOnFocusChange => self.pending.clear(),
            RestorePolicy::TargetOriginal => self.pending.retain(|restore| restore.buffer != id),
        }
        let dropped = before - self.pending.len();
        if dropped > 0 {
            tracing::debug!("Cancelled {} stale caret restore(s)", dropped);
        }
    }

    /// The focus learns the new caret right away; the widget gets it from
    /// the queued restore.
    fn schedule(&mut self, focus: &mut FocusTracker, buffer: BufferId, selection: SelectionRange) {
        focus.set_selection(selection);
        self.pending.push_back(PendingRestore { buffer, selection });
    }

    fn insert_text<C: CursorQuery + ?Sized>(
        &mut self,
        text: &str,
        buffers: &mut BufferSetManager,
        focus: &mut FocusTracker,
        cursor: &C,
    ) -> DispatchOutcome {
        let Some((id, content)) = focused_content(buffers, focus) else {
            return DispatchOutcome::Ignored;
        };

        match cursor.query(id) {
            Some(selection) => {
                if text.is_empty() && selection.is_collapsed() {
                    return DispatchOutcome::Ignored;
                }
                let (new_content, caret) = replace_range(&content, selection, text);
                buffers.set_content(id, new_content);
                self.schedule(focus, id, SelectionRange::caret(caret));
            }
            None => {
                if text.is_empty() {
                    return DispatchOutcome::Ignored;
                }
                tracing::warn!("No caret for buffer {}, appending input", id);
                buffers.set_content(id, content + text);
            }
        }
        DispatchOutcome::Edited(id)
    }

    fn apply_action<C: CursorQuery + ?Sized>(
        &mut self,
        action: ActionCommand,
        buffers: &mut BufferSetManager,
        focus: &mut FocusTracker,
        cursor: &C,
    ) -> DispatchOutcome {
        match action {
            ActionCommand::Undo | ActionCommand::Redo => {
                let moved = if action == ActionCommand::Undo {
                    buffers.undo()
                } else {
                    buffers.redo()
                };
                if !moved {
                    return DispatchOutcome::Ignored;
                }
                DispatchOutcome::HistoryMoved
            }
            ActionCommand::ClearAll => {
                let Some(id) = focus.active_id() else {
                    return DispatchOutcome::Ignored;
                };
                if !buffers.set_content(id, String::new()) {
                    return DispatchOutcome::Ignored;
                }
                if cursor.query(id).is_some() {
                    self.schedule(focus, id, SelectionRange::caret(0));
                }
                DispatchOutcome::Edited(id)
            }
            ActionCommand::DeleteChar | ActionCommand::DeleteWord => {
                self.delete_backward(action, buffers, focus, cursor)
            }
        }
    }

    fn delete_backward<C: CursorQuery + ?Sized>(
        &mut self,
        action: ActionCommand,
        buffers: &mut BufferSetManager,
        focus: &mut FocusTracker,
        cursor: &C,
    ) -> DispatchOutcome {
        let Some((id, content)) = focused_content(buffers, focus) else {
            return DispatchOutcome::Ignored;
        };
        let len = content.chars().count();

        // Without a caret, deletes work at the end like appends do.
        let (selection, degraded) = match cursor.query(id) {
            Some(selection) => (selection.clamp_to(len), false),
            None => (SelectionRange::caret(len), true),
        };

        let edit = if !selection.is_collapsed() {
            Some(replace_range(&content, selection, ""))
        } else if action == ActionCommand::DeleteWord {
            delete_word_before(&content, selection.start)
        } else {
            delete_char_before(&content, selection.start)
        };

        let Some((new_content, caret)) = edit else {
            return DispatchOutcome::Ignored;
        };
        buffers.set_content(id, new_content);
        if !degraded {
            self.schedule(focus, id, SelectionRange::caret(caret));
        }
        DispatchOutcome::Edited(id)
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(RestorePolicy::default())
    }
}

fn focused_content(buffers: &BufferSetManager, focus: &FocusTracker) -> Option<(BufferId, String)> {
    let id = focus.active_id()?;
    let content = buffers.content(id)?.to_string();
    Some((id, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::messages::StyleProperty;
    use crate::app::infrastructure::cursor::CaretTable;

    struct Rig {
        dispatcher: InputDispatcher,
        buffers: BufferSetManager,
        focus: FocusTracker,
        carets: CaretTable,
    }

    impl Rig {
        fn new(policy: RestorePolicy) -> Self {
            Self {
                dispatcher: InputDispatcher::new(policy),
                buffers: BufferSetManager::new(),
                focus: FocusTracker::new(),
                carets: CaretTable::new(),
            }
        }

        fn with_content(content: &str, selection: SelectionRange) -> Self {
            let mut rig = Self::new(RestorePolicy::default());
            rig.buffers.set_content(BufferId(0), content.to_string());
            rig.select(BufferId(0), selection);
            rig
        }

        fn select(&mut self, id: BufferId, selection: SelectionRange) {
            self.carets.set(id, selection);
            self.focus.focus(id, selection);
            self.dispatcher.on_focus_changed(id);
        }

        fn send(&mut self, event: InputEvent) -> DispatchOutcome {
            self.dispatcher
                .dispatch(event, &mut self.buffers, &mut self.focus, &mut self.carets)
        }

        fn action(&mut self, action: ActionCommand) -> DispatchOutcome {
            self.send(InputEvent::Action(action))
        }

        fn type_text(&mut self, text: &str) -> DispatchOutcome {
            self.send(InputEvent::Char(text.to_string()))
        }

        fn render(&mut self) {
            self.dispatcher.run_deferred(&mut self.focus, &mut self.carets);
        }

        fn content(&self, id: usize) -> &str {
            self.buffers.content(BufferId(id)).unwrap()
        }
    }

    #[test]
    fn test_char_without_focus_is_ignored() {
        let mut rig = Rig::new(RestorePolicy::default());
        assert_eq!(rig.type_text("a"), DispatchOutcome::Ignored);
        assert_eq!(rig.buffers.history().len(), 1);
    }

    #[test]
    fn test_char_replaces_selection() {
        let mut rig = Rig::with_content("abcdef", SelectionRange::new(1, 4));
        assert_eq!(rig.type_text("XY"), DispatchOutcome::Edited(BufferId(0)));
        assert_eq!(rig.content(0), "aXYef");

        rig.render();
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(3)));
        assert_eq!(rig.focus.current_focus().selection, SelectionRange::caret(3));
    }

    #[test]
    fn test_caret_restore_is_deferred() {
        let mut rig = Rig::with_content("ab", SelectionRange::caret(2));
        rig.type_text("c");
        assert!(rig.dispatcher.has_pending());
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(2)));

        // The next event drains the queue before it is handled.
        rig.type_text("d");
        assert_eq!(rig.content(0), "abcd");
    }

    #[test]
    fn test_char_appends_without_caret() {
        let mut rig = Rig::new(RestorePolicy::default());
        rig.buffers.add_buffer();
        rig.buffers.add_buffer();
        rig.buffers.set_content(BufferId(2), "xy".to_string());
        rig.focus.focus(BufferId(2), SelectionRange::caret(0));

        assert_eq!(rig.type_text("z"), DispatchOutcome::Edited(BufferId(2)));
        assert_eq!(rig.content(2), "xyz");
        assert!(!rig.dispatcher.has_pending());
    }

    #[test]
    fn test_delete_word() {
        let mut rig = Rig::with_content("Hello world", SelectionRange::caret(11));
        rig.action(ActionCommand::DeleteWord);
        rig.render();
        assert_eq!(rig.content(0), "Hello ");
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(6)));
    }

    #[test]
    fn test_delete_word_with_selection_deletes_range() {
        let mut rig = Rig::with_content("Hello world", SelectionRange::new(0, 6));
        rig.action(ActionCommand::DeleteWord);
        assert_eq!(rig.content(0), "world");
    }

    #[test]
    fn test_delete_char_at_start_is_noop() {
        let mut rig = Rig::with_content("abc", SelectionRange::caret(0));
        let history_len = rig.buffers.history().len();
        assert_eq!(rig.action(ActionCommand::DeleteChar), DispatchOutcome::Ignored);
        assert_eq!(rig.content(0), "abc");
        assert_eq!(rig.buffers.history().len(), history_len);
    }

    #[test]
    fn test_delete_char_before_caret_and_range() {
        let mut rig = Rig::with_content("abcdef", SelectionRange::caret(3));
        rig.action(ActionCommand::DeleteChar);
        assert_eq!(rig.content(0), "abdef");
        rig.render();

        rig.carets.set(BufferId(0), SelectionRange::new(1, 3));
        rig.action(ActionCommand::DeleteChar);
        assert_eq!(rig.content(0), "aef");
    }

    #[test]
    fn test_delete_char_without_caret_trims_end() {
        let mut rig = Rig::with_content("abc", SelectionRange::caret(1));
        rig.carets.forget(BufferId(0));
        rig.action(ActionCommand::DeleteChar);
        assert_eq!(rig.content(0), "ab");
        assert!(!rig.dispatcher.has_pending());
    }

    #[test]
    fn test_clear_all_ignores_selection() {
        let mut rig = Rig::with_content("some text", SelectionRange::new(2, 4));
        assert_eq!(rig.action(ActionCommand::ClearAll), DispatchOutcome::Edited(BufferId(0)));
        assert_eq!(rig.content(0), "");
        assert_eq!(rig.focus.current_focus().selection, SelectionRange::caret(0));
    }

    #[test]
    fn test_clear_all_restores_caret_to_start() {
        let mut rig = Rig::with_content("hello", SelectionRange::caret(5));
        rig.action(ActionCommand::ClearAll);
        assert!(rig.dispatcher.has_pending());
        rig.render();
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(0)));
    }

    #[test]
    fn test_clear_all_without_caret_schedules_nothing() {
        let mut rig = Rig::with_content("hello", SelectionRange::caret(5));
        rig.carets.forget(BufferId(0));
        rig.action(ActionCommand::ClearAll);
        assert_eq!(rig.content(0), "");
        assert!(!rig.dispatcher.has_pending());
    }

    #[test]
    fn test_undo_redo_need_no_focus() {
        let mut rig = Rig::new(RestorePolicy::default());
        rig.buffers.set_content(BufferId(0), "text".to_string());
        assert_eq!(rig.action(ActionCommand::Undo), DispatchOutcome::HistoryMoved);
        assert_eq!(rig.content(0), "");
        assert_eq!(rig.action(ActionCommand::Undo), DispatchOutcome::Ignored);
        assert_eq!(rig.action(ActionCommand::Redo), DispatchOutcome::HistoryMoved);
        assert_eq!(rig.content(0), "text");
        assert_eq!(rig.action(ActionCommand::Redo), DispatchOutcome::Ignored);
    }

    #[test]
    fn test_style_goes_to_presentation_only() {
        let mut rig = Rig::new(RestorePolicy::default());
        let command = StyleCommand::new(StyleProperty::Color, "red");
        assert_eq!(rig.send(InputEvent::Style(command.clone())), DispatchOutcome::Ignored);

        rig.select(BufferId(0), SelectionRange::caret(0));
        assert_eq!(
            rig.send(InputEvent::Style(command.clone())),
            DispatchOutcome::Styled(BufferId(0), command)
        );
        assert_eq!(rig.buffers.history().len(), 1);
    }

    #[test]
    fn test_focus_change_cancels_stale_restore() {
        let mut rig = Rig::with_content("abc", SelectionRange::caret(3));
        rig.buffers.add_buffer();
        rig.type_text("d");

        // Focus moves before the host got to render.
        rig.select(BufferId(1), SelectionRange::caret(0));
        assert!(!rig.dispatcher.has_pending());
        rig.render();
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(3)));
    }

    #[test]
    fn test_target_original_policy_restores_old_buffer() {
        let mut rig = Rig::new(RestorePolicy::TargetOriginal);
        rig.buffers.set_content(BufferId(0), "abc".to_string());
        rig.buffers.add_buffer();
        rig.select(BufferId(0), SelectionRange::caret(3));
        rig.type_text("d");

        rig.select(BufferId(1), SelectionRange::caret(0));
        assert!(rig.dispatcher.has_pending());
        rig.render();
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(4)));
        // Focus stays on the newly focused buffer.
        assert_eq!(rig.focus.current_focus().active_id, Some(BufferId(1)));
        assert_eq!(rig.focus.current_focus().selection, SelectionRange::caret(0));
    }

    #[test]
    fn test_selection_report_overrides_queued_restore() {
        for policy in [RestorePolicy::CancelOnFocusChange, RestorePolicy::TargetOriginal] {
            let mut rig = Rig::new(policy);
            rig.select(BufferId(0), SelectionRange::caret(0));
            rig.type_text("abc");
            assert!(rig.dispatcher.has_pending());

            rig.select(BufferId(0), SelectionRange::caret(1));
            assert!(!rig.dispatcher.has_pending());
            rig.type_text("X");
            assert_eq!(rig.content(0), "aXbc", "{:?}", policy);
        }
    }

    #[test]
    fn test_multichar_insert_counts_chars() {
        let mut rig = Rig::with_content("día", SelectionRange::caret(1));
        rig.type_text("ñé");
        rig.render();
        assert_eq!(rig.content(0), "dñéía");
        assert_eq!(rig.carets.query(BufferId(0)), Some(SelectionRange::caret(3)));
    }
}
