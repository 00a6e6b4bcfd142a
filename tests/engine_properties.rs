//! Invariants that must hold in every reachable editor state, checked over
//! random sequences of keyboard, focus and buffer operations.

use proptest::prelude::*;
use tempfile::TempDir;

use key_pad::app::{
    ActionCommand, BufferId, CaretTable, EditorSession, EditorSettings, FileStore, InputEvent,
    LogNotifier, SelectionRange, StyleCommand, StyleProperty,
};

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Action(ActionCommand),
    Style(String),
    Select(usize, usize, usize),
    DropCaret(usize),
    Add,
    Remove(usize),
    Render,
}

fn action_strategy() -> impl Strategy<Value = ActionCommand> {
    prop_oneof![
        Just(ActionCommand::DeleteChar),
        Just(ActionCommand::DeleteWord),
        Just(ActionCommand::ClearAll),
        Just(ActionCommand::Undo),
        Just(ActionCommand::Redo),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => "[a-zé ]{1,4}".prop_map(Op::Type),
        3 => action_strategy().prop_map(Op::Action),
        1 => "[a-z]{1,6}".prop_map(Op::Style),
        3 => (0usize..5, 0usize..12, 0usize..12).prop_map(|(id, a, b)| Op::Select(id, a, b)),
        1 => (0usize..5).prop_map(Op::DropCaret),
        2 => Just(Op::Add),
        2 => (0usize..5).prop_map(Op::Remove),
        2 => Just(Op::Render),
    ]
}

fn new_session(dir: &TempDir) -> EditorSession<CaretTable> {
    EditorSession::new(
        &EditorSettings::default(),
        CaretTable::new(),
        FileStore::new(dir.path()),
        Box::new(LogNotifier),
    )
}

fn apply(session: &mut EditorSession<CaretTable>, op: &Op) {
    match op {
        Op::Type(text) => {
            session.handle(InputEvent::Char(text.clone()));
        }
        Op::Action(action) => {
            session.handle(InputEvent::Action(*action));
        }
        Op::Style(value) => {
            session.handle(InputEvent::Style(StyleCommand::new(StyleProperty::Font, value.clone())));
        }
        Op::Select(id, a, b) => {
            let selection = SelectionRange::new(*a, *b);
            session.cursor_mut().set(BufferId(*id), selection);
            session.focus(BufferId(*id), selection);
        }
        Op::DropCaret(id) => session.cursor_mut().forget(BufferId(*id)),
        Op::Add => {
            session.add_buffer();
        }
        Op::Remove(id) => {
            session.remove_buffer(BufferId(*id));
        }
        Op::Render => {
            session.after_render();
        }
    }
}

fn check_invariants(session: &EditorSession<CaretTable>) -> Result<(), TestCaseError> {
    let set = session.buffers();
    prop_assert!(set.len() >= 1);
    let expected: Vec<BufferId> = (0..set.len()).map(BufferId).collect();
    prop_assert_eq!(set.ids(), expected);

    let history = session.history();
    prop_assert!(history.cursor() < history.len());
    prop_assert!(history.len() <= 30);
    prop_assert_eq!(history.current(), set);

    let focus = session.current_focus();
    if let Some(id) = focus.active_id {
        let buffer = set.get(id);
        prop_assert!(buffer.is_some(), "focused id {:?} out of range", id);
        let len = buffer.map(|b| b.char_len()).unwrap_or(0);
        prop_assert!(focus.selection.start <= focus.selection.end);
        prop_assert!(focus.selection.end <= len);
    }

    for buffer in set.buffers() {
        prop_assert!(session.style(buffer.id).is_some());
    }
    prop_assert!(session.style(BufferId(set.len())).is_none());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_invariants_hold_in_every_state(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        check_invariants(&session)?;
        for op in &ops {
            apply(&mut session, op);
            check_invariants(&session)?;
        }
    }

    /// Undo then redo after one more edit restores the pre- and then the
    /// post-edit buffer set, whatever came before.
    #[test]
    fn prop_undo_redo_round_trip(
        ops in prop::collection::vec(op_strategy(), 0..40),
        text in "[a-z]{1,4}",
    ) {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        for op in &ops {
            apply(&mut session, op);
        }

        session.after_render();
        let target = BufferId(0);
        session.cursor_mut().set(target, SelectionRange::caret(0));
        session.focus(target, SelectionRange::caret(0));

        let before = session.buffers().clone();
        session.handle(InputEvent::Char(text));
        let after = session.buffers().clone();
        prop_assert_ne!(&before, &after);

        session.undo();
        prop_assert_eq!(session.buffers(), &before);
        session.redo();
        prop_assert_eq!(session.buffers(), &after);
    }

    /// A new edit after an undo leaves nothing to redo.
    #[test]
    fn prop_edit_after_undo_discards_redo(
        edits in prop::collection::vec("[a-z]{1,3}", 1..10),
        undos in 1usize..10,
    ) {
        let dir = TempDir::new().unwrap();
        let mut session = new_session(&dir);
        session.focus(BufferId(0), SelectionRange::caret(0));
        for text in &edits {
            session.handle(InputEvent::Char(text.clone()));
        }
        for _ in 0..undos {
            session.undo();
        }

        session.handle(InputEvent::Char("!".to_string()));
        let after_edit = session.buffers().clone();
        prop_assert!(!session.history().can_redo());
        session.redo();
        prop_assert_eq!(session.buffers(), &after_edit);
    }
}
