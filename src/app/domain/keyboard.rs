use super::messages::{ActionCommand, InputEvent};

pub const SPACE_KEY: &str = "Space";
pub const BACKSPACE_KEY: &str = "Backspace";

/// On-screen key grid, top row first.
pub const LAYOUT: [&[&str]; 4] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
    &[SPACE_KEY, BACKSPACE_KEY],
];

/// Translate a key label from the grid into the event it emits.
///
/// Letter keys type themselves (labels are upper case, like the keycaps),
/// `Space` types a single space and `Backspace` deletes one char. Returns
/// `None` for labels that are not on the keyboard.
pub fn key_event(label: &str) -> Option<InputEvent> {
    match label {
        SPACE_KEY => Some(InputEvent::Char(" ".to_string())),
        BACKSPACE_KEY => Some(InputEvent::Action(ActionCommand::DeleteChar)),
        _ if is_on_layout(label) => Some(InputEvent::Char(label.to_string())),
        _ => None,
    }
}

fn is_on_layout(label: &str) -> bool {
    LAYOUT.iter().any(|row| row.contains(&label))
}
