//! Line-oriented command language for driving a session without a GUI.
//!
//! Each non-blank line is one command; `#` starts a comment line.
//!
//! ```text
//! select 0 0        # caret at offset 0 of buffer 0, and focus it
//! type Hello world
//! key Backspace
//! action deleteWord
//! style color red
//! add
//! save notes
//! show
//! ```

use std::io::Write;

use crate::app::domain::buffer::BufferId;
use crate::app::domain::focus::SelectionRange;
use crate::app::domain::messages::{ActionCommand, InputEvent, StyleCommand, StyleProperty};
use crate::app::infrastructure::cursor::{CaretTable, CursorQuery};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::state::EditorSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Input(InputEvent),
    Key(String),
    /// Move the widget caret and focus the buffer, like a click.
    Select(BufferId, SelectionRange),
    /// Focus a buffer at whatever caret its widget reports.
    Focus(BufferId),
    /// Make a widget stop reporting its caret.
    DropCaret(BufferId),
    AddBuffer,
    RemoveBuffer(BufferId),
    Save(String),
    Open(String),
    Delete(String),
    List,
    Show,
    Quit,
}

/// Parse one line. Blank lines and comments give `Ok(None)`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ScriptCommand>> {
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed.trim_end(), ""),
    };
    let err = |message: String| AppError::Script {
        line: line_no,
        message,
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word.to_ascii_lowercase().as_str() {
        // Typed text keeps its inner and trailing spaces.
        "type" => {
            if rest.is_empty() {
                return Err(err("type needs some text".to_string()));
            }
            ScriptCommand::Input(InputEvent::Char(rest.to_string()))
        }
        "key" => match args.as_slice() {
            [label] => ScriptCommand::Key(label.to_string()),
            _ => return Err(err("usage: key <label>".to_string())),
        },
        "action" => match args.as_slice() {
            [name] => ScriptCommand::Input(InputEvent::Action(name.parse().map_err(err)?)),
            _ => return Err(err("usage: action <name>".to_string())),
        },
        "undo" => ScriptCommand::Input(InputEvent::Action(ActionCommand::Undo)),
        "redo" => ScriptCommand::Input(InputEvent::Action(ActionCommand::Redo)),
        "style" => match args.as_slice() {
            [property, value @ ..] if !value.is_empty() => {
                let property: StyleProperty = property.parse().map_err(err)?;
                ScriptCommand::Input(InputEvent::Style(StyleCommand::new(property, value.join(" "))))
            }
            _ => return Err(err("usage: style <font|size|color> <value>".to_string())),
        },
        "select" => {
            let numbers = parse_numbers(&args).map_err(err)?;
            match numbers.as_slice() {
                [id, start] => ScriptCommand::Select(BufferId(*id), SelectionRange::caret(*start)),
                [id, start, end] => ScriptCommand::Select(BufferId(*id), SelectionRange::new(*start, *end)),
                _ => return Err(err("usage: select <id> <start> [end]".to_string())),
            }
        }
        "focus" => ScriptCommand::Focus(single_id(&args).map_err(err)?),
        "nocaret" => ScriptCommand::DropCaret(single_id(&args).map_err(err)?),
        "add" => ScriptCommand::AddBuffer,
        "remove" => ScriptCommand::RemoveBuffer(single_id(&args).map_err(err)?),
        "save" => ScriptCommand::Save(rest.trim().to_string()),
        "open" => ScriptCommand::Open(rest.trim().to_string()),
        "delete" => ScriptCommand::Delete(rest.trim().to_string()),
        "list" => ScriptCommand::List,
        "show" => ScriptCommand::Show,
        "quit" | "exit" => ScriptCommand::Quit,
        other => return Err(err(format!("unknown command '{}'", other))),
    };
    Ok(Some(command))
}

fn parse_numbers(args: &[&str]) -> std::result::Result<Vec<usize>, String> {
    args.iter()
        .map(|a| a.parse::<usize>().map_err(|_| format!("'{}' is not a number", a)))
        .collect()
}

fn single_id(args: &[&str]) -> std::result::Result<BufferId, String> {
    match parse_numbers(args)?.as_slice() {
        [id] => Ok(BufferId(*id)),
        _ => Err("expected a single buffer id".to_string()),
    }
}

/// Run one command against `session`, writing any report to `out`.
/// Returns `false` when the script asked to quit.
///
/// The host re-renders after every command, so queued caret restores are
/// run before this returns.
pub fn execute<W: Write>(
    session: &mut EditorSession<CaretTable>,
    command: ScriptCommand,
    out: &mut W,
) -> Result<bool> {
    match command {
        ScriptCommand::Input(event) => {
            session.handle(event);
        }
        ScriptCommand::Key(label) => {
            session.press_key(&label);
        }
        ScriptCommand::Select(id, selection) => {
            session.cursor_mut().set(id, selection);
            session.focus(id, selection);
        }
        ScriptCommand::Focus(id) => {
            let selection = session.cursor().query(id).unwrap_or_default();
            session.focus(id, selection);
        }
        ScriptCommand::DropCaret(id) => session.cursor_mut().forget(id),
        ScriptCommand::AddBuffer => {
            let id = session.add_buffer();
            writeln!(out, "added buffer {}", id)?;
        }
        ScriptCommand::RemoveBuffer(id) => {
            if session.remove_buffer(id) {
                // Widgets are rebuilt after a removal; old carets are stale.
                session.cursor_mut().clear();
            } else {
                writeln!(out, "buffer {} was not removed", id)?;
            }
        }
        ScriptCommand::Save(name) => {
            session.save(&name);
        }
        ScriptCommand::Open(name) => {
            if session.open(&name) {
                session.cursor_mut().clear();
            }
        }
        ScriptCommand::Delete(name) => {
            session.delete_file(&name);
        }
        ScriptCommand::List => {
            let names = session.saved_files();
            if names.is_empty() {
                writeln!(out, "no saved files")?;
            }
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
        ScriptCommand::Show => show(session, out)?,
        ScriptCommand::Quit => return Ok(false),
    }
    session.after_render();
    Ok(true)
}

/// Print every buffer, the focus and the history position.
pub fn show<W: Write>(session: &EditorSession<CaretTable>, out: &mut W) -> Result<()> {
    let focus = session.current_focus();
    for buffer in session.buffers().buffers() {
        let marker = if focus.active_id == Some(buffer.id) { "*" } else { " " };
        let caret = match session.cursor().query(buffer.id) {
            Some(sel) if sel.is_collapsed() => format!("caret {}", sel.start),
            Some(sel) => format!("selection {}..{}", sel.start, sel.end),
            None => "no caret".to_string(),
        };
        let style = session
            .style(buffer.id)
            .map(|s| format!("{} {}px {}", s.font, s.size, s.color))
            .unwrap_or_default();
        writeln!(
            out,
            "{}[{}] {:?} ({}; {})",
            marker, buffer.id.0, buffer.content, caret, style
        )?;
    }
    let history = session.history();
    writeln!(
        out,
        "history {}/{} at {}",
        history.len(),
        history.capacity(),
        history.cursor()
    )?;
    Ok(())
}
