use std::str::FromStr;

/// Presentation property a style command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProperty {
    Font,
    Size,
    Color,
}

impl StyleProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProperty::Font => "font",
            StyleProperty::Size => "size",
            StyleProperty::Color => "color",
        }
    }
}

impl FromStr for StyleProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "font" => Ok(StyleProperty::Font),
            "size" => Ok(StyleProperty::Size),
            "color" | "colour" => Ok(StyleProperty::Color),
            other => Err(format!("unknown style property '{}'", other)),
        }
    }
}

/// Pure presentation change for the focused buffer. Never touches content
/// and never reaches the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCommand {
    pub property: StyleProperty,
    pub value: String,
}

impl StyleCommand {
    pub fn new(property: StyleProperty, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCommand {
    DeleteChar,
    DeleteWord,
    ClearAll,
    Undo,
    Redo,
}

impl FromStr for ActionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "deletechar" | "backspace" => Ok(ActionCommand::DeleteChar),
            "deleteword" => Ok(ActionCommand::DeleteWord),
            "clearall" | "clear" => Ok(ActionCommand::ClearAll),
            "undo" => Ok(ActionCommand::Undo),
            "redo" => Ok(ActionCommand::Redo),
            _ => Err(format!("unknown action '{}'", s)),
        }
    }
}

/// Everything the virtual keyboard can send to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Literal text; usually one char, several for composed keys.
    Char(String),
    Style(StyleCommand),
    Action(ActionCommand),
}
