use super::messages::{StyleCommand, StyleProperty};

/// How one buffer is drawn. Lives entirely on the presentation side; the
/// engine never versions or persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationStyle {
    pub font: String,
    pub size: u32,
    pub color: String,
}

impl PresentationStyle {
    /// Apply a style command. Returns false when the value is unusable
    /// (a size that is not a positive integer, or an empty font/color),
    /// leaving the style unchanged.
    pub fn apply(&mut self, command: &StyleCommand) -> bool {
        let value = command.value.trim();
        match command.property {
            StyleProperty::Font => {
                if value.is_empty() {
                    return false;
                }
                self.font = value.to_string();
            }
            StyleProperty::Size => match value.trim_end_matches("px").parse::<u32>() {
                Ok(size) if size > 0 => self.size = size,
                _ => return false,
            },
            StyleProperty::Color => {
                if value.is_empty() {
                    return false;
                }
                self.color = value.to_string();
            }
        }
        true
    }
}

impl Default for PresentationStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            size: 16,
            color: "black".to_string(),
        }
    }
}
