//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Buffers and the buffer set
//! - Focus and selection ranges
//! - Input events coming from the virtual keyboard
//! - Presentation styles and editor settings

pub mod buffer;
pub mod focus;
pub mod keyboard;
pub mod messages;
pub mod settings;
pub mod style;

pub use buffer::{Buffer, BufferId, BufferSet};
pub use focus::{FocusState, SelectionRange};
pub use messages::{ActionCommand, InputEvent, StyleCommand, StyleProperty};
pub use settings::EditorSettings;
pub use style::PresentationStyle;
