//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (buffers, focus, input events, settings)
//! - `controllers/` - State owners (buffer set, history, focus, dispatcher)
//! - `services/` - Business operations (file store, notifications, text_ops, script)
//! - `infrastructure/` - External integrations (caret access, logging, error)
//! - `state.rs` - The editing session tying it all together

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::dispatcher::{DispatchOutcome, RestorePolicy};
pub use domain::{
    ActionCommand, BufferId, BufferSet, EditorSettings, FocusState, InputEvent,
    PresentationStyle, SelectionRange, StyleCommand, StyleProperty,
};
pub use infrastructure::cursor::{CaretTable, CursorQuery};
pub use infrastructure::error::{AppError, Result};
pub use services::notify::{LogNotifier, Notifier, Severity};
pub use services::store::FileStore;
pub use state::EditorSession;
