//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Named file persistence
//! - Notifications
//! - Text edits on char offsets
//! - The line-oriented driver script

pub mod notify;
pub mod script;
pub mod store;
pub mod text_ops;
