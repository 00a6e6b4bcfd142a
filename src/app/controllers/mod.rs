//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that own and mutate editor state:
//! - Buffer set management
//! - Undo/redo history
//! - Focus tracking
//! - Virtual keyboard dispatch

pub mod buffers;
pub mod dispatcher;
pub mod focus;
pub mod history;
