//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with the outside world:
//! - Caret access for the widgets showing buffers
//! - Logging setup
//! - Error types

pub mod cursor;
pub mod error;
pub mod logging;
