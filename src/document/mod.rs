//! Document state management and text utilities.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> line/column conversion
//! - UTF-16 column helpers for editor positions
//! - `DocumentState` and `DocumentStore` for document lifecycle and cancellation

mod state;
mod text;

pub use state::{language_for_path, DocumentStore, Operation};
pub use text::{byte_to_utf16_column, line_text, utf16_to_byte_column, LineColumn, LineIndex};
