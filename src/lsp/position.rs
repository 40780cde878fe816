//! Conversion between editor positions and index coordinates.

use tower_lsp::lsp_types::{Position, Range};

use crate::document::{byte_to_utf16_column, line_text, utf16_to_byte_column};
use crate::navigation::CursorPosition;

/// Editor position to a cursor with a byte column.
pub fn cursor_at(source: &str, position: Position) -> CursorPosition {
    let column = match line_text(source, position.line as usize) {
        Some(line) => utf16_to_byte_column(line, position.character) as u32,
        None => position.character,
    };
    CursorPosition::new(position.line, column)
}

/// 0-based line and byte column to an editor position.
pub fn position_at(source: &str, line: u32, byte_column: u32) -> Position {
    let character = match line_text(source, line as usize) {
        Some(text) => byte_to_utf16_column(text, byte_column as usize),
        None => byte_column,
    };
    Position::new(line, character)
}

pub fn range_between(source: &str, start: (u32, u32), end: (u32, u32)) -> Range {
    Range::new(
        position_at(source, start.0, start.1),
        position_at(source, end.0, end.1),
    )
}
