//! Text utilities for position conversion.
//!
//! The indexing service speaks byte offsets and byte columns; the editor speaks
//! 0-based lines with UTF-16 columns. `LineIndex` covers the first, the column
//! helpers at the bottom bridge to the second.

/// A 1-based line with a 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl LineColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Byte offsets of every newline in a source blob, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    /// Scan the source once, recording each `\n`.
    pub fn new(source: &str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect();
        Self { newlines }
    }

    pub fn newlines(&self) -> &[usize] {
        &self.newlines
    }

    /// Convert a byte offset to a line and column.
    ///
    /// A newline byte belongs to the line it terminates, so the offset of the last
    /// newline still gets its true column. Offsets past it fall back to the last
    /// terminated line with column 0; callers rely on this for trailing content,
    /// so it is not an error. Source without any newline falls back to line 0.
    pub fn byte_offset_to_line_column(&self, offset: usize) -> LineColumn {
        let line = self.newlines.partition_point(|&nl| nl < offset);
        if line == self.newlines.len() {
            return LineColumn::new(self.newlines.len() as u32, 0);
        }

        let line_start = self.line_start(line);
        LineColumn::new(line as u32 + 1, (offset - line_start) as u32)
    }

    /// Inverse of [`byte_offset_to_line_column`](Self::byte_offset_to_line_column)
    /// for positions on a newline-terminated line.
    pub fn line_column_to_byte_offset(&self, position: LineColumn) -> Option<usize> {
        let line = (position.line as usize).checked_sub(1)?;
        let line_end = *self.newlines.get(line)?;
        let offset = self.line_start(line) + position.column as usize;
        (offset <= line_end).then_some(offset)
    }

    /// Byte offset where the 0-based `line` begins.
    fn line_start(&self, line: usize) -> usize {
        match line {
            0 => 0,
            _ => self.newlines[line - 1] + 1,
        }
    }
}

/// Text of the 0-based `line`, without its terminator.
pub fn line_text(source: &str, line: usize) -> Option<&str> {
    source
        .split('\n')
        .nth(line)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// Convert an editor (UTF-16) column into a byte column on `line`.
///
/// Columns past the end of the line map to the line's byte length.
pub fn utf16_to_byte_column(line: &str, utf16_column: u32) -> usize {
    let mut utf16 = 0u32;
    for (i, c) in line.char_indices() {
        if utf16 >= utf16_column {
            return i;
        }
        utf16 += c.len_utf16() as u32;
    }
    line.len()
}

/// Convert a byte column on `line` into an editor (UTF-16) column.
pub fn byte_to_utf16_column(line: &str, byte_column: usize) -> u32 {
    let mut col = 0u32;
    for (i, c) in line.char_indices() {
        if i >= byte_column {
            break;
        }
        col += c.len_utf16() as u32;
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_newline_offsets() {
        let idx = LineIndex::new("ab\ncd\n");
        assert_eq!(idx.newlines(), &[2, 5]);
        assert!(LineIndex::new("no newline").newlines().is_empty());
    }

    #[test]
    fn offsets_to_line_column() {
        let idx = LineIndex::new("ab\ncd\n");
        assert_eq!(idx.byte_offset_to_line_column(0), LineColumn::new(1, 0));
        assert_eq!(idx.byte_offset_to_line_column(1), LineColumn::new(1, 1));
        assert_eq!(idx.byte_offset_to_line_column(2), LineColumn::new(1, 2));
        assert_eq!(idx.byte_offset_to_line_column(3), LineColumn::new(2, 0));
        assert_eq!(idx.byte_offset_to_line_column(4), LineColumn::new(2, 1));
        // The last newline itself is still on line 2.
        assert_eq!(idx.byte_offset_to_line_column(5), LineColumn::new(2, 2));
    }

    #[test]
    fn past_end_falls_back_to_last_line() {
        let idx = LineIndex::new("ab\ncd\n");
        assert_eq!(idx.byte_offset_to_line_column(6), LineColumn::new(2, 0));
        assert_eq!(idx.byte_offset_to_line_column(600), LineColumn::new(2, 0));

        // Trailing content without a final newline hits the same fallback.
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.byte_offset_to_line_column(4), LineColumn::new(1, 0));

        let idx = LineIndex::new("abc");
        assert_eq!(idx.byte_offset_to_line_column(1), LineColumn::new(0, 0));
    }

    #[test]
    fn round_trips_every_offset() {
        for source in ["a\n", "ab\ncd\n", "\n\n\n", "fn main() {\n    x();\n}\n"] {
            let idx = LineIndex::new(source);
            for offset in 0..source.len() {
                let pos = idx.byte_offset_to_line_column(offset);
                assert_eq!(
                    idx.line_column_to_byte_offset(pos),
                    Some(offset),
                    "offset {offset} in {source:?}"
                );
            }
        }
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let idx = LineIndex::new("ab\ncd\n");
        assert_eq!(idx.line_column_to_byte_offset(LineColumn::new(0, 0)), None);
        assert_eq!(idx.line_column_to_byte_offset(LineColumn::new(3, 0)), None);
        assert_eq!(idx.line_column_to_byte_offset(LineColumn::new(1, 3)), None);
    }

    #[test]
    fn line_text_strips_terminators() {
        let source = "one\r\ntwo\nthree";
        assert_eq!(line_text(source, 0), Some("one"));
        assert_eq!(line_text(source, 1), Some("two"));
        assert_eq!(line_text(source, 2), Some("three"));
        assert_eq!(line_text(source, 3), None);
    }

    #[test]
    fn utf16_handling() {
        // '😀' is 4 bytes in UTF-8 but 2 code units in UTF-16
        let line = "a😀b";
        assert_eq!(utf16_to_byte_column(line, 0), 0);
        assert_eq!(utf16_to_byte_column(line, 1), 1);
        assert_eq!(utf16_to_byte_column(line, 3), 5);
        assert_eq!(utf16_to_byte_column(line, 10), line.len());

        assert_eq!(byte_to_utf16_column(line, 5), 3);
        assert_eq!(byte_to_utf16_column(line, 1), 1);
    }
}
