//! Matching reference spans against the editor cursor.

use std::collections::HashMap;

use crate::kythe::types::{Reference, EDGE_DEFINES, EDGE_DOCUMENTS};

/// Extent of one reference in a file, as reported by the decorations endpoint.
///
/// Lines are 1-based, columns are 0-based byte columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpan {
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
    /// Edge kind, e.g. `/kythe/edge/ref`.
    pub kind: String,
    /// Ticket of the referenced entity.
    pub target: String,
}

impl AnchorSpan {
    pub fn width(&self) -> u32 {
        self.end_column.saturating_sub(self.start_column)
    }

    /// `documents` and `defines` edges describe structure, not usage sites.
    pub fn is_structural(&self) -> bool {
        self.kind == EDGE_DOCUMENTS || self.kind == EDGE_DEFINES
    }

    /// Whether the cursor sits on this span's start or end line, inside
    /// `[start_column, end_column)`.
    pub fn contains(&self, cursor: CursorPosition) -> bool {
        let line = cursor.line();
        (self.start_line == line || self.end_line == line)
            && cursor.column >= self.start_column
            && cursor.column < self.end_column
    }
}

impl From<&Reference> for AnchorSpan {
    fn from(r: &Reference) -> Self {
        Self {
            start_line: r.anchor_start.line_number,
            end_line: r.anchor_end.line_number,
            start_column: r.anchor_start.column_offset,
            end_column: r.anchor_end.column_offset,
            kind: r.kind.clone(),
            target: r.target_ticket.clone(),
        }
    }
}

/// Editor cursor: 0-based row, 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: u32,
    pub column: u32,
}

impl CursorPosition {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// 1-based line, comparable with [`AnchorSpan`] lines.
    pub fn line(&self) -> u32 {
        self.row + 1
    }
}

/// Usage spans under the cursor, in input order.
pub fn find_containing_spans(cursor: CursorPosition, spans: &[AnchorSpan]) -> Vec<&AnchorSpan> {
    spans
        .iter()
        .filter(|span| !span.is_structural() && span.contains(cursor))
        .collect()
}

/// Spans keyed by target ticket, each list in input order.
pub fn group_by_target<'a>(
    spans: impl IntoIterator<Item = &'a AnchorSpan>,
) -> HashMap<&'a str, Vec<&'a AnchorSpan>> {
    let mut groups: HashMap<&str, Vec<&AnchorSpan>> = HashMap::new();
    for span in spans {
        groups.entry(span.target.as_str()).or_default().push(span);
    }
    groups
}

/// Every span sharing a target with a span under the cursor, in input order.
///
/// Structural spans are included here: the defining anchor of a symbol is
/// highlighted alongside its uses.
pub fn co_occurring_spans(cursor: CursorPosition, spans: &[AnchorSpan]) -> Vec<&AnchorSpan> {
    let targets = group_by_target(find_containing_spans(cursor, spans));
    spans
        .iter()
        .filter(|span| targets.contains_key(span.target.as_str()))
        .collect()
}

/// The narrowest span; ties go to the first one seen.
pub fn pick_tightest<'a>(spans: &[&'a AnchorSpan]) -> Option<&'a AnchorSpan> {
    spans.iter().copied().min_by_key(|span| span.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: u32, start: u32, end: u32, kind: &str, target: &str) -> AnchorSpan {
        AnchorSpan {
            start_line: line,
            end_line: line,
            start_column: start,
            end_column: end,
            kind: kind.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn column_bounds_are_half_open() {
        let spans = vec![span(1, 4, 8, "/kythe/edge/ref", "t")];
        assert_eq!(find_containing_spans(CursorPosition::new(0, 4), &spans).len(), 1);
        assert_eq!(find_containing_spans(CursorPosition::new(0, 7), &spans).len(), 1);
        assert!(find_containing_spans(CursorPosition::new(0, 8), &spans).is_empty());
        assert!(find_containing_spans(CursorPosition::new(0, 3), &spans).is_empty());
    }

    #[test]
    fn matches_on_start_or_end_line() {
        let multiline = AnchorSpan {
            start_line: 2,
            end_line: 4,
            start_column: 1,
            end_column: 6,
            kind: "/kythe/edge/ref".into(),
            target: "t".into(),
        };
        let spans = vec![multiline];
        assert_eq!(find_containing_spans(CursorPosition::new(1, 2), &spans).len(), 1);
        assert_eq!(find_containing_spans(CursorPosition::new(3, 2), &spans).len(), 1);
        assert!(find_containing_spans(CursorPosition::new(2, 2), &spans).is_empty());
    }

    #[test]
    fn excludes_structural_edges() {
        let spans = vec![
            span(1, 0, 10, EDGE_DOCUMENTS, "doc"),
            span(1, 0, 10, EDGE_DEFINES, "def"),
            span(1, 0, 10, "/kythe/edge/ref", "use"),
        ];
        let found = find_containing_spans(CursorPosition::new(0, 3), &spans);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, "use");
    }

    #[test]
    fn zero_width_span_never_contains() {
        let spans = vec![span(1, 0, 0, "/kythe/edge/ref", "t")];
        assert!(find_containing_spans(CursorPosition::new(0, 0), &spans).is_empty());
    }

    #[test]
    fn tightest_prefers_narrow_span() {
        let spans = vec![
            span(1, 0, 10, "/kythe/edge/ref", "outer"),
            span(1, 2, 5, "/kythe/edge/ref", "inner"),
        ];
        let containing = find_containing_spans(CursorPosition::new(0, 3), &spans);
        assert_eq!(pick_tightest(&containing).unwrap().target, "inner");
    }

    #[test]
    fn tightest_tie_goes_to_first() {
        let spans = vec![
            span(1, 2, 5, "/kythe/edge/ref", "first"),
            span(1, 2, 5, "/kythe/edge/ref/call", "second"),
        ];
        let containing = find_containing_spans(CursorPosition::new(0, 2), &spans);
        assert_eq!(pick_tightest(&containing).unwrap().target, "first");
        assert!(pick_tightest(&[]).is_none());
    }

    #[test]
    fn co_occurrences_include_other_lines_and_definitions() {
        let spans = vec![
            span(1, 6, 9, EDGE_DEFINES, "x"),
            span(3, 4, 7, "/kythe/edge/ref", "x"),
            span(3, 10, 13, "/kythe/edge/ref", "y"),
            span(5, 0, 3, "/kythe/edge/ref", "x"),
        ];
        let marked = co_occurring_spans(CursorPosition::new(2, 5), &spans);
        let lines: Vec<u32> = marked.iter().map(|s| s.start_line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
        assert!(marked.iter().all(|s| s.target == "x"));

        assert!(co_occurring_spans(CursorPosition::new(2, 0), &spans).is_empty());
    }

    #[test]
    fn groups_preserve_order() {
        let spans = vec![
            span(1, 0, 1, "/kythe/edge/ref", "a"),
            span(2, 0, 1, "/kythe/edge/ref", "b"),
            span(3, 0, 1, "/kythe/edge/ref", "a"),
        ];
        let groups = group_by_target(&spans);
        assert_eq!(groups.len(), 2);
        let a: Vec<u32> = groups["a"].iter().map(|s| s.start_line).collect();
        assert_eq!(a, vec![1, 3]);
    }
}
