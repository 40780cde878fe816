//! Occurrence highlighting.

use tower_lsp::lsp_types::{DocumentHighlight, DocumentHighlightKind};

use super::position::range_between;
use crate::navigation::Marker;

/// Convert occurrence markers to document highlights against `source`.
pub fn highlights_for_markers(source: &str, markers: &[Marker]) -> Vec<DocumentHighlight> {
    markers
        .iter()
        .map(|m| DocumentHighlight {
            range: range_between(
                source,
                (m.start_line, m.start_column),
                (m.end_line, m.end_column),
            ),
            kind: Some(DocumentHighlightKind::TEXT),
        })
        .collect()
}
