//! Go-to-definition locations.

use std::path::Path;

use tower_lsp::lsp_types::{Location, Position, Range, Url};

use crate::navigation::JumpTarget;

/// Turn jump targets into file locations under `corpus_root`.
///
/// Targets whose path cannot form a file URL are dropped.
pub fn locations_for_targets(corpus_root: &Path, targets: &[JumpTarget]) -> Vec<Location> {
    targets
        .iter()
        .filter_map(|target| {
            let uri = Url::from_file_path(corpus_root.join(&target.path)).ok()?;
            let position = Position::new(target.line, target.column);
            Some(Location::new(uri, Range::new(position, position)))
        })
        .collect()
}
