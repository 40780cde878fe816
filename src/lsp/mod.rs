//! LSP protocol feature implementations.
//!
//! This module provides implementations for LSP features:
//! - Document highlights from occurrence markers
//! - Go-to-definition locations from jump targets
//! - Hover rendering for definition and documentation hints

mod goto;
mod highlight;
mod hover;
mod position;

pub use goto::locations_for_targets;
pub use highlight::highlights_for_markers;
pub use hover::{format_fragments, format_hint, hover_for_hint};
pub use position::cursor_at;
