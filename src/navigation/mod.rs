//! Cursor-driven navigation over cross-reference data.
//!
//! This module provides:
//! - Span matching against the cursor (`span`)
//! - Chained service lookups for definitions and documentation (`resolver`)
//! - The host-callable operations tying them together (`handler`)

mod handler;
mod resolver;
mod span;

pub use handler::{
    DefinitionSummary, DocumentSnapshot, Hint, KytheHandler, Marker, NavigationHandler,
};
pub use resolver::{documentation_of, Decorations, Documentation, JumpTarget, Resolver};
pub use span::{
    co_occurring_spans, find_containing_spans, group_by_target, pick_tightest, AnchorSpan,
    CursorPosition,
};
