//! Host-callable navigation operations.

use tokio_util::sync::CancellationToken;

use super::resolver::{documentation_of, JumpTarget, Resolver};
use super::span::{
    co_occurring_spans, find_containing_spans, pick_tightest, AnchorSpan, CursorPosition,
};
use crate::documentation::{format_documentation, DocFragment};
use crate::error::{Error, Result};
use crate::kythe::{locator, XrefService};

/// The document an operation runs against.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// Path of the file as indexed, relative to the corpus root.
    pub path: String,
    /// Language tag, e.g. `java`.
    pub language: String,
    /// Current editor text, including unsaved edits.
    pub text: String,
}

/// A highlighted occurrence: 0-based lines, 0-based byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl From<&AnchorSpan> for Marker {
    fn from(span: &AnchorSpan) -> Self {
        Self {
            start_line: span.start_line.saturating_sub(1),
            end_line: span.end_line.saturating_sub(1),
            start_column: span.start_column,
            end_column: span.end_column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSummary {
    pub path: String,
    pub snippet: String,
}

/// Tooltip payload for the span under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub definition: Option<DefinitionSummary>,
    pub documentation: Option<Vec<DocFragment>>,
    pub span: AnchorSpan,
}

/// Operations the editor integration calls.
///
/// `None` means nothing was found, the service failed, or the request was
/// cancelled; callers treat all three the same.
#[tower_lsp::async_trait]
pub trait NavigationHandler: Send + Sync {
    fn handles_language(&self, language: &str) -> bool;

    /// Every occurrence of the symbols under the cursor.
    async fn highlight_occurrences(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Vec<Marker>>;

    /// Definition sites of the symbols under the cursor, narrowest span first.
    async fn jump_to_definition(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Vec<JumpTarget>>;

    /// Definition and documentation of the innermost symbol under the cursor.
    async fn tooltip(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Hint>;
}

/// [`NavigationHandler`] backed by a Kythe service.
pub struct KytheHandler<S> {
    service: S,
    languages: Vec<String>,
}

impl<S: XrefService> KytheHandler<S> {
    pub fn new(service: S, languages: Vec<String>) -> Self {
        Self { service, languages }
    }

    /// Reference spans of `doc` as the service sees its current text.
    async fn references(
        &self,
        resolver: &Resolver<'_, S>,
        doc: &DocumentSnapshot,
    ) -> Result<Vec<AnchorSpan>> {
        let ticket = resolver.resolve_file_ticket(&doc.path).await?;
        resolver.fetch_references(&ticket, Some(&doc.text)).await
    }

    async fn markers(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Result<Vec<Marker>> {
        let resolver = Resolver::new(&self.service, cancel);
        let spans = self.references(&resolver, doc).await?;
        Ok(co_occurring_spans(cursor, &spans)
            .into_iter()
            .map(Marker::from)
            .collect())
    }

    async fn definitions(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Result<Vec<JumpTarget>> {
        let resolver = Resolver::new(&self.service, cancel);
        let spans = self.references(&resolver, doc).await?;

        let mut containing = find_containing_spans(cursor, &spans);
        containing.sort_by_key(|span| span.width());
        let mut targets: Vec<&str> = Vec::new();
        for span in containing {
            if !targets.contains(&span.target.as_str()) {
                targets.push(&span.target);
            }
        }

        let mut jumps = Vec::new();
        for target in targets {
            match resolver.resolve_definition(target).await {
                Ok(jump) => jumps.push(jump),
                Err(err @ (Error::NotFound(_) | Error::MalformedLocator { .. })) => {
                    tracing::debug!(ticket = target, "skipping target: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        if jumps.is_empty() {
            return Err(Error::NotFound("no definition under cursor".to_string()));
        }
        Ok(jumps)
    }

    async fn hint(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Result<Hint> {
        let resolver = Resolver::new(&self.service, cancel);
        let spans = self.references(&resolver, doc).await?;
        let containing = find_containing_spans(cursor, &spans);
        let span = pick_tightest(&containing)
            .ok_or_else(|| Error::NotFound("no reference under cursor".to_string()))?;

        let xrefs = resolver.cross_references(&span.target).await?;
        if xrefs.definition.is_empty() && xrefs.documentation.is_empty() {
            return Err(Error::NotFound(format!(
                "no definition or documentation for `{}`",
                span.target
            )));
        }

        let definition = match xrefs.definition.first() {
            Some(def) => Some(DefinitionSummary {
                path: locator::path(&def.parent)?,
                snippet: def.snippet.trim().to_string(),
            }),
            None => None,
        };
        let documentation = xrefs.documentation.first().map(|entry| {
            let blob = documentation_of(entry);
            format_documentation(&blob.language, &blob.raw_text)
        });

        Ok(Hint {
            definition,
            documentation,
            span: span.clone(),
        })
    }
}

#[tower_lsp::async_trait]
impl<S: XrefService> NavigationHandler for KytheHandler<S> {
    fn handles_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    async fn highlight_occurrences(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Vec<Marker>> {
        if !self.handles_language(&doc.language) {
            return None;
        }
        settle("highlight", self.markers(doc, cursor, cancel).await)
    }

    async fn jump_to_definition(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Vec<JumpTarget>> {
        if !self.handles_language(&doc.language) {
            return None;
        }
        settle("definition", self.definitions(doc, cursor, cancel).await)
    }

    async fn tooltip(
        &self,
        doc: &DocumentSnapshot,
        cursor: CursorPosition,
        cancel: &CancellationToken,
    ) -> Option<Hint> {
        if !self.handles_language(&doc.language) {
            return None;
        }
        settle("tooltip", self.hint(doc, cursor, cancel).await)
    }
}

/// Collapse a chain's outcome into the "result or nothing" the host expects.
fn settle<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_quiet() => {
            tracing::debug!(operation, "no result: {err}");
            None
        }
        Err(err) => {
            tracing::warn!(operation, "lookup failed: {err}");
            None
        }
    }
}
