//! Chained lookups against the cross-reference service.
//!
//! Each step depends on the previous one (file ticket, then target ticket, then
//! definition locator), so requests run strictly in sequence and any missing
//! link aborts the whole chain.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::span::AnchorSpan;
use crate::document::LineIndex;
use crate::error::{Error, Result};
use crate::kythe::types::{CrossReferenceSet, DefinitionEntry, DocumentationEntry};
use crate::kythe::{
    locator, CrossReferencesRequest, DecorationsRequest, SearchRequest, XrefService,
};

/// Reference spans for a file, plus its text when requested.
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    pub references: Vec<AnchorSpan>,
    pub source_text: Option<String>,
}

/// Where to jump: corpus-relative path, 0-based line, 0-based byte column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTarget {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

/// Raw documentation for a target, ready for the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documentation {
    pub language: String,
    pub raw_text: String,
}

/// Runs one lookup chain, abandoning it once `cancel` fires.
pub struct Resolver<'a, S: ?Sized> {
    service: &'a S,
    cancel: &'a CancellationToken,
}

impl<'a, S: XrefService + ?Sized> Resolver<'a, S> {
    pub fn new(service: &'a S, cancel: &'a CancellationToken) -> Self {
        Self { service, cancel }
    }

    async fn guard<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            reply = request => reply,
        }
    }

    /// Ticket of the file node indexed under `path`.
    pub async fn resolve_file_ticket(&self, path: &str) -> Result<String> {
        let reply = self
            .guard(self.service.search(&SearchRequest::file(path)))
            .await?;
        reply
            .ticket
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("no file node for `{path}`")))
    }

    /// Reference spans and/or source text, as selected by `request`.
    pub async fn fetch_decorations(&self, request: &DecorationsRequest) -> Result<Decorations> {
        let reply = self.guard(self.service.decorations(request)).await?;
        Ok(Decorations {
            references: reply.reference.iter().map(AnchorSpan::from).collect(),
            source_text: reply.decode_source_text()?,
        })
    }

    /// Reference spans for `ticket`, positioned against `dirty_buffer` when given.
    pub async fn fetch_references(
        &self,
        ticket: &str,
        dirty_buffer: Option<&str>,
    ) -> Result<Vec<AnchorSpan>> {
        let request = DecorationsRequest::references(ticket, dirty_buffer);
        Ok(self.fetch_decorations(&request).await?.references)
    }

    /// Full text of the file node `ticket`.
    pub async fn fetch_source(&self, ticket: &str) -> Result<String> {
        let request = DecorationsRequest::source_text(ticket);
        self.fetch_decorations(&request)
            .await?
            .source_text
            .ok_or_else(|| Error::NotFound(format!("no source text for `{ticket}`")))
    }

    /// Definitions and documentation recorded for `target`.
    pub async fn cross_references(&self, target: &str) -> Result<CrossReferenceSet> {
        let request = CrossReferencesRequest::for_target(target);
        let mut reply = self.guard(self.service.cross_references(&request)).await?;
        reply
            .cross_references
            .remove(target)
            .ok_or_else(|| Error::NotFound(format!("no cross-references for `{target}`")))
    }

    /// Editor location of the first definition of `target`.
    pub async fn resolve_definition(&self, target: &str) -> Result<JumpTarget> {
        let xrefs = self.cross_references(target).await?;
        let definition = xrefs
            .definition
            .first()
            .ok_or_else(|| Error::NotFound(format!("no definition for `{target}`")))?;
        self.locate(definition).await
    }

    /// Convert a definition anchor into an editor location by reading its file.
    ///
    /// A file without any newline yields line 0 from the index, which lands on
    /// row 0, column 0.
    pub async fn locate(&self, definition: &DefinitionEntry) -> Result<JumpTarget> {
        let path = locator::path(&definition.parent)?;
        let source = self.fetch_source(&definition.parent).await?;
        let position =
            LineIndex::new(&source).byte_offset_to_line_column(definition.start.byte_offset);
        Ok(JumpTarget {
            path,
            line: position.line.saturating_sub(1),
            column: position.column,
        })
    }

    /// Documentation attached to `target`.
    pub async fn resolve_documentation(&self, target: &str) -> Result<Documentation> {
        let xrefs = self.cross_references(target).await?;
        xrefs
            .documentation
            .first()
            .map(documentation_of)
            .ok_or_else(|| Error::NotFound(format!("no documentation for `{target}`")))
    }
}

/// Language tag and text of a documentation entry.
///
/// An entry without a `lang` segment is kept; it renders as plain text.
pub fn documentation_of(entry: &DocumentationEntry) -> Documentation {
    Documentation {
        language: locator::language(&entry.parent).unwrap_or_default(),
        raw_text: entry.text.clone(),
    }
}
