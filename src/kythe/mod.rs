//! Client side of the Kythe cross-reference service.
//!
//! This module provides:
//! - Wire types for the `search`, `decorations` and `xrefs` endpoints
//! - `XrefService`, the request/response seam the resolver talks to
//! - `HttpXrefService`, the JSON-over-HTTP implementation
//! - Locator string parsing

mod http;
pub mod locator;
pub mod types;

pub use http::HttpXrefService;
pub use types::{
    CrossReferenceSet, CrossReferencesReply, CrossReferencesRequest, DecorationsReply,
    DecorationsRequest, DefinitionEntry, DocumentationEntry, Point, Reference, SearchReply,
    SearchRequest,
};

use crate::error::Result;

/// The indexing service, one method per endpoint.
///
/// Implementations are stateless request/response; callers chain them.
#[tower_lsp::async_trait]
pub trait XrefService: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply>;

    async fn decorations(&self, request: &DecorationsRequest) -> Result<DecorationsReply>;

    async fn cross_references(
        &self,
        request: &CrossReferencesRequest,
    ) -> Result<CrossReferencesReply>;
}

#[tower_lsp::async_trait]
impl<S: XrefService + ?Sized> XrefService for std::sync::Arc<S> {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply> {
        (**self).search(request).await
    }

    async fn decorations(&self, request: &DecorationsRequest) -> Result<DecorationsReply> {
        (**self).decorations(request).await
    }

    async fn cross_references(
        &self,
        request: &CrossReferencesRequest,
    ) -> Result<CrossReferencesReply> {
        (**self).cross_references(request).await
    }
}
