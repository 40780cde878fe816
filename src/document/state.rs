//! Document state management for the cross-reference server.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tower_lsp::lsp_types::Url;

/// State for a single open document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Full editor text, sent to the service as the dirty buffer.
    pub source: String,
    /// Document version from the client.
    pub version: i32,
    /// Language tag derived from the file extension, if recognised.
    pub language: Option<&'static str>,
    /// Cancelled as soon as this version of the document goes stale.
    pub cancel: CancellationToken,
}

impl DocumentState {
    pub fn new(uri: &Url, source: String, version: i32) -> Self {
        Self {
            source,
            version,
            language: language_for_path(uri.path()),
            cancel: CancellationToken::new(),
        }
    }
}

/// Host-facing operations that can be in flight for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Highlight,
    Definition,
    Hover,
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<DocumentState>>,
    inflight: DashMap<(Url, Operation), CancellationToken>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or update a document, cancelling lookups against the previous text.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Arc<DocumentState> {
        let state = Arc::new(DocumentState::new(&uri, source, version));
        if let Some(previous) = self.documents.insert(uri, Arc::clone(&state)) {
            previous.cancel.cancel();
        }
        state
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        if let Some((_, state)) = self.documents.remove(uri) {
            state.cancel.cancel();
        }
        self.inflight.retain(|(u, _), _| u != uri);
    }

    /// Get a document's state.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }

    /// Start a new lookup for `operation`, superseding the previous one.
    ///
    /// The returned token is cancelled when the document changes, closes, or
    /// another lookup of the same kind starts (the cursor moved).
    pub fn begin(&self, uri: &Url, operation: Operation) -> Option<CancellationToken> {
        let state = self.get(uri)?;
        let token = state.cancel.child_token();
        if let Some(previous) = self
            .inflight
            .insert((uri.clone(), operation), token.clone())
        {
            previous.cancel();
        }
        Some(token)
    }

    /// Cancel everything in flight.
    pub fn cancel_all(&self) {
        for entry in self.documents.iter() {
            entry.cancel.cancel();
        }
        self.inflight.clear();
    }
}

/// Map a file path to the language tag the indexing service uses.
pub fn language_for_path(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.')?.1;
    match ext {
        "java" => Some("java"),
        "cc" | "cpp" | "cxx" | "c" | "h" | "hh" | "hpp" => Some("c++"),
        "go" => Some("go"),
        "py" => Some("python"),
        "ts" => Some("typescript"),
        "rs" => Some("rust"),
        _ => None,
    }
}
