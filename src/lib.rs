//! Language server bridging editors to a Kythe cross-reference service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

mod document;
pub mod documentation;
pub mod error;
pub mod kythe;
pub mod logging;
mod lsp;
pub mod navigation;
pub(crate) mod settings;

pub use document::{language_for_path, LineColumn, LineIndex};
pub use lsp::{format_fragments, format_hint};
pub use settings::{discover_settings, load_settings, Config, Settings};

use document::{DocumentStore, Operation};
use kythe::HttpXrefService;
use navigation::{DocumentSnapshot, KytheHandler, NavigationHandler};

/// Everything a lookup needs once the workspace is known.
struct Session {
    handler: Arc<dyn NavigationHandler>,
    corpus_root: PathBuf,
}

impl Session {
    fn from_config(config: &Config) -> error::Result<Self> {
        let service = HttpXrefService::new(&config.server_url, config.timeout)?;
        tracing::info!(
            server = %service.base(),
            corpus_root = %config.corpus_root.display(),
            languages = ?config.languages,
            "using cross-reference service"
        );
        Ok(Self {
            handler: Arc::new(KytheHandler::new(service, config.languages.clone())),
            corpus_root: config.corpus_root.clone(),
        })
    }
}

/// One request against one document version.
struct Lookup {
    session: Arc<Session>,
    doc: DocumentSnapshot,
    cancel: CancellationToken,
}

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    session: RwLock<Option<Arc<Session>>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            session: RwLock::new(None),
        }
    }

    /// Snapshot the document and register a cancellable lookup for `operation`.
    async fn lookup(&self, uri: &Url, operation: Operation) -> Option<Lookup> {
        let session = self.session.read().await.clone()?;
        let state = self.documents.get(uri)?;
        let language = state.language?;
        let path = corpus_path(&session.corpus_root, uri)?;
        let cancel = self.documents.begin(uri, operation)?;
        tracing::debug!(%uri, version = state.version, ?operation, "starting lookup");

        Some(Lookup {
            session,
            doc: DocumentSnapshot {
                path,
                language: language.to_string(),
                text: state.source.clone(),
            },
            cancel,
        })
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            })
            .or_else(|| std::env::current_dir().ok());

        if let Some(root) = workspace_root {
            let (settings, settings_dir) = settings::discover_settings(&root);
            let config = Config::from_settings(&settings, &settings_dir);
            match Session::from_config(&config) {
                Ok(session) => *self.session.write().await = Some(Arc::new(session)),
                Err(e) => tracing::error!("cannot reach cross-reference service: {e}"),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Kythe language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.documents.cancel_all();
        self.session.write().await.take();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.documents.open(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.open(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(lookup) = self.lookup(uri, Operation::Hover).await else {
            return Ok(None);
        };
        let cursor = lsp::cursor_at(&lookup.doc.text, position);
        let hint = lookup
            .session
            .handler
            .tooltip(&lookup.doc, cursor, &lookup.cancel)
            .await;
        if lookup.cancel.is_cancelled() {
            return Ok(None);
        }

        Ok(hint.map(|hint| lsp::hover_for_hint(&lookup.doc.text, &hint)))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(lookup) = self.lookup(uri, Operation::Definition).await else {
            return Ok(None);
        };
        let cursor = lsp::cursor_at(&lookup.doc.text, position);
        let targets = lookup
            .session
            .handler
            .jump_to_definition(&lookup.doc, cursor, &lookup.cancel)
            .await;
        if lookup.cancel.is_cancelled() {
            return Ok(None);
        }

        let Some(targets) = targets else {
            return Ok(None);
        };
        let locations = lsp::locations_for_targets(&lookup.session.corpus_root, &targets);
        Ok(match locations.len() {
            0 => None,
            1 => locations.into_iter().next().map(GotoDefinitionResponse::Scalar),
            _ => Some(GotoDefinitionResponse::Array(locations)),
        })
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(lookup) = self.lookup(uri, Operation::Highlight).await else {
            return Ok(None);
        };
        let cursor = lsp::cursor_at(&lookup.doc.text, position);
        let markers = lookup
            .session
            .handler
            .highlight_occurrences(&lookup.doc, cursor, &lookup.cancel)
            .await;
        if lookup.cancel.is_cancelled() {
            return Ok(None);
        }

        Ok(markers.map(|markers| lsp::highlights_for_markers(&lookup.doc.text, &markers)))
    }
}

/// Path of `uri` as indexed: relative to the corpus root, `/`-separated.
fn corpus_path(corpus_root: &Path, uri: &Url) -> Option<String> {
    let path = uri.to_file_path().ok()?;
    let relative = path.strip_prefix(corpus_root).unwrap_or(&path);
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
