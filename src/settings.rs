//! Settings infrastructure for kythe-lsp.
//!
//! This module loads `settings.toml` to configure the cross-reference service
//! endpoint, the languages to serve, and where indexed paths are rooted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081/";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Cross-reference service configuration.
    pub server: Option<ServerSettings>,

    /// Language tags to serve (default: `["java"]`).
    pub languages: Option<Vec<String>>,

    /// Directory that indexed file paths are relative to.
    /// Relative paths are resolved against the settings directory.
    pub corpus_root: Option<PathBuf>,
}

/// Connection settings for the service.
#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    /// Base URL; endpoint names are appended to it.
    pub url: Option<String>,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Settings with defaults applied and paths resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub timeout: Duration,
    pub languages: Vec<String>,
    pub corpus_root: PathBuf,
}

impl Config {
    pub fn from_settings(settings: &Settings, settings_dir: &Path) -> Self {
        let server = settings.server.as_ref();
        let server_url = server
            .and_then(|s| s.url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let timeout_ms = server
            .and_then(|s| s.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let languages = settings
            .languages
            .clone()
            .unwrap_or_else(|| vec!["java".to_string()]);
        let corpus_root = match &settings.corpus_root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => settings_dir.join(root),
            None => settings_dir.to_path_buf(),
        };

        Self {
            server_url,
            timeout: Duration::from_millis(timeout_ms),
            languages,
            corpus_root,
        }
    }
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover settings.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found settings.toml (used for resolving relative paths).
/// If not found, returns `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join("settings.toml");
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join("settings.toml");
                if candidate.is_file() {
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}
