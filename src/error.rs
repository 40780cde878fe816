//! Error types for the cross-reference client.
//!
//! None of these are fatal to the editor: handler operations collapse every
//! variant into "no result".

/// Failures that can break a lookup chain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure or non-success status from the indexing service.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A well-formed reply lacked the ticket, entry or field the chain needs.
    #[error("not found: {0}")]
    NotFound(String),

    /// A locator string is missing an expected `key=value` segment.
    #[error("locator `{locator}` has no `{key}` segment")]
    MalformedLocator {
        /// The locator that was inspected.
        locator: String,
        /// The key that was looked up.
        key: &'static str,
    },

    /// A base64 payload on the wire could not be decoded.
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The editor context went stale before the chain completed.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// Expected outcomes that should not be logged loudly.
    pub fn is_quiet(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Cancelled)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ServiceUnavailable(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
