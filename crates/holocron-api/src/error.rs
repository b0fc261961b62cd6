//! Error types.
//!
//! `FetchError` is `Clone` because one in-flight request can have several
//! waiters and every one of them receives the same failure.

use thiserror::Error;

/// A remote read failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// A body or URL did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short form for status bars and toasts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network error",
            Self::Status { .. } => "server error",
            Self::Decode(_) => "bad response",
        }
    }
}

/// Local input rejected before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid search term")]
    BlankSearchTerm,
}
