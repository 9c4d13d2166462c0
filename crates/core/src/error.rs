//! Unified error types for bank-suggest.
//!
//! Every failure a search can produce is one of these variants; the
//! classifier in [`crate::classify`] maps them onto the user-facing taxonomy.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::classify::{ErrorInfo, classify};

/// Unified error type for suggestion lookups.
///
/// `Clone` because a single failed network call is shared by every caller
/// coalesced onto it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// No API key could be resolved; the client is disabled.
    #[error("missing API key: BANK_SUGGEST_API_KEY not set")]
    MissingApiKey,

    /// Invalid search parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request did not complete before the deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status from the suggestion service.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The service could not be reached (DNS, refused connection, offline).
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not a well-formed suggestion response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Any other transport failure, described only by its message.
    #[error("{0}")]
    Transport(String),
}

impl Error {
    /// Classify this error into the user-facing taxonomy.
    pub fn info(&self) -> ErrorInfo {
        classify(self)
    }

    /// Whether the same request may be attempted again unchanged.
    pub fn is_retryable(&self) -> bool {
        self.info().retryable
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let info = err.info();
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::MissingApiKey => -32001,
            Error::Timeout(_) => -32002,
            Error::Http { .. } => -32003,
            Error::Network(_) => -32004,
            Error::InvalidResponse(_) => -32005,
            Error::Transport(_) => -32000,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: serde_json::to_value(&info).ok() }
    }
}
