//! Error classification.
//!
//! Maps a raw [`Error`] onto a small user-facing taxonomy. Rules are checked
//! in a fixed precedence order and the first match wins:
//!
//! timeout → unauthorized (401) → forbidden (403) → rate limited (429) →
//! server error (5xx) → offline → unknown
//!
//! Typed variants are classified by their shape (variant, HTTP status).
//! Opaque transport failures only carry a message, so they fall back to
//! substring rules in the same precedence order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// User-facing error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    Auth,
    Forbidden,
    RateLimit,
    ServerError,
    Network,
    Unknown,
}

impl ErrorKind {
    /// Fixed human-readable message for this category.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Request timed out. Check your connection and try again.",
            ErrorKind::Auth => "Invalid or missing API key.",
            ErrorKind::Forbidden => "Access denied. Check the API key permissions.",
            ErrorKind::RateLimit => "Too many requests. Please wait and try again.",
            ErrorKind::ServerError => "The suggestion service is temporarily unavailable.",
            ErrorKind::Network => "No network connection.",
            ErrorKind::Unknown => "An unexpected error occurred.",
        }
    }

    /// `auth` and `forbidden` need a configuration change; everything else may be retried.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Auth | ErrorKind::Forbidden)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Auth => "auth",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified error, suitable for showing to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorInfo {
    pub message: String,
    pub kind: ErrorKind,
    pub retryable: bool,
}

impl From<ErrorKind> for ErrorInfo {
    fn from(kind: ErrorKind) -> Self {
        Self { message: kind.message().to_string(), kind, retryable: kind.is_retryable() }
    }
}

/// Substring rules for opaque failures, in precedence order.
const TEXT_RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::Timeout, &["timeout", "timed out", "aborted"]),
    (ErrorKind::Auth, &["401", "unauthorized"]),
    (ErrorKind::Forbidden, &["403", "forbidden"]),
    (ErrorKind::RateLimit, &["429", "too many requests", "rate limit"]),
    (ErrorKind::ServerError, &["server error", "service unavailable", "bad gateway"]),
    (ErrorKind::Network, &["failed to fetch", "network", "connection", "offline", "dns"]),
];

/// Classify a raw failure. Pure; no side effects.
pub fn classify(err: &Error) -> ErrorInfo {
    let kind = match err {
        Error::Timeout(_) => ErrorKind::Timeout,
        Error::MissingApiKey => ErrorKind::Auth,
        Error::Http { status, .. } => kind_for_status(*status),
        Error::Network(_) => ErrorKind::Network,
        Error::Transport(text) => kind_for_text(text),
        Error::InvalidInput(_) | Error::InvalidResponse(_) => ErrorKind::Unknown,
    };

    ErrorInfo::from(kind)
}

fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        408 => ErrorKind::Timeout,
        401 => ErrorKind::Auth,
        403 => ErrorKind::Forbidden,
        429 => ErrorKind::RateLimit,
        500..=599 => ErrorKind::ServerError,
        _ => ErrorKind::Unknown,
    }
}

fn kind_for_text(text: &str) -> ErrorKind {
    let text = text.to_lowercase();

    for (kind, needles) in TEXT_RULES {
        if needles.iter().any(|n| text.contains(n)) {
            return *kind;
        }
        // a bare 5xx status code anywhere in the message
        if *kind == ErrorKind::ServerError && has_5xx_code(&text) {
            return *kind;
        }
    }

    ErrorKind::Unknown
}

fn has_5xx_code(text: &str) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .any(|token| token.len() == 3 && token.starts_with('5'))
}
