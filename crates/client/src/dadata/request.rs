//! Suggestion request body.

use banksuggest_core::SearchOptions;
use serde::Serialize;

/// Body of a `suggest/bank` request.
///
/// Serializes as `{query, count, status, type, locations, locations_boost}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestRequest {
    /// Free-text query, already trimmed.
    pub query: String,

    #[serde(flatten)]
    pub options: SearchOptions,
}

impl SuggestRequest {
    pub fn new(query: impl Into<String>, options: SearchOptions) -> Self {
        Self { query: query.into(), options }
    }
}
