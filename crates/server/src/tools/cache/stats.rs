//! cache_stats tool implementation.

use banksuggest_client::SuggestClient;
use banksuggest_core::{CacheStats, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsOutput {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Whether the client has an API key.
    pub enabled: bool,
    /// Requests currently awaiting the service.
    pub in_flight: usize,
}

impl CacheStatsOutput {
    pub fn from_client(client: &SuggestClient) -> Self {
        Self { stats: client.cache_stats(), enabled: client.is_enabled(), in_flight: client.in_flight_count() }
    }
}

/// Implementation of the cache_stats tool.
pub fn stats_impl(client: &SuggestClient) -> Result<CallToolResult, McpError> {
    let output = CacheStatsOutput::from_client(client);
    let json = serde_json::to_string(&output)
        .map_err(|e| Error::InvalidResponse(format!("failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
