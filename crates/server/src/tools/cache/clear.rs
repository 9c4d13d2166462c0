//! cache_clear tool implementation.

use banksuggest_client::SuggestClient;
use banksuggest_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearOutput {
    /// Number of entries dropped.
    pub cleared: usize,
}

/// Implementation of the cache_clear tool.
pub fn clear_impl(client: &SuggestClient) -> Result<CallToolResult, McpError> {
    let cleared = client.cache_stats().size;
    client.clear_cache();

    tracing::info!(cleared, "cleared suggestion cache");

    let json = serde_json::to_string(&CacheClearOutput { cleared })
        .map_err(|e| Error::InvalidResponse(format!("failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
