//! bank_search tool implementation.
//!
//! Looks up banks through the cached suggestion client and returns both the
//! raw suggestions and formatted details.

use banksuggest_client::{BankDetails, BankSuggestion, SuggestClient, SuggestionResponse};
use banksuggest_core::{BankStatus, BankType, Error, LocationBoost, LocationFilter, SearchOptions};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for bank_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BankSearchParams {
    /// Search query (bank name, BIC, INN, SWIFT or address fragment).
    pub query: String,

    /// Number of suggestions (1-20, default 10).
    #[serde(default)]
    pub count: Option<u8>,

    /// Statuses to include: ACTIVE (default), LIQUIDATING, LIQUIDATED.
    #[serde(default)]
    pub status: Option<Vec<BankStatus>>,

    /// Institution kinds to include (default BANK).
    #[serde(default, rename = "type")]
    pub types: Option<Vec<BankType>>,

    /// Restrict results to these locations.
    #[serde(default)]
    pub locations: Vec<LocationFilter>,

    /// Rank results from these locations higher.
    #[serde(default)]
    pub locations_boost: Vec<LocationBoost>,
}

impl BankSearchParams {
    /// Search options with defaults filled in for absent fields.
    pub fn options(&self) -> SearchOptions {
        let defaults = SearchOptions::default();
        SearchOptions {
            count: self.count.unwrap_or(defaults.count),
            status: self.status.as_ref().map(|s| s.iter().copied().collect()).unwrap_or(defaults.status),
            types: self.types.as_ref().map(|t| t.iter().copied().collect()).unwrap_or(defaults.types),
            locations: self.locations.clone(),
            locations_boost: self.locations_boost.clone(),
        }
    }
}

/// Output structure for bank_search tool.
#[derive(Debug, Clone, Serialize)]
pub struct BankSearchOutput {
    /// The query as sent (trimmed).
    pub query: String,
    /// Suggestions as returned by the service.
    pub suggestions: Vec<BankSuggestion>,
    /// Formatted details, one per suggestion.
    pub details: Vec<BankDetails>,
}

impl BankSearchOutput {
    pub fn new(query: &str, response: &SuggestionResponse) -> Self {
        Self {
            query: query.trim().to_string(),
            suggestions: response.suggestions.clone(),
            details: response.suggestions.iter().map(BankDetails::from).collect(),
        }
    }
}

/// Implementation of the bank_search tool.
pub async fn search_impl(client: &SuggestClient, params: BankSearchParams) -> Result<CallToolResult, McpError> {
    let options = params.options();
    let response = client.search(&params.query, &options).await?;

    let output = BankSearchOutput::new(&params.query, &response);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidResponse(format!("failed to serialize suggestions: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
