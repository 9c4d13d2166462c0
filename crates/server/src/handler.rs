//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::bank_search::{BankSearchParams, search_impl};
use crate::tools::cache::{clear_impl, stats_impl};

use banksuggest_client::SuggestClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for bank-suggest.
#[derive(Clone)]
pub struct BankSuggestServer {
    client: SuggestClient,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BankSuggestServer {
    /// Create a new server handler around a suggestion client.
    pub fn new(client: SuggestClient) -> Self {
        Self { client, tool_router: Self::tool_router() }
    }

    /// Look up banks by name, BIC, INN or address fragment.
    #[tool(
        description = "Suggest Russian banks matching a query (name, BIC, INN, SWIFT or address). \
                       Returns raw suggestions plus formatted bank details. Queries shorter than 3 characters return nothing."
    )]
    async fn bank_search(&self, params: Parameters<BankSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.client, params.0).await
    }

    /// Drop all cached suggestion responses.
    #[tool(description = "Clear the in-memory suggestion cache.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.client)
    }

    /// Report cache occupancy.
    #[tool(description = "Report suggestion cache size, capacity and TTL (ms).")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.client)
    }
}

impl ServerHandler for BankSuggestServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "bank-suggest".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banksuggest_client::SuggestConfig;

    #[test]
    fn test_tools_registered() {
        let server = BankSuggestServer::new(SuggestClient::new(SuggestConfig::default()).unwrap());
        let names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        assert!(names.contains(&"bank_search".to_string()));
        assert!(names.contains(&"cache_clear".to_string()));
        assert!(names.contains(&"cache_stats".to_string()));
    }

    #[test]
    fn test_server_info() {
        let server = BankSuggestServer::new(SuggestClient::new(SuggestConfig::default()).unwrap());
        assert_eq!(server.get_info().server_info.name, "bank-suggest");
    }
}
