//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::ServerState;
use crate::tools::{
    EnhanceProfileParams, FetchUrlParams, WebSearchParams, enhance::enhance_impl, fetch_url::fetch_url_impl,
    web_search::search_impl,
};

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

/// The main MCP server handler for mcp-scout.
#[derive(Clone)]
pub struct ScoutServer {
    tool_router: ToolRouter<Self>,
    state: ServerState,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ScoutServer {
    pub fn new(state: ServerState) -> Self {
        Self { tool_router: Self::tool_router(), state }
    }

    /// Turn a self-introduction into a structured profile.
    ///
    /// The model fetches every URL in the text or in `urls` before answering.
    #[tool(
        description = "Research an expert's self-introduction and linked websites, then return a structured JSON profile."
    )]
    async fn enhance_profile(&self, params: Parameters<EnhanceProfileParams>) -> Result<CallToolResult, McpError> {
        enhance_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Fetch a URL and return its main content, metadata, links, images, contacts and structured data as JSON."
    )]
    async fn fetch_url_content(&self, params: Parameters<FetchUrlParams>) -> Result<CallToolResult, McpError> {
        fetch_url_impl(&self.state, params.0).await
    }

    #[tool(description = "Search the web. A full URL is fetched directly; keywords need a configured Brave API key.")]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.state, params.0).await
    }
}

impl ServerHandler for ScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-scout".into(),
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
