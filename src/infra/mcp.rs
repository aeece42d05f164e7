//! MCP server integration for hubspot-mcp-server.
//!
//! `HubSpotSvc` answers `tools/list` and `tools/call` straight from the tool
//! registry, so every tool keeps its hand-written JSON schema. Results are
//! text content carrying JSON; HubSpot API failures come back as text content
//! flagged `isError`.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool as McpTool,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer, ServerHandler,
};

use crate::clients::HubSpotClient;
use crate::core::error::HubSpotError;
use crate::infra::config::HubSpotConfig;
use crate::tools::{build_registry, ToolRegistry};

const INSTRUCTIONS: &str = "HubSpot CRM tools: read and update contacts, and read, create or \
update contact/company property definitions. Results are JSON text.";

/// The MCP server handler.
#[derive(Clone)]
pub struct HubSpotSvc {
    registry: ToolRegistry,
}

impl HubSpotSvc {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn from_client(api: HubSpotClient) -> Self {
        Self::new(build_registry(api))
    }

    pub fn from_config(cfg: &HubSpotConfig) -> Result<Self, HubSpotError> {
        if cfg.access_token.is_none() {
            tracing::warn!("HUBSPOT_ACCESS_TOKEN not set; tool calls will fail until configured");
        }
        Ok(Self::from_client(HubSpotClient::from_config(cfg)?))
    }

    pub fn tool_descriptors(&self) -> Vec<McpTool> {
        self.registry
            .list()
            .into_iter()
            .map(|meta| {
                let schema = match meta.input_schema {
                    serde_json::Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                McpTool::new(meta.name, meta.description, Arc::new(schema))
            })
            .collect()
    }

    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = name, "tools/call");
        let reply = self.registry.call(name, arguments).await.map_err(|e| {
            tracing::debug!(tool = name, error = %e, "tool call rejected");
            McpError::from(e)
        })?;
        Ok(reply.into_call_result())
    }
}

impl ServerHandler for HubSpotSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_descriptors(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments.as_ref()).await
    }
}
