use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::content::Reply;
use super::error::{HubSpotError, ValidationError};

/// Tool arguments as delivered by the MCP runtime.
pub type Arguments = Map<String, Value>;

/// Minimal metadata every tool must expose.
pub trait ToolSpec {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Unexpected(#[from] HubSpotError),
}

impl From<ToolError> for rmcp::ErrorData {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::Invalid(v) => rmcp::ErrorData::invalid_params(v.to_string(), None),
            ToolError::Unexpected(u) => rmcp::ErrorData::internal_error(u.to_string(), None),
        }
    }
}

/// Tool = Spec + call implementation
#[async_trait]
pub trait Tool: ToolSpec + Send + Sync {
    async fn call(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError>;
}
