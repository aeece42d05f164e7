//! Handler layer: tool contracts, argument validation, dispatch.

pub mod contacts;
pub mod properties;
pub mod registry;
pub mod validation;

use std::{future::Future, pin::Pin, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::core::content::Reply;
use crate::core::tool::{Arguments, Tool, ToolError, ToolSpec};

pub use contacts::ContactHandler;
pub use properties::PropertyHandler;
pub use registry::{build_registry, ToolRegistry};

type ToolFuture = Pin<Box<dyn Future<Output = Result<Reply, ToolError>> + Send>>;

/// A tool backed by a boxed async fn, so a handler can expose each of its
/// methods without a struct per tool.
pub struct HandlerTool {
    name: &'static str,
    description: &'static str,
    schema: Value,
    inner: Arc<dyn Fn(Option<Arguments>) -> ToolFuture + Send + Sync>,
}

impl HandlerTool {
    pub fn new<F, Fut>(name: &'static str, description: &'static str, schema: Value, f: F) -> Self
    where
        F: Fn(Option<Arguments>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, ToolError>> + Send + 'static,
    {
        Self {
            name,
            description,
            schema,
            inner: Arc::new(move |args| Box::pin(f(args))),
        }
    }
}

impl ToolSpec for HandlerTool {
    fn name(&self) -> &'static str {
        self.name
    }
    fn description(&self) -> &'static str {
        self.description
    }
    fn input_schema(&self) -> Value {
        self.schema.clone()
    }
}

#[async_trait]
impl Tool for HandlerTool {
    async fn call(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        (self.inner)(arguments.cloned()).await
    }
}

/// Shared shape of the option objects accepted by property tools.
pub(crate) fn option_items_schema() -> Value {
    serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "value": {"type": "string"},
                "description": {"type": "string"},
                "displayOrder": {"type": "integer"}
            },
            "required": ["label", "value"]
        },
        "description": "Array of option objects for dropdown fields"
    })
}
