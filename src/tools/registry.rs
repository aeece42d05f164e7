use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clients::{ContactClient, HubSpotClient, PropertyClient};
use crate::core::content::Reply;
use crate::core::error::ValidationError;
use crate::core::tool::{Arguments, Tool, ToolError, ToolSpec};

use super::{ContactHandler, PropertyHandler};

/// Name → tool map, listed in name order.
#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<BTreeMap<&'static str, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn with_tools<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        let map: BTreeMap<&'static str, Arc<dyn Tool>> =
            iter.into_iter().map(|t| (t.name(), t)).collect();
        Self { by_name: Arc::new(map) }
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.by_name
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    pub async fn call(&self, name: &str, args: Option<&Arguments>) -> Result<Reply, ToolError> {
        let t = self
            .by_name
            .get(name)
            .ok_or_else(|| ValidationError::invalid("name", format!("unknown tool: {name}")))?;
        tracing::debug!(tool = name, "tool call");
        t.call(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
}

/// Every contact and property tool, sharing one authenticated client.
pub fn build_registry(api: HubSpotClient) -> ToolRegistry {
    let contacts = Arc::new(ContactHandler::new(ContactClient::new(api.clone())));
    let properties = Arc::new(PropertyHandler::new(PropertyClient::new(api)));
    ToolRegistry::with_tools(contacts.tools().into_iter().chain(properties.tools()))
}
