use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::PropertyClient;
use crate::core::content::Reply;
use crate::core::error::ValidationError;
use crate::core::tool::{Arguments, Tool, ToolError};
use crate::domain::{OptionInput, PropertyCreate, PropertyUpdate};

use super::validation::{object_type_arg, path_segment_arg, remaining, require_arguments, string_arg, typed_arg};
use super::{option_items_schema, HandlerTool};

pub const GET_PROPERTY: &str = "hubspot_get_property";
pub const UPDATE_PROPERTY: &str = "hubspot_update_property";
pub const CREATE_PROPERTY: &str = "hubspot_create_property";

fn object_type_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["companies", "contacts"],
        "description": "Type of CRM object"
    })
}

/// Property-related HubSpot tools.
#[derive(Clone)]
pub struct PropertyHandler {
    client: PropertyClient,
}

impl PropertyHandler {
    pub fn new(client: PropertyClient) -> Self {
        Self { client }
    }

    pub fn get_property_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "object_type": object_type_schema(),
                "property_name": {"type": "string", "description": "Name of the property"}
            },
            "required": ["object_type", "property_name"]
        })
    }

    pub fn update_property_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "object_type": object_type_schema(),
                "property_name": {"type": "string", "description": "Name of the property"},
                "options": option_items_schema()
            },
            "required": ["object_type", "property_name", "options"]
        })
    }

    pub fn create_property_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "object_type": object_type_schema(),
                "name": {"type": "string", "description": "Internal name of the property"},
                "label": {"type": "string", "description": "Display label for the property"},
                "type": {"type": "string", "description": "Data type (string, number, date, enumeration, etc.)"},
                "fieldType": {"type": "string", "description": "Field type (text, textarea, select, number, date, etc.)"},
                "groupName": {"type": "string", "description": "Property group name"},
                "options": option_items_schema(),
                "description": {"type": "string", "description": "Property description"}
            },
            "required": ["object_type", "name", "label", "type", "fieldType", "groupName"]
        })
    }

    pub async fn get_property(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &["object_type", "property_name"])?;
        let object_type = object_type_arg(&args)?;
        let property_name = path_segment_arg(&args, "property_name")?;

        Ok(self.client.get_property(object_type, &property_name).await?)
    }

    pub async fn update_property(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &["object_type", "property_name", "options"])?;
        let object_type = object_type_arg(&args)?;
        let property_name = path_segment_arg(&args, "property_name")?;
        let options: Vec<OptionInput> = typed_arg(&args, "options")?;

        let extra = remaining(&args, &["object_type", "property_name", "options"]);
        let update: PropertyUpdate = serde_json::from_value(Value::Object(extra))
            .map_err(|e| ValidationError::invalid("property attributes", e))?;

        Ok(self
            .client
            .update_property(object_type, &property_name, Some(options), update)
            .await?)
    }

    pub async fn create_property(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(
            arguments,
            &["object_type", "name", "label", "type", "fieldType", "groupName"],
        )?;
        let object_type = object_type_arg(&args)?;
        for key in ["name", "label", "type", "fieldType", "groupName"] {
            string_arg(&args, key)?;
        }

        let body = remaining(&args, &["object_type"]);
        let create: PropertyCreate = serde_json::from_value(Value::Object(body))
            .map_err(|e| ValidationError::invalid("property definition", e))?;

        Ok(self.client.create_property(object_type, &create).await?)
    }

    pub fn tools(self: Arc<Self>) -> Vec<Arc<dyn Tool>> {
        let get = self.clone();
        let update = self.clone();
        let create = self;
        vec![
            Arc::new(HandlerTool::new(
                GET_PROPERTY,
                "Get details of a specific property",
                Self::get_property_schema(),
                move |args| {
                    let h = get.clone();
                    async move { h.get_property(args.as_ref()).await }
                },
            )),
            Arc::new(HandlerTool::new(
                UPDATE_PROPERTY,
                "Update a property definition, e.g. the options of a dropdown field",
                Self::update_property_schema(),
                move |args| {
                    let h = update.clone();
                    async move { h.update_property(args.as_ref()).await }
                },
            )),
            Arc::new(HandlerTool::new(
                CREATE_PROPERTY,
                "Create a new custom property",
                Self::create_property_schema(),
                move |args| {
                    let h = create.clone();
                    async move { h.create_property(args.as_ref()).await }
                },
            )),
        ]
    }
}
