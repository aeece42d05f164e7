use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::ContactClient;
use crate::core::content::Reply;
use crate::core::error::ValidationError;
use crate::core::tool::{Arguments, Tool, ToolError};
use crate::domain::ContactProperties;

use super::validation::{optional_string, path_segment_arg, require_arguments, string_arg, typed_arg};
use super::HandlerTool;

pub const GET_ACTIVE_CONTACTS: &str = "hubspot_get_active_contacts";
pub const GET_CONTACT: &str = "hubspot_get_contact";
pub const UPDATE_CONTACT: &str = "hubspot_update_contact";
pub const CREATE_CONTACT: &str = "hubspot_create_contact";

pub const DEFAULT_RECENT_LIMIT: u32 = 10;
/// HubSpot's page-size ceiling for the search endpoint.
pub const MAX_RECENT_LIMIT: u32 = 200;

/// Contact-related HubSpot tools.
#[derive(Clone)]
pub struct ContactHandler {
    client: ContactClient,
}

impl ContactHandler {
    pub fn new(client: ContactClient) -> Self {
        Self { client }
    }

    pub fn get_active_contacts_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_RECENT_LIMIT,
                    "description": "Maximum number of contacts to return (default: 10)"
                }
            },
            "required": []
        })
    }

    pub fn get_contact_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contact_id": {"type": "string", "description": "HubSpot contact ID"},
                "properties": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Properties to retrieve; omit for HubSpot's defaults"
                }
            },
            "required": ["contact_id"]
        })
    }

    pub fn update_contact_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "contact_id": {"type": "string", "description": "HubSpot contact ID"},
                "properties": {"type": "object", "description": "Contact properties to update"}
            },
            "required": ["contact_id", "properties"]
        })
    }

    pub fn create_contact_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "firstname": {"type": "string", "description": "Contact's first name"},
                "lastname": {"type": "string", "description": "Contact's last name"},
                "email": {"type": "string", "description": "Contact's email address"},
                "phone": {"type": "string", "description": "Contact's phone number"},
                "company": {"type": "string", "description": "Contact's company"},
                "properties": {"type": "object", "description": "Additional contact properties"}
            },
            "required": ["firstname", "lastname"]
        })
    }

    pub async fn get_active_contacts(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &[])?;
        let limit = match args.get("limit") {
            None | Some(Value::Null) => DEFAULT_RECENT_LIMIT,
            Some(_) => typed_arg::<u32>(&args, "limit")?,
        };
        if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
            return Err(ValidationError::invalid("limit", format!("must be between 1 and {MAX_RECENT_LIMIT}")).into());
        }

        Ok(self.client.get_recent(limit).await?)
    }

    pub async fn get_contact(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &["contact_id"])?;
        let contact_id = path_segment_arg(&args, "contact_id")?;
        let properties: Option<Vec<String>> = match args.get("properties") {
            None | Some(Value::Null) => None,
            Some(_) => Some(typed_arg(&args, "properties")?),
        };

        Ok(self.client.get_by_id(&contact_id, properties.as_deref()).await?)
    }

    pub async fn update_contact(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &["contact_id", "properties"])?;
        let contact_id = path_segment_arg(&args, "contact_id")?;
        let properties: ContactProperties = typed_arg(&args, "properties")?;

        Ok(self.client.update(&contact_id, &properties).await?)
    }

    pub async fn create_contact(&self, arguments: Option<&Arguments>) -> Result<Reply, ToolError> {
        let args = require_arguments(arguments, &["firstname", "lastname"])?;

        let mut properties: ContactProperties = match args.get("properties") {
            None | Some(Value::Null) => ContactProperties::new(),
            Some(_) => typed_arg(&args, "properties")?,
        };
        properties.insert("firstname".into(), Value::String(string_arg(&args, "firstname")?));
        properties.insert("lastname".into(), Value::String(string_arg(&args, "lastname")?));
        for key in ["email", "phone", "company"] {
            if let Some(value) = optional_string(&args, key)? {
                properties.insert(key.into(), Value::String(value));
            }
        }

        Ok(self.client.create_contact(&properties).await?)
    }

    pub fn tools(self: Arc<Self>) -> Vec<Arc<dyn Tool>> {
        let recent = self.clone();
        let get = self.clone();
        let update = self.clone();
        let create = self;
        vec![
            Arc::new(HandlerTool::new(
                GET_ACTIVE_CONTACTS,
                "Get the most recently active contacts from HubSpot",
                Self::get_active_contacts_schema(),
                move |args| {
                    let h = recent.clone();
                    async move { h.get_active_contacts(args.as_ref()).await }
                },
            )),
            Arc::new(HandlerTool::new(
                GET_CONTACT,
                "Get a specific contact by ID",
                Self::get_contact_schema(),
                move |args| {
                    let h = get.clone();
                    async move { h.get_contact(args.as_ref()).await }
                },
            )),
            Arc::new(HandlerTool::new(
                UPDATE_CONTACT,
                "Update properties of a specific contact",
                Self::update_contact_schema(),
                move |args| {
                    let h = update.clone();
                    async move { h.update_contact(args.as_ref()).await }
                },
            )),
            Arc::new(HandlerTool::new(
                CREATE_CONTACT,
                "Create a new contact; returns the existing one when a contact with the same name (and company) already exists",
                Self::create_contact_schema(),
                move |args| {
                    let h = create.clone();
                    async move { h.create_contact(args.as_ref()).await }
                },
            )),
        ]
    }
}
