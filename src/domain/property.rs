use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp;

/// A property definition (schema of one field on a CRM object type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PropertyDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub field_type: String,
    pub group_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<PropertyOption>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub calculated: Option<bool>,
    #[serde(default)]
    pub external_options: Option<bool>,
    #[serde(default)]
    pub has_unique_value: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub hubspot_defined: Option<bool>,
    #[serde(default)]
    pub form_field: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub referenced_object_type: Option<String>,
    #[serde(default)]
    pub calculation_formula: Option<String>,
    #[serde(default)]
    pub created_user_id: Option<String>,
    #[serde(default)]
    pub updated_user_id: Option<String>,
    #[serde(default)]
    pub modification_metadata: Option<ModificationMetadata>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub archived_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PropertyOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ModificationMetadata {
    #[serde(default)]
    pub archivable: Option<bool>,
    #[serde(default)]
    pub read_only_definition: Option<bool>,
    #[serde(default)]
    pub read_only_options: Option<bool>,
    #[serde(default)]
    pub read_only_value: Option<bool>,
}

/// Option entry as sent to HubSpot on create/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Payload for `POST /crm/v3/properties/{objectType}`.
///
/// Attributes without a dedicated field land in `extra` and are sent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCreate {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub field_type: String,
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_field: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_unique_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_object_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyCreate {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        property_type: impl Into<String>,
        field_type: impl Into<String>,
        group_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            property_type: property_type.into(),
            field_type: field_type.into(),
            group_name: group_name.into(),
            options: None,
            description: None,
            display_order: None,
            hidden: None,
            form_field: None,
            has_unique_value: None,
            calculation_formula: None,
            referenced_object_type: None,
            extra: Map::new(),
        }
    }
}

/// Payload for `PATCH /crm/v3/properties/{objectType}/{propertyName}`.
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_field: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_formula: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
