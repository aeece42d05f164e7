use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::timestamp;

/// Writable contact properties as supplied by the agent. Values are usually
/// strings but numbers and booleans are passed through for HubSpot to coerce.
pub type ContactProperties = Map<String, Value>;

/// A contact record as returned by the CRM objects API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Contact {
    pub id: String,
    #[serde(default, deserialize_with = "normalized_properties")]
    pub properties: BTreeMap<String, Option<String>>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default, with = "timestamp::option")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties_with_history: Option<BTreeMap<String, Vec<ValueWithTimestamp>>>,
}

impl Contact {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|v| v.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ValueWithTimestamp {
    pub value: String,
    #[serde(serialize_with = "timestamp::serialize", deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub source_type: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_label: Option<String>,
    #[serde(default)]
    pub updated_by_user_id: Option<i64>,
}

fn normalized_properties<'de, D>(d: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut props = Option::<BTreeMap<String, Option<String>>>::deserialize(d)?.unwrap_or_default();
    timestamp::normalize_properties(&mut props);
    Ok(props)
}

/// Body for contact create and update calls.
#[derive(Debug, Clone, Serialize)]
pub struct ContactInput<'a> {
    pub properties: &'a ContactProperties,
}

/// Result of a guarded contact creation.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateContactOutcome {
    Created(Contact),
    AlreadyExists(Contact),
}

impl Serialize for CreateContactOutcome {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            CreateContactOutcome::Created(contact) => contact.serialize(s),
            CreateContactOutcome::AlreadyExists(contact) => {
                let mut out = s.serialize_struct("AlreadyExists", 2)?;
                out.serialize_field("already_exists", &true)?;
                out.serialize_field("contact", contact)?;
                out.end()
            }
        }
    }
}

/// Text form of a property value, used when building equality filters.
/// `null` counts as absent.
pub fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
