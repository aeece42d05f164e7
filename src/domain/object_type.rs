use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CRM object types whose property schema can be read or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Companies,
    Contacts,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Companies => "companies",
            ObjectType::Contacts => "contacts",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported object_type '{0}': expected one of companies, contacts")]
pub struct UnknownObjectType(pub String);

impl FromStr for ObjectType {
    type Err = UnknownObjectType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "companies" => Ok(ObjectType::Companies),
            "contacts" => Ok(ObjectType::Contacts),
            other => Err(UnknownObjectType(other.to_string())),
        }
    }
}
