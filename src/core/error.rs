use serde::Serialize;
use thiserror::Error;

/// Failures talking to HubSpot.
#[derive(Debug, Error)]
pub enum HubSpotError {
    /// HubSpot answered with a non-success status.
    #[error("HubSpot API error {status}: {message}")]
    Api {
        status: u16,
        category: Option<String>,
        message: String,
        correlation_id: Option<String>,
    },
    #[error("HUBSPOT_ACCESS_TOKEN not configured; set it to enable HubSpot tools")]
    NotConfigured,
    #[error("request to HubSpot failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HubSpot payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to encode result as JSON: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid HubSpot base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid path segment '{0}'")]
    InvalidPathSegment(String),
}

/// Normalized upstream failure handed back to the agent in place of the raw error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiFailure {
    pub status: u16,
    pub category: Option<String>,
    pub message: String,
    pub correlation_id: Option<String>,
}

impl ApiFailure {
    /// `{"error": {...}}` text payload.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self }).to_string()
    }
}

/// Argument problems detected before any HubSpot call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required argument(s): {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("invalid argument '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        ValidationError::Invalid { field: field.into(), reason: reason.to_string() }
    }
}
