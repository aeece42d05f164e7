//! One client per HubSpot CRM resource, sharing an authenticated
//! [`HubSpotClient`].

pub mod contacts;
pub mod hubspot;
pub mod properties;

pub use contacts::ContactClient;
pub use hubspot::HubSpotClient;
pub use properties::PropertyClient;

use serde::Serialize;

use crate::core::content::Reply;
use crate::core::error::{ApiFailure, HubSpotError};

/// Boundary adapter applied to every public client method: serialize the
/// typed result, turn HubSpot API errors into a normalized [`ApiFailure`],
/// and let every other error propagate.
pub fn handle_hubspot_errors<T: Serialize>(
    operation: &'static str,
    result: Result<T, HubSpotError>,
) -> Result<Reply, HubSpotError> {
    match result {
        Ok(value) => Ok(Reply::Json(
            serde_json::to_string(&value).map_err(HubSpotError::Encode)?,
        )),
        Err(HubSpotError::Api { status, category, message, correlation_id }) => {
            tracing::warn!(operation, status, category = ?category, message = %message, "HubSpot API error");
            Ok(Reply::Failure(ApiFailure { status, category, message, correlation_id }))
        }
        Err(other) => {
            tracing::error!(operation, error = %other, "HubSpot call failed");
            Err(other)
        }
    }
}
