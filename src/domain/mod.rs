//! CRM records and request payloads, declared field by field so conversion
//! from HubSpot's wire shape is explicit and testable without the network.

pub mod contact;
pub mod object_type;
pub mod property;
pub mod search;
pub mod timestamp;

pub use contact::{Contact, ContactInput, ContactProperties, CreateContactOutcome};
pub use object_type::ObjectType;
pub use property::{OptionInput, PropertyCreate, PropertyDefinition, PropertyOption, PropertyUpdate};
pub use search::{Filter, FilterGroup, SearchRequest, SearchResponse, SortDirection};
