//! Core types & traits: tool contracts, error taxonomy and the reply envelope.

pub mod content;
pub mod error;
pub mod tool;

pub use content::Reply;
pub use error::{ApiFailure, HubSpotError, ValidationError};
pub use tool::{Arguments, Tool, ToolError, ToolSpec};
