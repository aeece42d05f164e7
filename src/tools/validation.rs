//! Argument checks run by every handler before the client is touched.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::ValidationError;
use crate::core::tool::Arguments;
use crate::domain::ObjectType;

/// Fail with every missing key at once. `null` counts as missing.
pub fn require_arguments(
    arguments: Option<&Arguments>,
    required: &[&str],
) -> Result<Arguments, ValidationError> {
    let args = arguments.cloned().unwrap_or_default();
    let missing: Vec<String> = required
        .iter()
        .filter(|key| args.get(**key).map_or(true, Value::is_null))
        .map(|key| key.to_string())
        .collect();
    if missing.is_empty() {
        Ok(args)
    } else {
        Err(ValidationError::Missing(missing))
    }
}

pub fn string_arg(args: &Arguments, key: &str) -> Result<String, ValidationError> {
    match args.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(ValidationError::invalid(key, "must not be empty")),
        Some(Value::Null) | None => Err(ValidationError::Missing(vec![key.to_string()])),
        Some(_) => Err(ValidationError::invalid(key, "expected a string")),
    }
}

/// A string that is used as one URL path segment (a record id or name).
/// Relative segments are refused; everything else is escaped by the client.
pub fn path_segment_arg(args: &Arguments, key: &str) -> Result<String, ValidationError> {
    let value = string_arg(args, key)?;
    if matches!(value.trim(), "." | "..") {
        return Err(ValidationError::invalid(key, "must not be a relative path segment"));
    }
    Ok(value)
}

pub fn optional_string(args: &Arguments, key: &str) -> Result<Option<String>, ValidationError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid(key, "expected a string")),
    }
}

pub fn object_type_arg(args: &Arguments) -> Result<ObjectType, ValidationError> {
    string_arg(args, "object_type")?
        .parse()
        .map_err(|e| ValidationError::invalid("object_type", e))
}

/// Decode one argument into a typed value.
pub fn typed_arg<T: DeserializeOwned>(args: &Arguments, key: &str) -> Result<T, ValidationError> {
    let raw = args
        .get(key)
        .cloned()
        .ok_or_else(|| ValidationError::Missing(vec![key.to_string()]))?;
    serde_json::from_value(raw).map_err(|e| ValidationError::invalid(key, e))
}

/// Everything not named in `exclude`, for forwarding as extra attributes.
pub fn remaining(args: &Arguments, exclude: &[&str]) -> Arguments {
    args.iter()
        .filter(|(k, _)| !exclude.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
