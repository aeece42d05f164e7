//! Canonical timestamp rendering for everything handed back to the agent.
//!
//! HubSpot returns datetimes with varying fractional precision (and, for some
//! contact properties, as epoch milliseconds). Output always uses RFC 3339 with
//! millisecond precision and a `Z` suffix so the same instant renders the same
//! text on every call.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Contact properties HubSpot stores as datetimes.
pub const TIMESTAMP_PROPERTIES: &[&str] = &[
    "closedate",
    "createdate",
    "first_conversion_date",
    "hs_createdate",
    "hs_last_sales_activity_timestamp",
    "hs_lastmodifieddate",
    "lastmodifieddate",
    "notes_last_contacted",
    "notes_last_updated",
    "notes_next_activity_date",
    "recent_conversion_date",
];

pub fn canonical(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shortest digit string read as epoch milliseconds; shorter numbers such
/// as a bare year are left alone.
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Parse either an RFC 3339 string or epoch milliseconds.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if raw.len() < MIN_EPOCH_MILLIS_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

pub fn is_timestamp_property(name: &str) -> bool {
    TIMESTAMP_PROPERTIES.contains(&name)
}

/// Rewrite recognised timestamp properties in place. Values that do not parse
/// are left as HubSpot sent them.
pub fn normalize_properties(props: &mut BTreeMap<String, Option<String>>) {
    for (name, value) in props.iter_mut() {
        if !is_timestamp_property(name) {
            continue;
        }
        if let Some(raw) = value {
            if let Some(ts) = parse(raw) {
                *raw = canonical(&ts);
            }
        }
    }
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&canonical(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `#[serde(with = ...)]` helpers for optional timestamp fields. Pair with
/// `#[serde(default)]` so absent fields stay `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_str(&canonical(ts)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            None => Ok(None),
        }
    }
}
