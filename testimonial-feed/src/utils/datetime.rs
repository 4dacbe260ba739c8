//! Serde helpers for testimonial timestamps
//!
//! The endpoint has shipped several timestamp encodings over time:
//! - RFC3339 strings (`2026-03-03T10:00:00Z`)
//! - Unix seconds
//! - Unix milliseconds
//!
//! All of them deserialize into `Option<DateTime<Utc>>`; anything unreadable
//! becomes `None` rather than failing the surrounding record. Serialization
//! always writes RFC3339 so cached payloads round-trip through one format.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serializer};

/// Values above this are treated as milliseconds (roughly the year 5138 when read as seconds).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Number(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    let Some(raw) = Option::<RawTimestamp>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let parsed = match raw {
        RawTimestamp::Text(s) if s.trim().is_empty() => None,
        RawTimestamp::Text(s) => match DateTime::parse_from_rfc3339(s.trim()) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                log::debug!("[feed] Ignoring invalid timestamp '{s}': {e}");
                None
            }
        },
        RawTimestamp::Number(n) => from_unix(n),
        #[allow(clippy::cast_possible_truncation)]
        RawTimestamp::Float(f) if f.is_finite() => from_unix(f as i64),
        RawTimestamp::Float(_) | RawTimestamp::Other(_) => None,
    };
    Ok(parsed)
}

fn from_unix(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}
