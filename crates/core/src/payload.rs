//! Semi-structured event properties.
//!
//! The source emits `properties` either as JSON or as a Python-style
//! single-quoted dict. Parse failure is a typed "unavailable" state
//! (`None`); it never aborts the row being processed.

use serde_json::{Map, Value};

/// Fields the pipeline reads out of an event's properties payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventProperties {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub referrer: Option<String>,
    pub file_size: Option<i64>,
    pub processing_time_ms: Option<i64>,
}

impl EventProperties {
    /// Parses a raw payload string. Returns `None` when the payload is
    /// not an object in either accepted syntax.
    pub fn parse(raw: &str) -> Option<Self> {
        let object = parse_object(raw)?;
        Some(Self {
            user_agent: string_field(&object, "user_agent"),
            language: string_field(&object, "language"),
            referrer: string_field(&object, "referrer"),
            file_size: int_field(&object, "file_size"),
            processing_time_ms: int_field(&object, "processing_time_ms"),
        })
    }
}

fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(&raw.replace('\'', "\"")))
        .ok()?;
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

fn int_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    object.get(key)?.as_i64()
}
