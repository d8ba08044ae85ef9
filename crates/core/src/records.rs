//! Raw source records and per-row decoding.
//!
//! Decoding is where the per-row skip policy lives: a row that fails
//! field extraction is dropped with a warning, and the rest of the table
//! keeps building. Missing optional fields are `None`, not errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// One row of the `analytics_events` source table.
///
/// `event_id` is the only required field; everything else degrades to
/// `None` and is handled downstream (null dimension keys, skipped
/// dimension rows).
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub event_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub hour: Option<u8>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub properties: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One row of the pre-aggregated `daily_tool_usage` source table.
///
/// The (date, tool_name) pair is the grain; counts are nullable in the
/// source and treated as 0 by the KPI builder.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub tool_name: String,
    #[serde(default)]
    pub file_uploads: Option<i64>,
    #[serde(default)]
    pub processing_started: Option<i64>,
    #[serde(default)]
    pub downloads: Option<i64>,
    #[serde(default)]
    pub errors: Option<i64>,
    #[serde(default)]
    pub total_events: Option<i64>,
    #[serde(default)]
    pub unique_sessions: Option<i64>,
    #[serde(default)]
    pub unique_users: Option<i64>,
    #[serde(default)]
    pub page_views: Option<i64>,
}

/// Decodes raw event rows, skipping rows that fail extraction.
pub fn decode_events(rows: &[Value]) -> Vec<RawEvent> {
    decode_rows(rows, "analytics_events")
}

/// Decodes daily aggregate rows, skipping rows that fail extraction.
pub fn decode_daily(rows: &[Value]) -> Vec<DailyUsage> {
    decode_rows(rows, "daily_tool_usage")
}

fn decode_rows<T: serde::de::DeserializeOwned>(rows: &[Value], table: &str) -> Vec<T> {
    let mut decoded = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        match serde_json::from_value::<T>(row.clone()) {
            Ok(record) => decoded.push(record),
            Err(e) => warn!(table, row = idx, error = %e, "skipping malformed source row"),
        }
    }
    decoded
}

/// Source timestamps arrive either as RFC 3339 or as a naive
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` string; unparsable values become `None`
/// rather than dropping the row.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
