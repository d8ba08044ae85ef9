//! Event-grain detail fact builder.

use etl_core::{EventKind, EventProperties, RawEvent, SessionKey, TimeKey, ToolKey};
use tracing::{debug, warn};
use warehouse::insert::AnalyticsFactRow;

/// Builds one fact row per decoded source event, keyed by input ordinal.
///
/// Event-type names outside the closed set fall back to the page-view
/// key. This is intentional, load-bearing behavior inherited from the
/// dashboard's KPI definitions: unknown events count as page views, and
/// changing the fallback silently changes KPI totals.
pub fn build_analytics_facts(events: &[RawEvent]) -> Vec<AnalyticsFactRow> {
    let rows: Vec<AnalyticsFactRow> = events
        .iter()
        .enumerate()
        .map(|(ordinal, event)| fact_row(ordinal, event))
        .collect();

    debug!(rows = rows.len(), "built analytics fact table");
    rows
}

fn fact_row(ordinal: usize, event: &RawEvent) -> AnalyticsFactRow {
    let kind = match event.event_type.as_deref() {
        Some(name) => EventKind::parse(name).unwrap_or_else(|| {
            warn!(
                event_id = %event.event_id,
                event_type = name,
                "unrecognized event type, counting as page view"
            );
            EventKind::PageView
        }),
        None => {
            warn!(event_id = %event.event_id, "event has no type, counting as page view");
            EventKind::PageView
        }
    };

    let props = event
        .properties
        .as_deref()
        .and_then(EventProperties::parse)
        .unwrap_or_default();

    AnalyticsFactRow {
        analytics_key: ordinal as i64 + 1,
        tool_key: event
            .tool_name
            .as_deref()
            .map(|name| ToolKey::new(name).to_string()),
        time_key: match (event.date, event.hour) {
            (Some(date), Some(hour)) => Some(TimeKey::new(date, hour).to_string()),
            _ => None,
        },
        session_key: event
            .session_id
            .as_deref()
            .map(|id| SessionKey::new(id).to_string()),
        event_type_key: kind.key().to_string(),
        event_count: 1,
        upload_flag: kind == EventKind::FileUploadStarted,
        download_flag: kind == EventKind::FileDownloaded,
        processing_flag: kind == EventKind::ProcessingStarted,
        error_flag: kind == EventKind::ErrorOccurred,
        file_size_bytes: props.file_size,
        processing_time_ms: props.processing_time_ms,
        event_id: event.event_id.clone(),
        user_id: event.user_id.clone(),
        url: event.url.clone(),
    }
}
