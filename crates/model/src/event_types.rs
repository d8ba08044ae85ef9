//! Static event-type reference dimension.

use etl_core::EventKind;
use warehouse::insert::EventTypeRow;

/// Builds the six-row event-type dimension. Input-independent: every run
/// rebuilds the same rows.
pub fn build_event_types() -> Vec<EventTypeRow> {
    EventKind::ALL
        .iter()
        .map(|kind| {
            let (category, description, is_conversion, weight, display, icon, color) = match kind {
                EventKind::PageView => (
                    "Navigation",
                    "User viewed a page",
                    false,
                    1.0,
                    "Page Views",
                    "eye",
                    "#3B82F6",
                ),
                EventKind::FileUploadStarted => (
                    "Engagement",
                    "User uploaded a file",
                    true,
                    3.0,
                    "File Uploads",
                    "upload",
                    "#10B981",
                ),
                EventKind::ProcessingStarted => (
                    "Action",
                    "File processing started",
                    true,
                    2.0,
                    "Processing",
                    "cog",
                    "#F59E0B",
                ),
                EventKind::FileDownloaded => (
                    "Conversion",
                    "User downloaded processed file",
                    true,
                    5.0,
                    "Downloads",
                    "download",
                    "#EF4444",
                ),
                EventKind::SessionEnd => (
                    "Session",
                    "User session ended",
                    false,
                    0.5,
                    "Session Ends",
                    "logout",
                    "#6B7280",
                ),
                EventKind::ErrorOccurred => (
                    "Error",
                    "An error occurred",
                    false,
                    -1.0,
                    "Errors",
                    "exclamation",
                    "#DC2626",
                ),
            };

            EventTypeRow {
                event_type_key: kind.key().to_string(),
                event_type: kind.as_str().to_string(),
                event_category: category.to_string(),
                event_description: description.to_string(),
                is_conversion_event: is_conversion,
                event_weight: weight,
                display_name: display.to_string(),
                icon_class: icon.to_string(),
                color_code: color.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_exactly_six_rows() {
        let rows = build_event_types();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].event_type_key, "evt_page_view");
        assert_eq!(rows[3].event_type_key, "evt_download");
    }

    #[test]
    fn rebuild_is_identical() {
        assert_eq!(build_event_types(), build_event_types());
    }

    #[test]
    fn conversion_events_carry_positive_weight() {
        for row in build_event_types() {
            if row.is_conversion_event {
                assert!(row.event_weight > 0.0, "{}", row.event_type);
            }
        }
    }
}
