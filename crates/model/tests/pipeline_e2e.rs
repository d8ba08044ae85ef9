//! End-to-end pipeline test: decode source rows, build the star schema,
//! load it into an in-memory warehouse, and read it back through the
//! dashboard queries.

use etl_core::records;
use serde_json::json;
use star_model::{build_star_schema, load_star_schema};
use warehouse::{reports, schema, Warehouse};

fn count(warehouse: &Warehouse, table: &str) -> i64 {
    warehouse
        .conn()
        .query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn upload_then_download_round_trip() {
    let event_rows = vec![
        json!({
            "event_id": "e1",
            "user_id": "u1",
            "url": "https://example.com/merge",
            "event_type": "file_upload_started",
            "tool_name": "merge",
            "tool_category": "pdf",
            "date": "2025-07-25",
            "hour": 10,
            "session_id": "s1",
            "properties": "{'user_agent': 'Mozilla/5.0 (Windows NT 10.0) Chrome/120 Safari/537', 'file_size': 2048}",
            "timestamp": "2025-07-25T10:05:00Z"
        }),
        json!({
            "event_id": "e2",
            "user_id": "u1",
            "url": "https://example.com/merge",
            "event_type": "file_downloaded",
            "tool_name": "merge",
            "tool_category": "pdf",
            "date": "2025-07-25",
            "hour": 11,
            "session_id": "s1",
            "timestamp": "2025-07-25T11:00:00Z"
        }),
    ];
    let daily_rows = vec![json!({
        "date": "2025-07-25",
        "tool_name": "merge",
        "file_uploads": 1,
        "processing_started": 0,
        "downloads": 1,
        "errors": 0,
        "total_events": 2,
        "unique_sessions": 1,
        "unique_users": 1,
        "page_views": 0
    })];

    let events = records::decode_events(&event_rows);
    let daily = records::decode_daily(&daily_rows);
    assert_eq!(events.len(), 2);
    assert_eq!(daily.len(), 1);

    let star = build_star_schema(&events, &daily);

    // One tool, two time slots, one session, the static six event types.
    assert_eq!(star.tools.len(), 1);
    assert_eq!(star.tools[0].tool_key, "tool_merge");
    assert_eq!(star.time_slots.len(), 2);
    assert_eq!(star.sessions.len(), 1);
    assert_eq!(star.event_types.len(), 6);

    assert_eq!(star.analytics.len(), 2);
    assert!(star.analytics[0].upload_flag);
    assert!(!star.analytics[0].download_flag);
    assert!(star.analytics[1].download_flag);
    assert!(!star.analytics[1].upload_flag);
    assert_eq!(star.analytics[0].file_size_bytes, Some(2048));

    assert_eq!(star.daily_kpis.len(), 1);
    assert_eq!(star.daily_kpis[0].upload_to_download_rate, 100.0);
    assert_eq!(star.daily_kpis[0].upload_to_processing_rate, 0.0);

    let warehouse = Warehouse::open_in_memory().unwrap();
    schema::init_schema(&warehouse).unwrap();
    let report = load_star_schema(&warehouse, star);

    assert!(report.all_succeeded());
    assert_eq!(report.tools, 1);
    assert_eq!(report.time_slots, 2);
    assert_eq!(report.sessions, 1);
    assert_eq!(report.event_types, 6);
    assert_eq!(report.analytics, 2);
    assert_eq!(report.daily_kpis, 1);

    assert_eq!(count(&warehouse, "dim_tools"), 1);
    assert_eq!(count(&warehouse, "dim_time"), 2);
    assert_eq!(count(&warehouse, "fact_analytics"), 2);
    assert_eq!(count(&warehouse, "fact_daily_kpis"), 1);

    let totals = reports::platform_totals(&warehouse).unwrap();
    assert_eq!(totals.total_uploads, 1);
    assert_eq!(totals.total_downloads, 1);
    assert_eq!(totals.active_tools, 1);
    assert_eq!(totals.avg_conversion_rate, 100.0);

    let top = reports::top_tools(&warehouse, 5).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].tool, "Merge");
    assert_eq!(top[0].downloads, 1);

    let trends = reports::recent_daily_trends(&warehouse, 7).unwrap();
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].date_label, "Jul 25, 2025");
    // Two hourly dim_time rows for the day must not double the sums.
    assert_eq!(trends[0].downloads, 1);
    assert_eq!(trends[0].uploads, 1);
}

#[test]
fn malformed_rows_do_not_fail_the_run() {
    let event_rows = vec![
        json!({"event_type": "page_view"}),
        json!({
            "event_id": "e1",
            "event_type": "page_view",
            "tool_name": "split",
            "date": "2025-07-25",
            "hour": 9,
            "session_id": "s1",
            "properties": "corrupted {{{"
        }),
    ];
    let daily_rows = vec![json!({"date": "2025-07-25", "tool_name": "split"})];

    let events = records::decode_events(&event_rows);
    let daily = records::decode_daily(&daily_rows);
    assert_eq!(events.len(), 1, "row without event_id is dropped");

    let star = build_star_schema(&events, &daily);
    assert_eq!(star.sessions.len(), 1);
    assert_eq!(star.sessions[0].browser, "Unknown");

    let warehouse = Warehouse::open_in_memory().unwrap();
    schema::init_schema(&warehouse).unwrap();
    let report = load_star_schema(&warehouse, star);

    assert!(report.all_succeeded());
    assert_eq!(report.analytics, 1);
    assert_eq!(report.daily_kpis, 1);
}

#[test]
fn rebuild_replaces_previous_run() {
    let event_rows = vec![json!({
        "event_id": "e1",
        "event_type": "page_view",
        "tool_name": "merge",
        "date": "2025-07-25",
        "hour": 10,
        "session_id": "s1"
    })];
    let daily_rows = vec![json!({
        "date": "2025-07-25",
        "tool_name": "merge",
        "file_uploads": 4,
        "downloads": 1,
        "total_events": 5
    })];

    let events = records::decode_events(&event_rows);
    let daily = records::decode_daily(&daily_rows);

    let warehouse = Warehouse::open_in_memory().unwrap();
    for _ in 0..2 {
        schema::init_schema(&warehouse).unwrap();
        let report = load_star_schema(&warehouse, build_star_schema(&events, &daily));
        assert!(report.all_succeeded());
    }

    // Full refresh: the second run replaces the first, no accumulation.
    assert_eq!(count(&warehouse, "fact_analytics"), 1);
    assert_eq!(count(&warehouse, "fact_daily_kpis"), 1);

    let totals = reports::platform_totals(&warehouse).unwrap();
    assert_eq!(totals.total_uploads, 4);
    assert_eq!(totals.avg_conversion_rate, 25.0);
}
