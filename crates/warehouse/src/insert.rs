//! Star-schema row types and batch load helpers.
//!
//! Builders produce these rows; the load step binds them. Dates and
//! timestamps cross the boundary as strings with explicit casts, so the
//! typed `chrono` values never leak driver-specific representations.

use chrono::{DateTime, NaiveDate, Utc};
use duckdb::params;
use etl_core::{Error, Result};
use tracing::debug;

use crate::client::Warehouse;

/// Row for `dim_tools`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRow {
    pub tool_key: String,
    pub tool_name: String,
    pub tool_category: Option<String>,
    pub tool_display_name: String,
    pub tool_description: String,
    pub is_active: bool,
    pub icon_name: String,
    pub sort_order: i32,
}

/// Row for `dim_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRow {
    pub time_key: String,
    pub date: NaiveDate,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub day_of_week: i32,
    pub day_name: String,
    pub month_name: String,
    pub quarter: i32,
    pub is_weekend: bool,
    pub date_label: String,
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
}

/// Row for `dim_sessions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub session_key: String,
    pub session_id: String,
    pub user_agent: String,
    pub browser: String,
    pub operating_system: String,
    pub device_type: String,
    pub language: String,
    pub referrer: String,
    pub session_start: Option<DateTime<Utc>>,
}

/// Row for `dim_event_types`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTypeRow {
    pub event_type_key: String,
    pub event_type: String,
    pub event_category: String,
    pub event_description: String,
    pub is_conversion_event: bool,
    pub event_weight: f64,
    pub display_name: String,
    pub icon_class: String,
    pub color_code: String,
}

/// Row for `fact_analytics`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsFactRow {
    pub analytics_key: i64,
    pub tool_key: Option<String>,
    pub time_key: Option<String>,
    pub session_key: Option<String>,
    pub event_type_key: String,
    pub event_count: i32,
    pub upload_flag: bool,
    pub download_flag: bool,
    pub processing_flag: bool,
    pub error_flag: bool,
    pub file_size_bytes: Option<i64>,
    pub processing_time_ms: Option<i64>,
    pub event_id: String,
    pub user_id: Option<String>,
    pub url: Option<String>,
}

/// Row for `fact_daily_kpis`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyKpiRow {
    pub kpi_key: String,
    pub date: NaiveDate,
    pub tool_key: String,
    pub total_events: i64,
    pub total_uploads: i64,
    pub total_processing: i64,
    pub total_downloads: i64,
    pub total_errors: i64,
    pub unique_sessions: i64,
    pub unique_users: i64,
    pub page_views: i64,
    pub upload_to_processing_rate: f64,
    pub processing_to_download_rate: f64,
    pub upload_to_download_rate: f64,
    pub avg_processing_time_ms: Option<f64>,
    pub avg_file_size_bytes: Option<f64>,
    pub avg_session_duration_min: Option<f64>,
}

fn insert_err(table: &str, e: duckdb::Error) -> Error {
    Error::database(format!("insert {table}: {e}"))
}

/// Load tool dimension rows.
pub fn insert_tools(warehouse: &Warehouse, rows: &[ToolRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO dim_tools (tool_key, tool_name, tool_category, tool_display_name,
             tool_description, is_active, icon_name, sort_order)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| insert_err("dim_tools", e))?;

    for row in rows {
        stmt.execute(params![
            row.tool_key,
            row.tool_name,
            row.tool_category,
            row.tool_display_name,
            row.tool_description,
            row.is_active,
            row.icon_name,
            row.sort_order,
        ])
        .map_err(|e| insert_err("dim_tools", e))?;
    }

    debug!(rows = rows.len(), "loaded dim_tools");
    Ok(rows.len())
}

/// Load time dimension rows.
pub fn insert_time_slots(warehouse: &Warehouse, rows: &[TimeRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO dim_time (time_key, date, year, month, day, hour, day_of_week,
             day_name, month_name, quarter, is_weekend, date_label, week_start, month_start)
             VALUES (?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                     CAST(? AS DATE), CAST(? AS DATE))",
        )
        .map_err(|e| insert_err("dim_time", e))?;

    for row in rows {
        stmt.execute(params![
            row.time_key,
            row.date.to_string(),
            row.year,
            row.month,
            row.day,
            row.hour,
            row.day_of_week,
            row.day_name,
            row.month_name,
            row.quarter,
            row.is_weekend,
            row.date_label,
            row.week_start.to_string(),
            row.month_start.to_string(),
        ])
        .map_err(|e| insert_err("dim_time", e))?;
    }

    debug!(rows = rows.len(), "loaded dim_time");
    Ok(rows.len())
}

/// Load session dimension rows.
pub fn insert_sessions(warehouse: &Warehouse, rows: &[SessionRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO dim_sessions (session_key, session_id, user_agent, browser,
             operating_system, device_type, language, referrer, session_start)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
        )
        .map_err(|e| insert_err("dim_sessions", e))?;

    for row in rows {
        let session_start = row
            .session_start
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string());
        stmt.execute(params![
            row.session_key,
            row.session_id,
            row.user_agent,
            row.browser,
            row.operating_system,
            row.device_type,
            row.language,
            row.referrer,
            session_start,
        ])
        .map_err(|e| insert_err("dim_sessions", e))?;
    }

    debug!(rows = rows.len(), "loaded dim_sessions");
    Ok(rows.len())
}

/// Load the static event-type reference rows.
pub fn insert_event_types(warehouse: &Warehouse, rows: &[EventTypeRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO dim_event_types (event_type_key, event_type, event_category,
             event_description, is_conversion_event, event_weight, display_name,
             icon_class, color_code)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| insert_err("dim_event_types", e))?;

    for row in rows {
        stmt.execute(params![
            row.event_type_key,
            row.event_type,
            row.event_category,
            row.event_description,
            row.is_conversion_event,
            row.event_weight,
            row.display_name,
            row.icon_class,
            row.color_code,
        ])
        .map_err(|e| insert_err("dim_event_types", e))?;
    }

    debug!(rows = rows.len(), "loaded dim_event_types");
    Ok(rows.len())
}

/// Load event-grain fact rows.
pub fn insert_analytics_facts(warehouse: &Warehouse, rows: &[AnalyticsFactRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO fact_analytics (analytics_key, tool_key, time_key, session_key,
             event_type_key, event_count, upload_flag, download_flag, processing_flag,
             error_flag, file_size_bytes, processing_time_ms, event_id, user_id, url)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| insert_err("fact_analytics", e))?;

    for row in rows {
        stmt.execute(params![
            row.analytics_key,
            row.tool_key,
            row.time_key,
            row.session_key,
            row.event_type_key,
            row.event_count,
            row.upload_flag,
            row.download_flag,
            row.processing_flag,
            row.error_flag,
            row.file_size_bytes,
            row.processing_time_ms,
            row.event_id,
            row.user_id,
            row.url,
        ])
        .map_err(|e| insert_err("fact_analytics", e))?;
    }

    debug!(rows = rows.len(), "loaded fact_analytics");
    Ok(rows.len())
}

/// Load daily KPI fact rows.
pub fn insert_daily_kpis(warehouse: &Warehouse, rows: &[DailyKpiRow]) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut stmt = warehouse
        .conn()
        .prepare(
            "INSERT INTO fact_daily_kpis (kpi_key, date, tool_key, total_events,
             total_uploads, total_processing, total_downloads, total_errors,
             unique_sessions, unique_users, page_views, upload_to_processing_rate,
             processing_to_download_rate, upload_to_download_rate,
             avg_processing_time_ms, avg_file_size_bytes, avg_session_duration_min)
             VALUES (?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(|e| insert_err("fact_daily_kpis", e))?;

    for row in rows {
        stmt.execute(params![
            row.kpi_key,
            row.date.to_string(),
            row.tool_key,
            row.total_events,
            row.total_uploads,
            row.total_processing,
            row.total_downloads,
            row.total_errors,
            row.unique_sessions,
            row.unique_users,
            row.page_views,
            row.upload_to_processing_rate,
            row.processing_to_download_rate,
            row.upload_to_download_rate,
            row.avg_processing_time_ms,
            row.avg_file_size_bytes,
            row.avg_session_duration_min,
        ])
        .map_err(|e| insert_err("fact_daily_kpis", e))?;
    }

    debug!(rows = rows.len(), "loaded fact_daily_kpis");
    Ok(rows.len())
}
