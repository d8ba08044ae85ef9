//! Warehouse table schemas.
//!
//! The pipeline is full-refresh: every run drops and recreates all six
//! tables before loading. `created_at` audit columns are filled by the
//! sink's defaults, never by builders, which keeps builder output
//! deterministic across runs.

use etl_core::{Error, Result};
use tracing::info;

use crate::client::Warehouse;

/// Event-grain central fact table.
pub const CREATE_FACT_ANALYTICS: &str = r#"
CREATE TABLE fact_analytics (
    analytics_key BIGINT PRIMARY KEY,
    tool_key VARCHAR,
    time_key VARCHAR,
    session_key VARCHAR,
    event_type_key VARCHAR,
    event_count INTEGER DEFAULT 1,
    upload_flag BOOLEAN DEFAULT FALSE,
    download_flag BOOLEAN DEFAULT FALSE,
    processing_flag BOOLEAN DEFAULT FALSE,
    error_flag BOOLEAN DEFAULT FALSE,
    file_size_bytes BIGINT,
    processing_time_ms BIGINT,
    event_id VARCHAR,
    user_id VARCHAR,
    url VARCHAR,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

/// Pre-aggregated KPI fact table at (date, tool) grain.
pub const CREATE_FACT_DAILY_KPIS: &str = r#"
CREATE TABLE fact_daily_kpis (
    kpi_key VARCHAR PRIMARY KEY,
    date DATE,
    tool_key VARCHAR,
    total_events INTEGER DEFAULT 0,
    total_uploads INTEGER DEFAULT 0,
    total_processing INTEGER DEFAULT 0,
    total_downloads INTEGER DEFAULT 0,
    total_errors INTEGER DEFAULT 0,
    unique_sessions INTEGER DEFAULT 0,
    unique_users INTEGER DEFAULT 0,
    page_views INTEGER DEFAULT 0,
    upload_to_processing_rate DOUBLE DEFAULT 0.0,
    processing_to_download_rate DOUBLE DEFAULT 0.0,
    upload_to_download_rate DOUBLE DEFAULT 0.0,
    avg_processing_time_ms DOUBLE,
    avg_file_size_bytes DOUBLE,
    avg_session_duration_min DOUBLE,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

pub const CREATE_DIM_TOOLS: &str = r#"
CREATE TABLE dim_tools (
    tool_key VARCHAR PRIMARY KEY,
    tool_name VARCHAR,
    tool_category VARCHAR,
    tool_display_name VARCHAR,
    tool_description VARCHAR,
    is_active BOOLEAN DEFAULT TRUE,
    icon_name VARCHAR,
    sort_order INTEGER,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

pub const CREATE_DIM_TIME: &str = r#"
CREATE TABLE dim_time (
    time_key VARCHAR PRIMARY KEY,
    date DATE,
    year INTEGER,
    month INTEGER,
    day INTEGER,
    hour INTEGER,
    day_of_week INTEGER,
    day_name VARCHAR,
    month_name VARCHAR,
    quarter INTEGER,
    is_weekend BOOLEAN,
    date_label VARCHAR,
    week_start DATE,
    month_start DATE,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

pub const CREATE_DIM_SESSIONS: &str = r#"
CREATE TABLE dim_sessions (
    session_key VARCHAR PRIMARY KEY,
    session_id VARCHAR,
    user_agent VARCHAR,
    browser VARCHAR,
    operating_system VARCHAR,
    device_type VARCHAR,
    language VARCHAR,
    referrer VARCHAR,
    session_start TIMESTAMP,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

pub const CREATE_DIM_EVENT_TYPES: &str = r#"
CREATE TABLE dim_event_types (
    event_type_key VARCHAR PRIMARY KEY,
    event_type VARCHAR,
    event_category VARCHAR,
    event_description VARCHAR,
    is_conversion_event BOOLEAN DEFAULT FALSE,
    event_weight DOUBLE DEFAULT 1.0,
    display_name VARCHAR,
    icon_class VARCHAR,
    color_code VARCHAR,
    created_at TIMESTAMP DEFAULT current_timestamp
)
"#;

/// All tables in referential load order: dimensions first, then facts.
pub const TABLES: [(&str, &str); 6] = [
    ("dim_tools", CREATE_DIM_TOOLS),
    ("dim_time", CREATE_DIM_TIME),
    ("dim_sessions", CREATE_DIM_SESSIONS),
    ("dim_event_types", CREATE_DIM_EVENT_TYPES),
    ("fact_analytics", CREATE_FACT_ANALYTICS),
    ("fact_daily_kpis", CREATE_FACT_DAILY_KPIS),
];

/// Drops and recreates the full star schema.
pub fn init_schema(warehouse: &Warehouse) -> Result<()> {
    for (name, ddl) in TABLES {
        warehouse
            .conn()
            .execute_batch(&format!("DROP TABLE IF EXISTS {name}"))
            .map_err(|e| Error::database(format!("drop {name}: {e}")))?;
        warehouse
            .conn()
            .execute_batch(ddl)
            .map_err(|e| Error::database(format!("create {name}: {e}")))?;
    }

    info!("star schema created: 2 facts + 4 dimensions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_schema_is_repeatable() {
        let warehouse = Warehouse::open_in_memory().unwrap();
        init_schema(&warehouse).unwrap();
        init_schema(&warehouse).unwrap();

        for (name, _) in TABLES {
            let count: i64 = warehouse
                .conn()
                .query_row(&format!("SELECT count(*) FROM {name}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "{name} should be empty after rebuild");
        }
    }
}
