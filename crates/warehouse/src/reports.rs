//! Read-only dashboard queries over the completed star schema.
//!
//! These exist to verify that the dimensional shape supports the
//! dashboard's access patterns with plain joins and aggregates; they add
//! no entities of their own.

use etl_core::{Error, Result};

use crate::client::Warehouse;

/// Summed platform KPIs from the pre-aggregated fact table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTotals {
    pub total_events: i64,
    pub total_uploads: i64,
    pub total_processing: i64,
    pub total_downloads: i64,
    pub total_sessions: i64,
    pub active_tools: i64,
    pub avg_conversion_rate: f64,
}

/// One row of the top-tools leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TopToolRow {
    pub tool: String,
    pub icon_name: String,
    pub downloads: i64,
    pub uploads: i64,
    pub conversion_rate: f64,
    pub sessions: i64,
}

/// One day of trend data for dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrendRow {
    pub date: String,
    pub date_label: String,
    pub downloads: i64,
    pub uploads: i64,
    pub processing: i64,
}

fn query_err(e: duckdb::Error) -> Error {
    Error::database(format!("report query: {e}"))
}

/// Platform-wide KPI totals.
pub fn platform_totals(warehouse: &Warehouse) -> Result<PlatformTotals> {
    warehouse
        .conn()
        .query_row(
            "SELECT
                CAST(COALESCE(SUM(total_events), 0) AS BIGINT),
                CAST(COALESCE(SUM(total_uploads), 0) AS BIGINT),
                CAST(COALESCE(SUM(total_processing), 0) AS BIGINT),
                CAST(COALESCE(SUM(total_downloads), 0) AS BIGINT),
                CAST(COALESCE(SUM(unique_sessions), 0) AS BIGINT),
                CAST(COUNT(DISTINCT tool_key) AS BIGINT),
                COALESCE(ROUND(AVG(upload_to_download_rate), 1), 0.0)
             FROM fact_daily_kpis",
            [],
            |row| {
                Ok(PlatformTotals {
                    total_events: row.get(0)?,
                    total_uploads: row.get(1)?,
                    total_processing: row.get(2)?,
                    total_downloads: row.get(3)?,
                    total_sessions: row.get(4)?,
                    active_tools: row.get(5)?,
                    avg_conversion_rate: row.get(6)?,
                })
            },
        )
        .map_err(query_err)
}

/// Top tools by downloads, joined to display metadata.
pub fn top_tools(warehouse: &Warehouse, limit: u32) -> Result<Vec<TopToolRow>> {
    let mut stmt = warehouse
        .conn()
        .prepare(
            "SELECT
                t.tool_display_name,
                t.icon_name,
                CAST(SUM(k.total_downloads) AS BIGINT) AS downloads,
                CAST(SUM(k.total_uploads) AS BIGINT) AS uploads,
                ROUND(AVG(k.upload_to_download_rate), 1) AS conversion_rate,
                CAST(SUM(k.unique_sessions) AS BIGINT) AS sessions
             FROM fact_daily_kpis k
             JOIN dim_tools t ON k.tool_key = t.tool_key
             WHERE k.total_downloads > 0
             GROUP BY t.tool_display_name, t.icon_name, t.sort_order
             ORDER BY downloads DESC
             LIMIT ?",
        )
        .map_err(query_err)?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(TopToolRow {
                tool: row.get(0)?,
                icon_name: row.get(1)?,
                downloads: row.get(2)?,
                uploads: row.get(3)?,
                conversion_rate: row.get(4)?,
                sessions: row.get(5)?,
            })
        })
        .map_err(query_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(query_err)?;

    Ok(rows)
}

/// Most-recent daily trend rows, newest first.
///
/// `dim_time` holds one row per (date, hour); the label join goes
/// through a deduplicated date list so hourly rows don't multiply the
/// sums.
pub fn recent_daily_trends(warehouse: &Warehouse, days: u32) -> Result<Vec<DailyTrendRow>> {
    let mut stmt = warehouse
        .conn()
        .prepare(
            "WITH days AS (SELECT DISTINCT date, date_label FROM dim_time)
             SELECT
                CAST(k.date AS VARCHAR),
                d.date_label,
                CAST(SUM(k.total_downloads) AS BIGINT),
                CAST(SUM(k.total_uploads) AS BIGINT),
                CAST(SUM(k.total_processing) AS BIGINT)
             FROM fact_daily_kpis k
             JOIN days d ON k.date = d.date
             GROUP BY k.date, d.date_label
             ORDER BY k.date DESC
             LIMIT ?",
        )
        .map_err(query_err)?;

    let rows = stmt
        .query_map([days], |row| {
            Ok(DailyTrendRow {
                date: row.get(0)?,
                date_label: row.get(1)?,
                downloads: row.get(2)?,
                uploads: row.get(3)?,
                processing: row.get(4)?,
            })
        })
        .map_err(query_err)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(query_err)?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn totals_over_empty_schema_are_zero() {
        let warehouse = Warehouse::open_in_memory().unwrap();
        schema::init_schema(&warehouse).unwrap();

        let totals = platform_totals(&warehouse).unwrap();
        assert_eq!(totals.total_events, 0);
        assert_eq!(totals.active_tools, 0);
        assert_eq!(totals.avg_conversion_rate, 0.0);
        assert!(top_tools(&warehouse, 5).unwrap().is_empty());
        assert!(recent_daily_trends(&warehouse, 7).unwrap().is_empty());
    }
}
