//! Pre-aggregated daily KPI fact builder.

use etl_core::{DailyUsage, KpiKey, ToolKey};
use tracing::debug;
use warehouse::insert::DailyKpiRow;

/// Percentage of `numerator` over `denominator`, rounded to 2 decimals.
/// A zero denominator yields 0, not null: dashboards chart these series
/// directly.
fn conversion_rate(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        round2(numerator as f64 / denominator as f64 * 100.0)
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds one KPI row per (date, tool) aggregate. Missing numeric inputs
/// are treated as 0 before any ratio is computed.
pub fn build_daily_kpis(daily: &[DailyUsage]) -> Vec<DailyKpiRow> {
    let rows: Vec<DailyKpiRow> = daily
        .iter()
        .map(|usage| {
            let uploads = usage.file_uploads.unwrap_or(0);
            let processing = usage.processing_started.unwrap_or(0);
            let downloads = usage.downloads.unwrap_or(0);

            DailyKpiRow {
                kpi_key: KpiKey::new(usage.date, &usage.tool_name).to_string(),
                date: usage.date,
                tool_key: ToolKey::new(&usage.tool_name).to_string(),
                total_events: usage.total_events.unwrap_or(0),
                total_uploads: uploads,
                total_processing: processing,
                total_downloads: downloads,
                total_errors: usage.errors.unwrap_or(0),
                unique_sessions: usage.unique_sessions.unwrap_or(0),
                unique_users: usage.unique_users.unwrap_or(0),
                page_views: usage.page_views.unwrap_or(0),
                upload_to_processing_rate: conversion_rate(processing, uploads),
                processing_to_download_rate: conversion_rate(downloads, processing),
                upload_to_download_rate: conversion_rate(downloads, uploads),
                // Reserved for enrichment from event-level measures.
                avg_processing_time_ms: None,
                avg_file_size_bytes: None,
                avg_session_duration_min: None,
            }
        })
        .collect();

    debug!(rows = rows.len(), "built daily KPI fact table");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn usage(uploads: Option<i64>, processing: Option<i64>, downloads: Option<i64>) -> DailyUsage {
        DailyUsage {
            date: "2025-07-25".parse().unwrap(),
            tool_name: "merge".into(),
            file_uploads: uploads,
            processing_started: processing,
            downloads,
            errors: None,
            total_events: Some(10),
            unique_sessions: Some(4),
            unique_users: Some(3),
            page_views: Some(6),
        }
    }

    #[test]
    fn computes_conversion_rates() {
        let rows = build_daily_kpis(&[usage(Some(200), Some(120), Some(50))]);
        assert_eq!(rows[0].upload_to_processing_rate, 60.0);
        assert_eq!(rows[0].processing_to_download_rate, 41.67);
        assert_eq!(rows[0].upload_to_download_rate, 25.0);
    }

    #[test]
    fn zero_denominator_yields_zero_rate() {
        let rows = build_daily_kpis(&[usage(Some(0), Some(0), Some(50))]);
        assert_eq!(rows[0].upload_to_processing_rate, 0.0);
        assert_eq!(rows[0].processing_to_download_rate, 0.0);
        assert_eq!(rows[0].upload_to_download_rate, 0.0);
    }

    #[test]
    fn missing_counts_are_treated_as_zero() {
        let rows = build_daily_kpis(&[usage(None, None, None)]);
        assert_eq!(rows[0].total_uploads, 0);
        assert_eq!(rows[0].total_processing, 0);
        assert_eq!(rows[0].total_downloads, 0);
        assert_eq!(rows[0].upload_to_download_rate, 0.0);
    }

    #[test]
    fn derives_keys_from_grain() {
        let rows = build_daily_kpis(&[usage(Some(1), None, Some(1))]);
        assert_eq!(rows[0].kpi_key, "2025-07-25_merge");
        assert_eq!(rows[0].tool_key, "tool_merge");
        assert_eq!(rows[0].upload_to_download_rate, 100.0);
    }

    #[test]
    fn rates_round_to_two_decimals() {
        // 1/3 * 100 = 33.333... -> 33.33
        let rows = build_daily_kpis(&[usage(Some(3), Some(1), Some(1))]);
        assert_eq!(rows[0].upload_to_processing_rate, 33.33);
    }

    #[test]
    fn reserved_averages_stay_null() {
        let rows = build_daily_kpis(&[usage(Some(1), Some(1), Some(1))]);
        assert_eq!(rows[0].avg_processing_time_ms, None);
        assert_eq!(rows[0].avg_file_size_bytes, None);
        assert_eq!(rows[0].avg_session_duration_min, None);
    }
}
