//! Time dimension builder.
//!
//! Every derived field is a pure function of the (date, hour) pair, so
//! identical input always produces identical rows.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use etl_core::{RawEvent, TimeKey};
use tracing::debug;
use warehouse::insert::TimeRow;

/// Derives every dashboard attribute for one (date, hour) slot.
pub fn time_row(date: NaiveDate, hour: u8) -> TimeRow {
    // Monday = 0, matching the source convention.
    let weekday = date.weekday().num_days_from_monday();

    TimeRow {
        time_key: TimeKey::new(date, hour).to_string(),
        date,
        year: date.year(),
        month: date.month() as i32,
        day: date.day() as i32,
        hour: hour as i32,
        day_of_week: weekday as i32,
        day_name: date.format("%A").to_string(),
        month_name: date.format("%B").to_string(),
        quarter: (date.month() as i32 - 1) / 3 + 1,
        is_weekend: weekday >= 5,
        date_label: date.format("%b %d, %Y").to_string(),
        week_start: date - Duration::days(weekday as i64),
        month_start: date.with_day(1).unwrap_or(date),
    }
}

/// Builds the time dimension: one row per distinct (date, hour) pair.
/// Rows missing either component can't form a slot and are skipped.
pub fn build_time(events: &[RawEvent]) -> Vec<TimeRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for event in events {
        let (Some(date), Some(hour)) = (event.date, event.hour) else {
            continue;
        };
        if seen.insert((date, hour)) {
            rows.push(time_row(date, hour));
        }
    }

    debug!(rows = rows.len(), "built time dimension");
    rows
}
