//! Load orchestration: dimensions strictly before facts.
//!
//! The sink enforces no referential integrity, so load order is the only
//! safeguard. Within a tier each table's load is independent: one
//! failure is logged and the next table still runs.

use std::collections::HashSet;

use etl_core::Result;
use tracing::{error, info};
use warehouse::{insert, Warehouse};

use crate::StarSchema;

/// Per-table row counts for one completed load.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub tools: usize,
    pub time_slots: usize,
    pub sessions: usize,
    pub event_types: usize,
    pub analytics: usize,
    pub daily_kpis: usize,
    /// Tables whose load failed; the rest of their tier still ran.
    pub failed_tables: Vec<&'static str>,
}

impl LoadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed_tables.is_empty()
    }
}

/// Loads the full star schema: all four dimensions, then both facts.
pub fn load_star_schema(warehouse: &Warehouse, mut schema: StarSchema) -> LoadReport {
    // Grouping upstream already yields one row per session id; re-dedup
    // before load so a builder regression can't violate the primary key.
    dedup_sessions(&mut schema.sessions);

    let mut report = LoadReport::default();

    report.tools = run_step("dim_tools", &mut report.failed_tables, || {
        insert::insert_tools(warehouse, &schema.tools)
    });
    report.time_slots = run_step("dim_time", &mut report.failed_tables, || {
        insert::insert_time_slots(warehouse, &schema.time_slots)
    });
    report.sessions = run_step("dim_sessions", &mut report.failed_tables, || {
        insert::insert_sessions(warehouse, &schema.sessions)
    });
    report.event_types = run_step("dim_event_types", &mut report.failed_tables, || {
        insert::insert_event_types(warehouse, &schema.event_types)
    });

    report.analytics = run_step("fact_analytics", &mut report.failed_tables, || {
        insert::insert_analytics_facts(warehouse, &schema.analytics)
    });
    report.daily_kpis = run_step("fact_daily_kpis", &mut report.failed_tables, || {
        insert::insert_daily_kpis(warehouse, &schema.daily_kpis)
    });

    report
}

fn run_step(
    table: &'static str,
    failed: &mut Vec<&'static str>,
    load: impl FnOnce() -> Result<usize>,
) -> usize {
    match load() {
        Ok(0) => {
            info!(table, rows = 0, "nothing to load");
            0
        }
        Ok(rows) => {
            info!(table, rows, "loaded table");
            rows
        }
        Err(e) => {
            error!(table, error = %e, "load failed");
            failed.push(table);
            0
        }
    }
}

fn dedup_sessions(rows: &mut Vec<insert::SessionRow>) {
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.session_key.clone()));
}
