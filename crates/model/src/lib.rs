//! Dimension and fact builders for the dashboard star schema.
//!
//! Builders are pure functions from source records to warehouse rows;
//! the load orchestrator in [`load`] is the only part that touches
//! storage.

pub mod event_types;
pub mod facts;
pub mod kpis;
pub mod load;
pub mod sessions;
pub mod time;
pub mod tools;

pub use load::{load_star_schema, LoadReport};

use etl_core::{DailyUsage, RawEvent};
use warehouse::insert::{
    AnalyticsFactRow, DailyKpiRow, EventTypeRow, SessionRow, TimeRow, ToolRow,
};

/// All builder output for one pipeline run.
#[derive(Debug, Default)]
pub struct StarSchema {
    pub tools: Vec<ToolRow>,
    pub time_slots: Vec<TimeRow>,
    pub sessions: Vec<SessionRow>,
    pub event_types: Vec<EventTypeRow>,
    pub analytics: Vec<AnalyticsFactRow>,
    pub daily_kpis: Vec<DailyKpiRow>,
}

/// Runs every builder over the extracted source records.
pub fn build_star_schema(events: &[RawEvent], daily: &[DailyUsage]) -> StarSchema {
    StarSchema {
        tools: tools::build_tools(events),
        time_slots: time::build_time(events),
        sessions: sessions::build_sessions(events),
        event_types: event_types::build_event_types(),
        analytics: facts::build_analytics_facts(events),
        daily_kpis: kpis::build_daily_kpis(daily),
    }
}
