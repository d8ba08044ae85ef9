//! Core types, keys, and record decoding for the dashboard ETL pipeline.

pub mod error;
pub mod event_kind;
pub mod keys;
pub mod payload;
pub mod records;

pub use error::{Error, Result};
pub use event_kind::EventKind;
pub use keys::{KpiKey, SessionKey, TimeKey, ToolKey};
pub use payload::EventProperties;
pub use records::{DailyUsage, RawEvent};
