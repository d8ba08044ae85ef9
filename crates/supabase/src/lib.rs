//! Supabase REST source adapter.
//!
//! Extraction failures degrade: a table that cannot be fetched yields an
//! empty row set and a logged error, never a propagated one. Whether an
//! empty table is fatal is the pipeline's call, not the adapter's.

pub mod client;
pub mod config;

pub use client::{SourceData, SupabaseClient};
pub use config::SupabaseConfig;
