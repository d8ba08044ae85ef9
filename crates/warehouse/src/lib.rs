//! DuckDB warehouse client: schema, loading, and dashboard queries.

pub mod client;
pub mod insert;
pub mod reports;
pub mod schema;

pub use client::Warehouse;
