//! Unified error types for the ETL pipeline.
//!
//! Only failures that callers act on become `Error`s. Per-table
//! extraction failures degrade to empty row sets inside the source
//! adapter, and per-row decode failures are skipped with a `tracing`
//! warning; neither surfaces here.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ETL pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A structurally required input table was empty. No facts can be
    /// built, so the run aborts before touching the warehouse.
    #[error("required input table '{0}' is empty")]
    MissingInput(&'static str),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
