//! DuckDB connection wrapper.

use std::path::Path;

use duckdb::Connection;
use etl_core::{Error, Result};
use tracing::info;

/// Handle to the analytical warehouse database.
///
/// Opened once per pipeline run and passed by reference to every
/// component that touches storage; the connection closes when the handle
/// drops, regardless of how the run ended.
pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Opens (or creates) the database file, creating parent directories
    /// as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::database(format!("create directory {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::database(format!("open {}: {}", path.display(), e)))?;

        info!(path = %path.display(), "opened warehouse database");
        Ok(Self { conn })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::database(format!("open in-memory database: {}", e)))?;
        Ok(Self { conn })
    }

    /// Returns the inner connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/analytics.duckdb");

        let warehouse = Warehouse::open(&path).unwrap();
        warehouse
            .conn()
            .execute_batch("CREATE TABLE t (x INTEGER)")
            .unwrap();

        assert!(path.exists());
    }
}
