//! Database schema initialization and versioning.

use crate::error::{DatabaseResultExt, EngineError, Result};

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

impl super::Database {
    /// Creates the tables of a fresh file and stamps its version. Files
    /// written by a newer drillbook are refused rather than modified.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let current = self.schema_version()?;
        if current > SCHEMA_VERSION {
            return Err(EngineError::UnsupportedSchema {
                found: current,
                supported: SCHEMA_VERSION,
            });
        }

        if current < 1 {
            let schema_sql = include_str!("../../assets/schema.sql");
            self.connection
                .execute_batch(schema_sql)
                .db_context("Failed to initialize database schema")?;
            self.connection
                .execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
                .db_context("Failed to record schema version")?;
        }

        Ok(())
    }

    /// Version stamped in the open file, 0 for a file never initialized.
    pub fn schema_version(&self) -> Result<i64> {
        self.connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .db_context("Failed to read schema version")
    }
}
