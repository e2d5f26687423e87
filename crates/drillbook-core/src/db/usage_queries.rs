//! Activity usage counter queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{UsageCounts, UsageEntry},
};

const SELECT_ALL_USAGE_SQL: &str = "SELECT identity_key, usage_count FROM activity_usage";
const SELECT_USAGE_COUNT_SQL: &str =
    "SELECT usage_count FROM activity_usage WHERE identity_key = ?1";
const INCREMENT_USAGE_SQL: &str = "INSERT INTO activity_usage (identity_key, usage_count, last_used_at) VALUES (?1, 1, ?2) \
     ON CONFLICT(identity_key) DO UPDATE SET usage_count = usage_count + 1, last_used_at = excluded.last_used_at";
const UPSERT_USAGE_SQL: &str = "INSERT INTO activity_usage (identity_key, usage_count) VALUES (?1, ?2) \
     ON CONFLICT(identity_key) DO UPDATE SET usage_count = excluded.usage_count";
const SELECT_MOST_USED_SQL: &str = "SELECT identity_key, usage_count, last_used_at FROM activity_usage \
     ORDER BY usage_count DESC, identity_key ASC LIMIT ?1";

impl super::Database {
    /// Reads every usage counter.
    pub fn load_usage(&self) -> Result<UsageCounts> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_USAGE_SQL)
            .db_context("Failed to prepare usage query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })
            .db_context("Failed to query usage counts")?;

        let mut counts = UsageCounts::new();
        for row in rows {
            let (key, count) = row.db_context("Failed to read usage row")?;
            counts.0.insert(key, count);
        }
        Ok(counts)
    }

    /// Overwrites the stored counters of the given keys.
    pub fn save_usage(&mut self, counts: &UsageCounts) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        {
            let mut stmt = tx
                .prepare(UPSERT_USAGE_SQL)
                .db_context("Failed to prepare usage upsert")?;
            for (key, count) in &counts.0 {
                let count = i64::try_from(*count).unwrap_or(i64::MAX);
                stmt.execute(params![key, count])
                    .db_context("Failed to save usage count")?;
            }
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Adds one use per key in a single immediate transaction and returns
    /// the new counts of those keys.
    pub fn increment_usage(&mut self, identity_keys: &[String]) -> Result<UsageCounts> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let mut updated = UsageCounts::new();
        {
            let mut increment = tx
                .prepare(INCREMENT_USAGE_SQL)
                .db_context("Failed to prepare usage increment")?;
            let mut select = tx
                .prepare(SELECT_USAGE_COUNT_SQL)
                .db_context("Failed to prepare usage query")?;

            for key in identity_keys {
                increment
                    .execute(params![key, &now])
                    .db_context("Failed to increment usage count")?;
                let count: Option<i64> = select
                    .query_row(params![key], |row| row.get(0))
                    .optional()
                    .db_context("Failed to read usage count")?;
                updated.0.insert(key.clone(), count.unwrap_or(0) as u64);
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(updated)
    }

    /// Most used identities, highest count first, ties by key.
    pub fn most_used_activities(&self, limit: usize) -> Result<Vec<UsageEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_MOST_USED_SQL)
            .db_context("Failed to prepare usage query")?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                let last_used_at = row
                    .get::<_, Option<String>>(2)?
                    .map(|value| {
                        value.parse::<Timestamp>().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
                        })
                    })
                    .transpose()?;

                Ok(UsageEntry {
                    identity_key: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                    last_used_at,
                })
            })
            .db_context("Failed to query most used activities")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read usage row")
    }
}
