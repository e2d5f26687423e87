//! Workload accumulation queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, Result},
    models::WorkloadRecord,
};

const ADD_LOAD_SQL: &str = "INSERT INTO workload (coach_id, team_id, period_key, load, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(coach_id, team_id, period_key) DO UPDATE SET load = load + excluded.load, updated_at = excluded.updated_at";
const SELECT_PERIOD_LOAD_SQL: &str =
    "SELECT load FROM workload WHERE coach_id = ?1 AND team_id = ?2 AND period_key = ?3";
const SELECT_PRECEDING_SQL: &str = "SELECT period_key, load FROM workload \
     WHERE coach_id = ?1 AND team_id = ?2 AND period_key < ?3 ORDER BY period_key DESC LIMIT ?4";
const SELECT_HISTORY_SQL: &str = "SELECT coach_id, team_id, period_key, load, updated_at FROM workload \
     WHERE coach_id = ?1 AND team_id = ?2 ORDER BY period_key ASC";

impl super::Database {
    /// Adds a session load to its period and returns the accumulated value.
    pub fn add_workload(
        &mut self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        load: f64,
    ) -> Result<f64> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        tx.execute(
            ADD_LOAD_SQL,
            params![coach_id, team_id, period_key, load, &now],
        )
        .db_context("Failed to add workload")?;

        let total: f64 = tx
            .query_row(
                SELECT_PERIOD_LOAD_SQL,
                params![coach_id, team_id, period_key],
                |row| row.get(0),
            )
            .db_context("Failed to read accumulated workload")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(total)
    }

    /// Accumulated load of one period.
    pub fn get_period_load(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
    ) -> Result<Option<f64>> {
        self.connection
            .query_row(
                SELECT_PERIOD_LOAD_SQL,
                params![coach_id, team_id, period_key],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to query period load")
    }

    /// Up to `limit` periods before `period_key`, newest first.
    pub fn get_preceding_loads(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        limit: usize,
    ) -> Result<Vec<(String, f64)>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PRECEDING_SQL)
            .db_context("Failed to prepare workload query")?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![coach_id, team_id, period_key, limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })
            .db_context("Failed to query preceding workload")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read workload row")
    }

    /// Every period of a coach and team, oldest first.
    pub fn get_workload_history(&self, coach_id: &str, team_id: &str) -> Result<Vec<WorkloadRecord>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_HISTORY_SQL)
            .db_context("Failed to prepare workload query")?;

        let rows = stmt
            .query_map(params![coach_id, team_id], |row| {
                Ok(WorkloadRecord {
                    coach_id: row.get(0)?,
                    team_id: row.get(1)?,
                    period_key: row.get(2)?,
                    load: row.get(3)?,
                    updated_at: row.get::<_, String>(4)?.parse::<Timestamp>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                    })?,
                })
            })
            .db_context("Failed to query workload history")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read workload row")
    }
}
