//! SQLite persistence for usage counters and workload totals.
//!
//! This module provides the on-disk implementation of
//! [`UsageStore`](crate::store::UsageStore) and
//! [`WorkloadStore`](crate::store::WorkloadStore). Every write runs inside a
//! `BEGIN IMMEDIATE` transaction, so two processes finalizing plans against
//! the same file are serialized by SQLite instead of losing increments.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{UsageCounts, UsageEntry, WorkloadRecord},
    store::{UsageStore, WorkloadStore},
};

pub mod migrations;
pub mod usage_queries;
pub mod workload_queries;

/// How long a writer waits for a competing transaction before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
#[derive(Debug)]
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

impl UsageStore for Database {
    fn load(&self) -> Result<UsageCounts> {
        self.load_usage()
    }

    fn save(&mut self, counts: &UsageCounts) -> Result<()> {
        self.save_usage(counts)
    }

    fn increment(&mut self, identity_keys: &[String]) -> Result<UsageCounts> {
        self.increment_usage(identity_keys)
    }

    fn most_used(&self, limit: usize) -> Result<Vec<UsageEntry>> {
        self.most_used_activities(limit)
    }
}

impl WorkloadStore for Database {
    fn add_load(
        &mut self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        load: f64,
    ) -> Result<f64> {
        self.add_workload(coach_id, team_id, period_key, load)
    }

    fn period_load(&self, coach_id: &str, team_id: &str, period_key: &str) -> Result<Option<f64>> {
        self.get_period_load(coach_id, team_id, period_key)
    }

    fn preceding_loads(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        limit: usize,
    ) -> Result<Vec<(String, f64)>> {
        self.get_preceding_loads(coach_id, team_id, period_key, limit)
    }

    fn history(&self, coach_id: &str, team_id: &str) -> Result<Vec<WorkloadRecord>> {
        self.get_workload_history(coach_id, team_id)
    }
}
