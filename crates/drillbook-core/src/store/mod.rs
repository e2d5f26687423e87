//! Persistent store interfaces for usage counts and workload.
//!
//! The engine only needs a small key-value contract from its storage. Two
//! implementations ship with the crate: [`crate::db::Database`] (SQLite) and
//! [`MemoryStore`] (in-process maps, for tests and throwaway sessions).
//!
//! Both guarantee that [`UsageStore::increment`] and
//! [`WorkloadStore::add_load`] are read-modify-write operations that never
//! lose an update made through the same store.

use crate::{
    error::Result,
    models::{UsageCounts, UsageEntry, WorkloadRecord},
};

mod memory;

pub use memory::MemoryStore;

/// Store of `identity_key -> usage_count`.
pub trait UsageStore {
    /// Reads every usage count.
    fn load(&self) -> Result<UsageCounts>;

    /// Writes the given counts, overwriting stored values for those keys.
    /// Keys absent from `counts` are left untouched.
    fn save(&mut self, counts: &UsageCounts) -> Result<()>;

    /// Atomically adds one use per key and returns the updated counts of
    /// exactly those keys.
    fn increment(&mut self, identity_keys: &[String]) -> Result<UsageCounts>;

    /// Most used identities, highest count first.
    fn most_used(&self, limit: usize) -> Result<Vec<UsageEntry>>;
}

/// Store of `coach -> team -> period -> accumulated load`.
pub trait WorkloadStore {
    /// Adds `load` to the period's value, creating it when absent, and
    /// returns the new accumulated value.
    fn add_load(&mut self, coach_id: &str, team_id: &str, period_key: &str, load: f64)
        -> Result<f64>;

    /// Accumulated load of one period, `None` when nothing was recorded.
    fn period_load(&self, coach_id: &str, team_id: &str, period_key: &str) -> Result<Option<f64>>;

    /// Up to `limit` periods strictly before `period_key` that have data,
    /// newest first.
    fn preceding_loads(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        limit: usize,
    ) -> Result<Vec<(String, f64)>>;

    /// Every recorded period of a coach and team, oldest first.
    fn history(&self, coach_id: &str, team_id: &str) -> Result<Vec<WorkloadRecord>>;
}
