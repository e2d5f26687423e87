use std::{collections::BTreeMap, ops::Bound};

use jiff::Timestamp;

use super::{UsageStore, WorkloadStore};
use crate::{
    error::Result,
    models::{UsageCounts, UsageEntry, WorkloadRecord},
};

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    usage: BTreeMap<String, UsageEntry>,
    workload: BTreeMap<(String, String), BTreeMap<String, WorkloadRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn periods(&self, coach_id: &str, team_id: &str) -> Option<&BTreeMap<String, WorkloadRecord>> {
        self.workload
            .get(&(coach_id.to_string(), team_id.to_string()))
    }
}

impl UsageStore for MemoryStore {
    fn load(&self) -> Result<UsageCounts> {
        Ok(UsageCounts(
            self.usage
                .iter()
                .map(|(key, entry)| (key.clone(), entry.count))
                .collect(),
        ))
    }

    fn save(&mut self, counts: &UsageCounts) -> Result<()> {
        for (key, count) in &counts.0 {
            let entry = self.usage.entry(key.clone()).or_insert_with(|| UsageEntry {
                identity_key: key.clone(),
                count: 0,
                last_used_at: None,
            });
            entry.count = *count;
        }
        Ok(())
    }

    fn increment(&mut self, identity_keys: &[String]) -> Result<UsageCounts> {
        let now = Timestamp::now();
        let mut updated = UsageCounts::new();
        for key in identity_keys {
            let entry = self.usage.entry(key.clone()).or_insert_with(|| UsageEntry {
                identity_key: key.clone(),
                count: 0,
                last_used_at: None,
            });
            entry.count += 1;
            entry.last_used_at = Some(now);
            updated.0.insert(key.clone(), entry.count);
        }
        Ok(updated)
    }

    fn most_used(&self, limit: usize) -> Result<Vec<UsageEntry>> {
        let mut entries: Vec<UsageEntry> = self.usage.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.identity_key.cmp(&b.identity_key))
        });
        entries.truncate(limit);
        Ok(entries)
    }
}

impl WorkloadStore for MemoryStore {
    fn add_load(
        &mut self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        load: f64,
    ) -> Result<f64> {
        let now = Timestamp::now();
        let record = self
            .workload
            .entry((coach_id.to_string(), team_id.to_string()))
            .or_default()
            .entry(period_key.to_string())
            .or_insert_with(|| WorkloadRecord {
                coach_id: coach_id.to_string(),
                team_id: team_id.to_string(),
                period_key: period_key.to_string(),
                load: 0.0,
                updated_at: now,
            });
        record.load += load;
        record.updated_at = now;
        Ok(record.load)
    }

    fn period_load(&self, coach_id: &str, team_id: &str, period_key: &str) -> Result<Option<f64>> {
        Ok(self
            .periods(coach_id, team_id)
            .and_then(|periods| periods.get(period_key))
            .map(|record| record.load))
    }

    fn preceding_loads(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        limit: usize,
    ) -> Result<Vec<(String, f64)>> {
        Ok(self
            .periods(coach_id, team_id)
            .map(|periods| {
                periods
                    .range::<str, _>((Bound::Unbounded, Bound::Excluded(period_key)))
                    .rev()
                    .take(limit)
                    .map(|(key, record)| (key.clone(), record.load))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn history(&self, coach_id: &str, team_id: &str) -> Result<Vec<WorkloadRecord>> {
        Ok(self
            .periods(coach_id, team_id)
            .map(|periods| periods.values().cloned().collect())
            .unwrap_or_default())
    }
}
