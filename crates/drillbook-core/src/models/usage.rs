//! Persistent usage statistics per activity identity.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Snapshot of `identity_key -> usage_count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UsageCounts(pub BTreeMap<String, u64>);

impl UsageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usage count of an identity, zero when never finalized.
    pub fn get(&self, identity_key: &str) -> u64 {
        self.0.get(identity_key).copied().unwrap_or(0)
    }

    /// Adds one use for every key.
    pub fn increment<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            *self.0.entry(key.to_string()).or_insert(0) += 1;
        }
    }

    /// Overwrites the stored counts with fresher values.
    pub fn merge(&mut self, other: &UsageCounts) {
        for (key, count) in &other.0 {
            self.0.insert(key.clone(), *count);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A usage row as listed by `most_used`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageEntry {
    pub identity_key: String,
    pub count: u64,
    pub last_used_at: Option<Timestamp>,
}
