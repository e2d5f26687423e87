//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use crate::models::{UsageEntry, WorkloadRecord};

/// Newtype wrapper for the most-used activity listing.
///
/// ```rust
/// use drillbook_core::{display::UsageEntries, models::UsageEntry};
///
/// let entries = UsageEntries(vec![UsageEntry {
///     identity_key: "rondo 4vs2".to_string(),
///     count: 3,
///     last_used_at: None,
/// }]);
/// assert!(entries.to_string().contains("- **rondo 4vs2**: 3"));
/// assert!(UsageEntries(Vec::new()).to_string().contains("No activities"));
/// ```
pub struct UsageEntries(pub Vec<UsageEntry>);

impl UsageEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UsageEntry> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a UsageEntries {
    type Item = &'a UsageEntry;
    type IntoIter = std::slice::Iter<'a, UsageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for UsageEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No activities have been finalized yet.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for a coach and team's per-period workload.
pub struct WorkloadHistory(pub Vec<WorkloadRecord>);

impl WorkloadHistory {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for WorkloadHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No workload recorded.");
        }
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}
