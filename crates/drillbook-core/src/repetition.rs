//! Repetition guard: activity identity, plan-local exclusions and the
//! least-used tie-break.
//!
//! Two layers of usage state exist. [`PlanUsage`] lives for one plan
//! generation and is discarded afterwards. [`UsageCounts`] is the persistent
//! layer, incremented only when a plan is finalized.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use crate::catalog::text::canonicalize_key;
use crate::{
    catalog::text::identity_key,
    models::{ActivityRecord, Selection, UsageCounts},
    scoring::Scored,
};

/// Base scores closer than this count as tied.
pub const TIE_EPSILON: f64 = 1e-9;

/// Identity key of a record: title without variant suffix, plus format.
///
/// ```rust
/// # use std::collections::{BTreeMap, BTreeSet};
/// use drillbook_core::{models::{ActivityRecord, Stage}, repetition::{canonicalize, canonicalize_key}};
///
/// let record = ActivityRecord {
///     identity_key: String::new(),
///     title: "Rondo 4 v 2 (variant 2)".to_string(),
///     format: "4 vs 2".to_string(),
///     stage_affinity: Stage::Small,
///     age_tags: BTreeSet::new(),
///     tactical_tags: BTreeSet::new(),
///     technical_tags: BTreeSet::new(),
///     fitness_tags: BTreeSet::new(),
///     media_reference: None,
///     url: None,
///     sections: BTreeMap::new(),
///     search_text: String::new(),
/// };
/// let key = canonicalize(&record);
/// assert_eq!(key, "rondo 4vs2|4vs2");
/// assert_eq!(canonicalize_key(&key), key);
/// ```
pub fn canonicalize(record: &ActivityRecord) -> String {
    identity_key(&record.title, &record.format)
}

/// Identities and media already placed in the plan being generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanUsage {
    pub identity_keys: BTreeSet<String>,
    pub media: BTreeSet<String>,
}

impl PlanUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an activity as used in the current plan.
    pub fn record(&mut self, activity: &ActivityRecord) {
        self.identity_keys.insert(activity.identity_key.clone());
        if let Some(media) = &activity.media_reference {
            self.media.insert(media.clone());
        }
    }

    pub fn contains(&self, activity: &ActivityRecord) -> bool {
        self.identity_keys.contains(&activity.identity_key)
    }

    /// Usage of a set of existing selections.
    pub fn from_selections<'a, I>(selections: I) -> Self
    where
        I: IntoIterator<Item = &'a Selection>,
    {
        let mut usage = Self::new();
        for selection in selections {
            usage.record(&selection.activity);
        }
        usage
    }
}

/// Set difference by identity key. Order is preserved.
pub fn exclude_used<'a>(
    candidates: &[&'a ActivityRecord],
    used: &BTreeSet<String>,
) -> Vec<&'a ActivityRecord> {
    candidates
        .iter()
        .copied()
        .filter(|candidate| !used.contains(&candidate.identity_key))
        .collect()
}

/// Among the candidates tied at the highest base score, keeps those whose
/// persistent usage count is the minimum of that tied group.
///
/// Input order is preserved; an empty input yields an empty output.
pub fn prefer_least_used<'a>(scored: &[Scored<'a>], counts: &UsageCounts) -> Vec<Scored<'a>> {
    let Some(best) = scored
        .iter()
        .map(|s| s.score.base())
        .max_by(f64::total_cmp)
    else {
        return Vec::new();
    };

    let tied: Vec<Scored<'a>> = scored
        .iter()
        .copied()
        .filter(|s| (best - s.score.base()).abs() <= TIE_EPSILON)
        .collect();

    let fewest = tied
        .iter()
        .map(|s| counts.get(&s.activity.identity_key))
        .min()
        .unwrap_or(0);

    tied.into_iter()
        .filter(|s| counts.get(&s.activity.identity_key) == fewest)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{models::Stage, scoring::Score};

    fn activity(key: &str, media: Option<&str>) -> ActivityRecord {
        ActivityRecord {
            identity_key: key.to_string(),
            title: key.to_string(),
            format: String::new(),
            stage_affinity: Stage::Small,
            age_tags: BTreeSet::new(),
            tactical_tags: BTreeSet::new(),
            technical_tags: BTreeSet::new(),
            fitness_tags: BTreeSet::new(),
            media_reference: media.map(String::from),
            url: None,
            sections: BTreeMap::new(),
            search_text: String::new(),
        }
    }

    fn scored(activity: &ActivityRecord, base: f64, jitter: f64) -> Scored<'_> {
        Scored {
            activity,
            score: Score {
                keywords: base,
                jitter,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_exclude_used_is_set_difference() {
        let a = activity("a|", None);
        let b = activity("b|", None);
        let c = activity("c|", None);
        let used = BTreeSet::from(["b|".to_string()]);

        let remaining = exclude_used(&[&a, &b, &c], &used);
        let keys: Vec<&str> = remaining.iter().map(|r| r.identity_key.as_str()).collect();
        assert_eq!(keys, vec!["a|", "c|"]);
        assert!(exclude_used(&[], &used).is_empty());
    }

    #[test]
    fn test_plan_usage_records_media() {
        let mut usage = PlanUsage::new();
        let a = activity("a|", Some("a.png"));
        usage.record(&a);
        usage.record(&activity("b|", None));

        assert!(usage.contains(&a));
        assert_eq!(usage.identity_keys.len(), 2);
        assert_eq!(usage.media, BTreeSet::from(["a.png".to_string()]));
    }

    #[test]
    fn test_prefer_least_used_only_breaks_ties() {
        let a = activity("a|", None);
        let b = activity("b|", None);
        let c = activity("c|", None);
        let mut counts = UsageCounts::new();
        counts.increment(["a|", "a|", "b|", "c|"]);

        let group = prefer_least_used(
            &[scored(&a, 5.0, 0.9), scored(&b, 5.0, 0.1), scored(&c, 2.0, 0.0)],
            &counts,
        );
        let keys: Vec<&str> = group
            .iter()
            .map(|s| s.activity.identity_key.as_str())
            .collect();
        // c is least used but not tied at the top
        assert_eq!(keys, vec!["b|"]);
    }

    #[test]
    fn test_prefer_least_used_keeps_equal_counts() {
        let a = activity("a|", None);
        let b = activity("b|", None);
        let group = prefer_least_used(
            &[scored(&a, 1.0, 0.2), scored(&b, 1.0, 0.7)],
            &UsageCounts::new(),
        );
        assert_eq!(group.len(), 2);
        assert!(prefer_least_used(&[], &UsageCounts::new()).is_empty());
    }
}
