//! Activity (drill) model definitions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::Stage;

/// One reusable training drill after catalog normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    /// Canonical signature shared by near-duplicate variants of a drill
    pub identity_key: String,

    /// Original title as found in the source record
    pub title: String,

    /// Player format such as `4vs4`; empty when none could be determined
    pub format: String,

    /// Stage this record is intended for
    pub stage_affinity: Stage,

    /// Canonical age tokens (`u12`, `adult`, ...); empty means unconstrained
    #[serde(default)]
    pub age_tags: BTreeSet<String>,

    #[serde(default)]
    pub tactical_tags: BTreeSet<String>,

    #[serde(default)]
    pub technical_tags: BTreeSet<String>,

    #[serde(default)]
    pub fitness_tags: BTreeSet<String>,

    /// Image or file identifier, only used to avoid visual repetition
    pub media_reference: Option<String>,

    /// Source link of the drill, if any
    pub url: Option<String>,

    /// Free-text sections keyed by heading (Organisation, Process, Tip, ...)
    #[serde(default)]
    pub sections: BTreeMap<String, String>,

    /// Lower-cased, spelling-normalized text used for keyword matching
    #[serde(default)]
    pub search_text: String,
}

impl ActivityRecord {
    /// Returns a section by heading, ignoring case.
    pub fn section(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(heading))
            .map(|(_, value)| value.as_str())
    }

    /// The organisation section, accepting both British and American
    /// spellings.
    pub fn organisation(&self) -> Option<&str> {
        self.section("Organisation")
            .or_else(|| self.section("Organization"))
    }

    /// Splits the "Process" section into sentence-level coaching points.
    pub fn coaching_points(&self) -> Vec<String> {
        self.section("Process")
            .map(|process| {
                process
                    .replace('\n', " ")
                    .split('.')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterates every tag of the record regardless of category.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.tactical_tags
            .iter()
            .chain(&self.technical_tags)
            .chain(&self.fitness_tags)
            .map(String::as_str)
    }

    /// Whether the record suits any of the requested age tokens.
    ///
    /// An empty request or an untagged record both count as a match.
    pub fn suits_age(&self, age_tokens: &BTreeSet<String>) -> bool {
        age_tokens.is_empty()
            || self.age_tags.is_empty()
            || self.age_tags.iter().any(|tag| age_tokens.contains(tag))
    }
}
