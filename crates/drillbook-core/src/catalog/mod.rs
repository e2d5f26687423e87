//! Activity catalog: loading and normalizing the raw drill collection.
//!
//! The catalog is constructed once per session and passed by reference to
//! the selection engine. Normalization never fails on bad records: entries
//! that cannot be turned into a usable [`ActivityRecord`] are dropped and
//! described in the [`NormalizeReport`].
//!
//! ```rust
//! use drillbook_core::{catalog::ActivityCatalog, config::StageKeywordTable, models::Stage};
//!
//! let json = r#"[
//!     {"title": "Coordination ladder warm-up"},
//!     {"title": "Rondo 4 v 2", "stage": "small"},
//!     {"title": "Nothing to infer here"},
//!     "not even an object"
//! ]"#;
//! let catalog = ActivityCatalog::from_json_str(json, &StageKeywordTable::default()).unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.report().dropped.len(), 2);
//! assert_eq!(catalog.by_stage(Stage::Small)[0].format, "4vs2");
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::StageKeywordTable,
    error::{EngineError, Result},
    models::{ActivityRecord, FitnessFocus, Stage, TechnicalFocus},
    repetition::canonicalize,
};

pub mod raw;
pub mod text;

pub use raw::{RawActivity, StringOrList};

use raw::value_text;

use text::{age_tokens, canonical_phrase, detect_format, identity_key};

/// Why a raw record was left out of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum DropReason {
    /// Entry is not an object or has fields of the wrong type
    Unparseable(String),
    /// Entry has no usable title
    MissingTitle,
    /// Explicit stage field holds an unknown value
    InvalidStage(String),
    /// No explicit stage and no inference rule matched
    NoStageSignal,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Unparseable(detail) => write!(f, "unparseable record ({detail})"),
            DropReason::MissingTitle => write!(f, "missing title"),
            DropReason::InvalidStage(value) => write!(f, "invalid stage '{value}'"),
            DropReason::NoStageSignal => write!(f, "no stage could be inferred"),
        }
    }
}

/// A record that normalization dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DroppedRecord {
    /// Position in the source collection
    pub index: usize,
    pub title: Option<String>,
    pub reason: DropReason,
}

/// Summary of one normalization pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NormalizeReport {
    pub total: usize,
    pub kept: usize,
    pub dropped: Vec<DroppedRecord>,
}

/// Per-stage record counts, for catalog statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogStats {
    pub per_stage: BTreeMap<Stage, usize>,
    pub distinct_identities: usize,
    pub total: usize,
    pub dropped: usize,
}

/// Clean, queryable collection of activity records.
#[derive(Debug, Clone, Default)]
pub struct ActivityCatalog {
    records: Vec<ActivityRecord>,
    report: NormalizeReport,
}

impl ActivityCatalog {
    /// Wraps already-normalized records, recomputing their identity keys.
    pub fn from_records(mut records: Vec<ActivityRecord>) -> Self {
        for record in &mut records {
            record.identity_key = canonicalize(record);
        }
        let report = NormalizeReport {
            total: records.len(),
            kept: records.len(),
            dropped: Vec::new(),
        };
        Self { records, report }
    }

    /// Normalizes heterogeneous raw JSON entries.
    pub fn from_values(values: &[Value], table: &StageKeywordTable) -> Self {
        let (records, report) = normalize(values, table);
        Self { records, report }
    }

    /// Parses a JSON array of raw records. Only a document that is not a
    /// JSON array is an error; bad entries inside it are dropped.
    pub fn from_json_str(json: &str, table: &StageKeywordTable) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_document(document, table)
    }

    /// Reads a JSON array of raw records from any reader.
    pub fn from_reader<R: Read>(reader: R, table: &StageKeywordTable) -> Result<Self> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_document(document, table)
    }

    /// Loads a catalog file from disk.
    pub fn load<P: AsRef<Path>>(path: P, table: &StageKeywordTable) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(EngineError::file_system(path))?;
        let catalog = Self::from_reader(std::io::BufReader::new(file), table)?;
        debug!(
            "Loaded catalog {} ({} kept, {} dropped)",
            path.display(),
            catalog.report.kept,
            catalog.report.dropped.len()
        );
        Ok(catalog)
    }

    fn from_document(document: Value, table: &StageKeywordTable) -> Result<Self> {
        match document {
            Value::Array(values) => Ok(Self::from_values(&values, table)),
            _ => Err(EngineError::catalog("expected a JSON array of activity records")),
        }
    }

    /// Records intended for `stage`, in catalog order.
    pub fn by_stage(&self, stage: Stage) -> Vec<&ActivityRecord> {
        self.records
            .iter()
            .filter(|record| record.stage_affinity == stage)
            .collect()
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts records per stage and distinct identities.
    pub fn stats(&self) -> CatalogStats {
        let mut per_stage: BTreeMap<Stage, usize> =
            Stage::ALL.iter().map(|stage| (*stage, 0)).collect();
        for record in &self.records {
            *per_stage.entry(record.stage_affinity).or_insert(0) += 1;
        }
        let distinct: BTreeSet<&str> = self
            .records
            .iter()
            .map(|r| r.identity_key.as_str())
            .collect();

        CatalogStats {
            per_stage,
            distinct_identities: distinct.len(),
            total: self.report.total,
            dropped: self.report.dropped.len(),
        }
    }
}

/// Normalizes raw entries into activity records, dropping malformed ones.
pub fn normalize(
    values: &[Value],
    table: &StageKeywordTable,
) -> (Vec<ActivityRecord>, NormalizeReport) {
    let mut records = Vec::with_capacity(values.len());
    let mut report = NormalizeReport {
        total: values.len(),
        ..Default::default()
    };

    for (index, value) in values.iter().enumerate() {
        let outcome = serde_json::from_value::<RawActivity>(value.clone())
            .map_err(|e| (None, DropReason::Unparseable(e.to_string())))
            .and_then(|raw| {
                normalize_record(&raw, table).map_err(|reason| (raw.title.clone(), reason))
            });

        match outcome {
            Ok(record) => records.push(record),
            Err((title, reason)) => {
                warn!("Dropping catalog record #{index}: {reason}");
                report.dropped.push(DroppedRecord {
                    index,
                    title,
                    reason,
                });
            }
        }
    }

    report.kept = records.len();
    (records, report)
}

/// Turns one raw record into a canonical activity record.
pub fn normalize_record(
    raw: &RawActivity,
    table: &StageKeywordTable,
) -> std::result::Result<ActivityRecord, DropReason> {
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(DropReason::MissingTitle)?;

    let sections = raw.section_texts();
    let category = raw
        .category
        .iter()
        .cloned()
        .chain(raw.meta_matching(&["category", "focus", "topic"]))
        .collect::<Vec<_>>()
        .join(" ");

    let search_text = canonical_phrase(
        &std::iter::once(title.to_string())
            .chain(raw.description.iter().cloned())
            .chain(std::iter::once(category.clone()))
            .chain(sections.values().cloned())
            .chain(raw.meta.values().map(value_text))
            .chain(raw.tags.entries())
            .chain(raw.tactical_tags.entries())
            .chain(raw.technical_tags.entries())
            .chain(raw.fitness_tags.entries())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let canonical_title = canonical_phrase(title);
    let stage_affinity = match raw.stage.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => explicit
            .parse::<Stage>()
            .map_err(|_| DropReason::InvalidStage(explicit.to_string()))?,
        _ => infer_stage(
            &[
                canonical_title.as_str(),
                canonical_phrase(&category).as_str(),
                search_text.as_str(),
            ],
            table,
        )
        .ok_or(DropReason::NoStageSignal)?,
    };

    let format = raw
        .format
        .as_deref()
        .map(canonical_phrase)
        .filter(|f| !f.is_empty())
        .or_else(|| detect_format(&canonical_title))
        .or_else(|| {
            raw.meta_matching(&["format", "player"])
                .iter()
                .find_map(|value| detect_format(&canonical_phrase(value)))
        })
        .unwrap_or_default();

    let mut age_tags: BTreeSet<String> = raw
        .age
        .entries()
        .iter()
        .flat_map(|entry| age_tokens(entry))
        .collect();
    for value in raw.meta_matching(&["age"]) {
        age_tags.extend(age_tokens(&value));
    }

    let mut tactical_tags = canonical_set(raw.tactical_tags.entries());
    let mut technical_tags = canonical_set(raw.technical_tags.entries());
    let mut fitness_tags = canonical_set(raw.fitness_tags.entries());
    technical_tags.extend(canonical_set(raw.meta_matching(&["techni"])));
    fitness_tags.extend(canonical_set(
        raw.meta_matching(&["fitness", "physical", "condition", "athletic"]),
    ));
    tactical_tags.extend(canonical_set(raw.meta_matching(&["tactic"])));

    let generic = raw
        .tags
        .entries()
        .into_iter()
        .chain(raw.category.iter().cloned());
    for tag in canonical_set(generic) {
        if is_focus_term(&tag, TechnicalFocus::ALL.iter().flat_map(|f| f.keywords())) {
            technical_tags.insert(tag);
        } else if is_focus_term(&tag, FitnessFocus::ALL.iter().flat_map(|f| f.keywords())) {
            fitness_tags.insert(tag);
        } else {
            tactical_tags.insert(tag);
        }
    }

    Ok(ActivityRecord {
        identity_key: identity_key(title, &format),
        title: title.to_string(),
        format,
        stage_affinity,
        age_tags,
        tactical_tags,
        technical_tags,
        fitness_tags,
        media_reference: raw.media_reference(),
        url: raw
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from),
        sections,
        search_text,
    })
}

/// Applies the stage keyword table to each text source in order.
pub fn infer_stage(sources: &[&str], table: &StageKeywordTable) -> Option<Stage> {
    sources
        .iter()
        .filter(|source| !source.is_empty())
        .find_map(|source| {
            table.rules.iter().find_map(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| source.contains(canonical_phrase(keyword).as_str()))
                    .then_some(rule.stage)
            })
        })
        .or(table.default_stage)
}

fn canonical_set<I>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    entries
        .into_iter()
        .map(|entry| canonical_phrase(&entry))
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn is_focus_term<'a, I>(tag: &str, keywords: I) -> bool
where
    I: IntoIterator<Item = &'a &'static str>,
{
    keywords
        .into_iter()
        .any(|keyword| tag.contains(*keyword) || keyword.contains(tag))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn table() -> StageKeywordTable {
        StageKeywordTable::default()
    }

    #[test]
    fn test_explicit_stage_wins_over_heuristics() {
        let raw = RawActivity {
            title: Some("Warm-up style 11 v 11 match".to_string()),
            stage: Some("large-sided".to_string()),
            ..Default::default()
        };
        let record = normalize_record(&raw, &table()).unwrap();
        assert_eq!(record.stage_affinity, Stage::Large);
        assert_eq!(record.format, "11vs11");
    }

    #[test]
    fn test_malformed_stage_is_dropped() {
        let raw = RawActivity {
            title: Some("Rondo".to_string()),
            stage: Some("cooldown".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize_record(&raw, &table()),
            Err(DropReason::InvalidStage("cooldown".to_string()))
        );
    }

    #[test]
    fn test_empty_stage_falls_back_to_inference() {
        let raw = RawActivity {
            title: Some("Aufwärmen mit Ball".to_string()),
            stage: Some("  ".to_string()),
            ..Default::default()
        };
        let record = normalize_record(&raw, &table()).unwrap();
        assert_eq!(record.stage_affinity, Stage::Warmup);
    }

    #[test]
    fn test_title_inference_beats_description() {
        let raw = RawActivity {
            title: Some("Rondo in a square".to_string()),
            description: Some("Good preparation for the match at the weekend".to_string()),
            ..Default::default()
        };
        let record = normalize_record(&raw, &table()).unwrap();
        assert_eq!(record.stage_affinity, Stage::Small);
    }

    #[test]
    fn test_default_stage_keeps_unsignalled_records() {
        let mut table = table();
        let raw = RawActivity {
            title: Some("Passing triangle".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize_record(&raw, &table),
            Err(DropReason::NoStageSignal)
        );

        table.default_stage = Some(Stage::Warmup);
        assert_eq!(
            normalize_record(&raw, &table).unwrap().stage_affinity,
            Stage::Warmup
        );
    }

    #[test]
    fn test_tags_ages_and_media_are_normalized() {
        let value = json!({
            "title": "Game Organisation 7 v 7 (2)",
            "url": "https://example.com/drill/1",
            "image": "drill-1.png",
            "tags": ["Game organisation", "Passing", "Sprint"],
            "meta": { "Age group": "U12–U13", "Tactics": "Pressing" },
            "sections": { "Process": "Press high. Win the ball." }
        });
        let (records, report) = normalize(&[value], &table());
        assert_eq!(report.kept, 1);

        let record = &records[0];
        assert_eq!(record.stage_affinity, Stage::Large);
        assert_eq!(record.identity_key, "game organization 7vs7|7vs7");
        assert_eq!(record.media_reference.as_deref(), Some("drill-1.png"));
        assert!(record.tactical_tags.contains("game organization"));
        assert!(record.tactical_tags.contains("pressing"));
        assert!(record.technical_tags.contains("passing"));
        assert!(record.fitness_tags.contains("sprint"));
        assert_eq!(
            record.age_tags,
            ["u12", "u13"].iter().map(|s| s.to_string()).collect()
        );
        assert!(record.search_text.contains("win the ball"));
    }

    #[test]
    fn test_malformed_entries_do_not_poison_catalog() {
        let values = vec![
            json!({"title": "Rondo 4 v 2"}),
            json!(42),
            json!({"title": 7}),
            json!({"description": "no title"}),
            json!({"title": "1 vs 1 duel", "stage": "small"}),
        ];
        let catalog = ActivityCatalog::from_values(&values, &table());
        assert_eq!(catalog.len(), 2);

        let reasons: Vec<_> = catalog
            .report()
            .dropped
            .iter()
            .map(|d| (d.index, d.reason.clone()))
            .collect();
        assert_eq!(reasons.len(), 3);
        assert!(matches!(reasons[0], (1, DropReason::Unparseable(_))));
        assert!(matches!(reasons[1], (2, DropReason::Unparseable(_))));
        assert_eq!(reasons[2], (3, DropReason::MissingTitle));
    }

    #[test]
    fn test_by_stage_is_stable_and_filtered() {
        let values = vec![
            json!({"title": "A", "stage": "main"}),
            json!({"title": "B", "stage": "warmup"}),
            json!({"title": "C", "stage": "main"}),
        ];
        let catalog = ActivityCatalog::from_values(&values, &table());

        let first: Vec<&str> = catalog
            .by_stage(Stage::Main)
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        let second: Vec<&str> = catalog
            .by_stage(Stage::Main)
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(first, vec!["A", "C"]);
        assert_eq!(first, second);
        assert!(catalog.by_stage(Stage::Small).is_empty());
    }

    #[test]
    fn test_stats_count_identities() {
        let values = vec![
            json!({"title": "Rondo (1)", "stage": "small"}),
            json!({"title": "Rondo (2)", "stage": "small"}),
            json!({"title": "Match", "stage": "main"}),
        ];
        let stats = ActivityCatalog::from_values(&values, &table()).stats();
        assert_eq!(stats.per_stage[&Stage::Small], 2);
        assert_eq!(stats.per_stage[&Stage::Large], 0);
        assert_eq!(stats.distinct_identities, 2);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_non_array_document_is_rejected() {
        let err = ActivityCatalog::from_json_str(r#"{"title": "x"}"#, &table()).unwrap_err();
        assert!(matches!(err, EngineError::Catalog { .. }));
    }
}
