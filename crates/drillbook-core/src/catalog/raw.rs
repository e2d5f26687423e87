//! Loosely typed source records as they arrive from a scraped catalog.
//!
//! Every field is optional and tolerant of the shapes seen in the wild
//! (strings or lists of strings, `null` section bodies, numeric metadata).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value that may be given either as a single string or as a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StringOrList {
    /// Explicit `null`
    #[default]
    Nothing,
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    /// Flattens the value into a list of trimmed, non-empty entries.
    /// Single strings are split on commas and semicolons.
    pub fn entries(&self) -> Vec<String> {
        let items: Vec<&str> = match self {
            StringOrList::Nothing => Vec::new(),
            StringOrList::One(value) => value.split([',', ';']).collect(),
            StringOrList::Many(values) => values.iter().map(String::as_str).collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// One raw catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawActivity {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Explicit stage field; inferred from keywords when absent
    #[serde(alias = "phase")]
    pub stage: Option<String>,
    pub category: Option<String>,
    /// Explicit player format such as `4 vs 4`
    pub format: Option<String>,
    #[serde(alias = "age_group", alias = "age_groups")]
    pub age: StringOrList,
    pub tags: StringOrList,
    pub tactical_tags: StringOrList,
    pub technical_tags: StringOrList,
    pub fitness_tags: StringOrList,
    pub image_url: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub sections: BTreeMap<String, Value>,
    pub meta: BTreeMap<String, Value>,
}

/// Renders a JSON value as plain text; `null` and structures become empty.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => String::new(),
    }
}

impl RawActivity {
    /// Resolves the media reference: `image_url`, then `image`, then the
    /// first entry of `images`.
    pub fn media_reference(&self) -> Option<String> {
        [self.image_url.as_deref(), self.image.as_deref()]
            .into_iter()
            .flatten()
            .chain(self.images.iter().flatten().map(String::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from)
    }

    /// Metadata values whose key contains any of the given fragments.
    pub(crate) fn meta_matching(&self, fragments: &[&str]) -> Vec<String> {
        self.meta
            .iter()
            .filter(|(key, _)| {
                let key = key.to_lowercase();
                fragments.iter().any(|f| key.contains(f))
            })
            .map(|(_, value)| value_text(value))
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    /// Section bodies keyed by heading, skipping empty ones.
    pub(crate) fn section_texts(&self) -> BTreeMap<String, String> {
        self.sections
            .iter()
            .map(|(heading, body)| (heading.clone(), value_text(body).trim().to_string()))
            .filter(|(_, body)| !body.is_empty())
            .collect()
    }
}
