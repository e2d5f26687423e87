//! Keyword matching capability used by scoring and relaxation.

use crate::{catalog::text::canonical_phrase, models::ActivityRecord};

/// Decides whether an activity mentions a keyword.
///
/// Scoring weights and relaxation filters only ever ask this question, so a
/// structured tagging scheme can replace free-text search by providing a
/// different implementation.
pub trait KeywordMatcher {
    fn matches(&self, activity: &ActivityRecord, keyword: &str) -> bool;

    /// Number of keywords that match.
    fn count_matches<S: AsRef<str>>(&self, activity: &ActivityRecord, keywords: &[S]) -> usize {
        keywords
            .iter()
            .filter(|keyword| self.matches(activity, keyword.as_ref()))
            .count()
    }

    fn matches_any<S: AsRef<str>>(&self, activity: &ActivityRecord, keywords: &[S]) -> bool {
        keywords
            .iter()
            .any(|keyword| self.matches(activity, keyword.as_ref()))
    }
}

/// Substring search over the normalized text and tags of an activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMatcher;

impl KeywordMatcher for TextMatcher {
    fn matches(&self, activity: &ActivityRecord, keyword: &str) -> bool {
        let keyword = canonical_phrase(keyword);
        if keyword.is_empty() {
            return false;
        }
        activity.search_text.contains(&keyword)
            || activity.all_tags().any(|tag| tag.contains(&keyword))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::models::Stage;

    fn activity(search_text: &str, tag: &str) -> ActivityRecord {
        ActivityRecord {
            identity_key: "x|".to_string(),
            title: "x".to_string(),
            format: String::new(),
            stage_affinity: Stage::Small,
            age_tags: BTreeSet::new(),
            tactical_tags: BTreeSet::from([tag.to_string()]),
            technical_tags: BTreeSet::new(),
            fitness_tags: BTreeSet::new(),
            media_reference: None,
            url: None,
            sections: BTreeMap::new(),
            search_text: search_text.to_string(),
        }
    }

    #[test]
    fn test_keyword_spelling_is_normalized() {
        let record = activity("rondo 4vs2 with counter-press", "");
        assert!(TextMatcher.matches(&record, "4 v 2"));
        assert!(TextMatcher.matches(&record, "Counter Press"));
        assert!(!TextMatcher.matches(&record, "finishing"));
        assert!(!TextMatcher.matches(&record, "  "));
    }

    #[test]
    fn test_tags_are_searched() {
        let record = activity("", "game organization");
        assert!(TextMatcher.matches(&record, "Game Organisation"));
        assert_eq!(
            TextMatcher.count_matches(&record, &["organization", "pressing", "game"]),
            2
        );
    }
}
