//! Scoring of one activity for one stage under one set of constraints.
//!
//! A score is made of four parts:
//!
//! 1. keyword weights: every tactical, technical and fitness keyword of the
//!    constraints found in the activity adds its category weight
//! 2. the stage shape bonus or penalty (see [`rules`])
//! 3. the media repetition penalty, vetoing an image already shown earlier
//!    in the same plan
//! 4. a uniform jitter in `[0, bound)` drawn from the injected random source
//!
//! Candidates are compared on the total. The jitter is intentional variety
//! between repeated generations with identical inputs.

use std::collections::BTreeSet;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::ScoringConfig,
    models::{ActivityRecord, SelectionConstraints, Stage},
};

pub mod matcher;
pub mod rules;

pub use matcher::{KeywordMatcher, TextMatcher};

/// Score of one candidate, split by origin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub keywords: f64,
    pub shape: f64,
    /// Zero or the negated media repeat penalty
    pub repetition: f64,
    pub jitter: f64,
}

impl Score {
    /// Deterministic part of the score.
    pub fn base(&self) -> f64 {
        self.keywords + self.shape + self.repetition
    }

    pub fn total(&self) -> f64 {
        self.base() + self.jitter
    }
}

/// A candidate together with its score.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub activity: &'a ActivityRecord,
    pub score: Score,
}

/// Weighted keyword and shape scoring.
#[derive(Debug, Clone)]
pub struct ScoringEngine<M = TextMatcher> {
    config: ScoringConfig,
    matcher: M,
}

impl ScoringEngine<TextMatcher> {
    /// Creates an engine using free-text keyword matching.
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_matcher(config, TextMatcher)
    }
}

impl Default for ScoringEngine<TextMatcher> {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl<M: KeywordMatcher> ScoringEngine<M> {
    pub fn with_matcher(config: ScoringConfig, matcher: M) -> Self {
        Self { config, matcher }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Keyword part of the score.
    pub fn keyword_score(
        &self,
        activity: &ActivityRecord,
        constraints: &SelectionConstraints,
    ) -> f64 {
        let matches = |keywords: &[String]| self.matcher.count_matches(activity, keywords) as f64;

        self.config.tactical_weight * matches(&constraints.tactical)
            + self.config.technical_weight * matches(&constraints.technical)
            + self.config.fitness_weight * matches(&constraints.fitness)
    }

    /// Stage shape part of the score.
    pub fn shape_score(
        &self,
        activity: &ActivityRecord,
        stage: Stage,
        constraints: &SelectionConstraints,
    ) -> f64 {
        rules::shape_score(&self.matcher, &self.config, activity, stage, constraints)
    }

    /// Negative penalty when the activity's media was already used in the plan.
    pub fn repetition_penalty(
        &self,
        activity: &ActivityRecord,
        used_media: &BTreeSet<String>,
    ) -> f64 {
        match &activity.media_reference {
            Some(media) if used_media.contains(media) => -self.config.media_repeat_penalty,
            _ => 0.0,
        }
    }

    /// Whether the activity looks like a genuine match-format game.
    pub fn is_game_like(&self, activity: &ActivityRecord) -> bool {
        self.matcher.matches_any(activity, rules::GAME_LIKE)
    }

    /// Scores one activity.
    pub fn score<R: Rng + ?Sized>(
        &self,
        activity: &ActivityRecord,
        stage: Stage,
        constraints: &SelectionConstraints,
        used_media: &BTreeSet<String>,
        rng: &mut R,
    ) -> Score {
        let jitter = if self.config.jitter > 0.0 {
            rng.gen_range(0.0..self.config.jitter)
        } else {
            0.0
        };

        Score {
            keywords: self.keyword_score(activity, constraints),
            shape: self.shape_score(activity, stage, constraints),
            repetition: self.repetition_penalty(activity, used_media),
            jitter,
        }
    }

    /// Scores every candidate, keeping the input order.
    pub fn rank<'a, R: Rng + ?Sized>(
        &self,
        candidates: &[&'a ActivityRecord],
        stage: Stage,
        constraints: &SelectionConstraints,
        used_media: &BTreeSet<String>,
        rng: &mut R,
    ) -> Vec<Scored<'a>> {
        let scored: Vec<Scored<'a>> = candidates
            .iter()
            .map(|&activity| Scored {
                activity,
                score: self.score(activity, stage, constraints, used_media, rng),
            })
            .collect();

        debug!(
            "Scored {} candidates for stage {}",
            scored.len(),
            stage.as_str()
        );
        scored
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn activity(title: &str, media: Option<&str>) -> ActivityRecord {
        ActivityRecord {
            identity_key: format!("{title}|"),
            title: title.to_string(),
            format: String::new(),
            stage_affinity: Stage::Large,
            age_tags: BTreeSet::new(),
            tactical_tags: BTreeSet::from(["pressing".to_string()]),
            technical_tags: BTreeSet::from(["passing".to_string()]),
            fitness_tags: BTreeSet::new(),
            media_reference: media.map(String::from),
            url: None,
            sections: BTreeMap::new(),
            search_text: title.to_string(),
        }
    }

    fn constraints() -> SelectionConstraints {
        SelectionConstraints {
            tactical: vec!["pressing".to_string(), "counter-press".to_string()],
            technical: vec!["passing".to_string()],
            fitness: vec!["sprint".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_keyword_weights() {
        let engine: ScoringEngine = ScoringEngine::default();
        let record = activity("pressing with sprint finish", None);
        // pressing +3, passing +2, sprint +2
        assert_eq!(engine.keyword_score(&record, &constraints()), 7.0);
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let engine: ScoringEngine = ScoringEngine::default();
        let record = activity("positional play", None);
        let used = BTreeSet::new();

        let mut first = StdRng::seed_from_u64(7);
        let mut second = StdRng::seed_from_u64(7);
        let a = engine.score(&record, Stage::Large, &constraints(), &used, &mut first);
        let b = engine.score(&record, Stage::Large, &constraints(), &used, &mut second);

        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a.jitter));
    }

    #[test]
    fn test_zero_jitter_disables_randomness() {
        let engine = ScoringEngine::new(ScoringConfig {
            jitter: 0.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        let score = engine.score(
            &activity("positional play", None),
            Stage::Large,
            &constraints(),
            &BTreeSet::new(),
            &mut rng,
        );
        assert_eq!(score.jitter, 0.0);
        assert_eq!(score.total(), score.base());
    }

    #[test]
    fn test_media_repeat_vetoes_candidate() {
        let engine: ScoringEngine = ScoringEngine::default();
        let mut rng = StdRng::seed_from_u64(3);
        let used = BTreeSet::from(["pitch.png".to_string()]);

        let repeated = engine.score(
            &activity("pressing 7vs7 possession build-up", Some("pitch.png")),
            Stage::Large,
            &constraints(),
            &used,
            &mut rng,
        );
        let fresh = engine.score(
            &activity("circuit", Some("other.png")),
            Stage::Large,
            &constraints(),
            &used,
            &mut rng,
        );

        assert_eq!(repeated.repetition, -1000.0);
        assert!(repeated.total() < fresh.total());
    }

    #[test]
    fn test_rank_keeps_candidate_order() {
        let engine: ScoringEngine = ScoringEngine::default();
        let a = activity("a", None);
        let b = activity("b", None);
        let mut rng = StdRng::seed_from_u64(9);

        let ranked = engine.rank(
            &[&a, &b],
            Stage::Small,
            &constraints(),
            &BTreeSet::new(),
            &mut rng,
        );
        let titles: Vec<&str> = ranked.iter().map(|s| s.activity.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
