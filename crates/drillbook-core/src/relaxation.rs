//! Progressive constraint relaxation.
//!
//! Constraints are applied as hard pre-filters, strictest level first. The
//! first level whose candidate set (minus identities already in the plan) is
//! non-empty hands its candidates to the scoring engine. Scoring always uses
//! the caller's original constraints; relaxation only decides who competes.
//!
//! | level | filters kept                         |
//! |-------|--------------------------------------|
//! | 0     | age, tactical, technical, fitness    |
//! | 1     | age, tactical, technical             |
//! | 2     | age, tactical                        |
//! | 3     | age                                  |
//! | 4     | none (stage affinity only)           |
//!
//! The main stage first runs levels 0 to 3 restricted to match-like games
//! and only falls through to the general levels when that yields nothing.

use log::{debug, warn};
use rand::Rng;

use crate::{
    models::{
        ActivityRecord, RelaxationLevel, Selection, SelectionConstraints, Stage, StagePick,
        UsageCounts,
    },
    repetition::{exclude_used, prefer_least_used, PlanUsage},
    scoring::{KeywordMatcher, ScoringEngine, TextMatcher},
};

impl SelectionConstraints {
    /// Weaker copy of the constraints for a relaxation level.
    pub fn relaxed(&self, level: RelaxationLevel) -> SelectionConstraints {
        let mut relaxed = self.clone();
        if level >= RelaxationLevel::WithoutFitness {
            relaxed.fitness.clear();
        }
        if level >= RelaxationLevel::WithoutTechnical {
            relaxed.technical.clear();
        }
        if level >= RelaxationLevel::AgeOnly {
            relaxed.tactical.clear();
        }
        if level >= RelaxationLevel::StageOnly {
            relaxed.age_tokens.clear();
        }
        relaxed
    }
}

/// Candidates that passed a relaxation level.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    pub level: RelaxationLevel,
    pub records: Vec<&'a ActivityRecord>,
    /// True when the main-stage match preference narrowed the set
    pub match_preferred: bool,
}

/// Relaxation levels wrapped around a scoring engine.
#[derive(Debug, Clone, Copy)]
pub struct RelaxationPipeline<'e, M = TextMatcher> {
    engine: &'e ScoringEngine<M>,
}

impl<'e, M: KeywordMatcher> RelaxationPipeline<'e, M> {
    pub fn new(engine: &'e ScoringEngine<M>) -> Self {
        Self { engine }
    }

    /// Whether an activity passes the hard filters of `constraints`. An
    /// empty keyword set filters nothing; a non-empty one needs one match.
    pub fn admits(&self, activity: &ActivityRecord, constraints: &SelectionConstraints) -> bool {
        let matcher = self.engine.matcher();
        let passes = |keywords: &[String]| {
            keywords.is_empty() || matcher.matches_any(activity, keywords)
        };

        activity.suits_age(&constraints.age_tokens)
            && passes(&constraints.tactical)
            && passes(&constraints.technical)
            && passes(&constraints.fitness)
    }

    /// Records of `pool` admitted at `level`, ignoring plan usage.
    pub fn candidates_at<'a>(
        &self,
        pool: &[&'a ActivityRecord],
        constraints: &SelectionConstraints,
        level: RelaxationLevel,
    ) -> Vec<&'a ActivityRecord> {
        let relaxed = constraints.relaxed(level);
        pool.iter()
            .copied()
            .filter(|activity| self.admits(activity, &relaxed))
            .collect()
    }

    /// Walks the levels and returns the first non-empty candidate set.
    ///
    /// `pool` must already be restricted to the stage; identities in
    /// `usage` are excluded before any level is tried.
    pub fn candidates<'a>(
        &self,
        pool: &[&'a ActivityRecord],
        stage: Stage,
        constraints: &SelectionConstraints,
        usage: &PlanUsage,
    ) -> Option<Candidates<'a>> {
        let available = exclude_used(pool, &usage.identity_keys);

        if stage == Stage::Main {
            if let Some(found) = self.match_game_candidates(&available, constraints) {
                return Some(found);
            }
        }

        for level in RelaxationLevel::ALL {
            let records = self.candidates_at(&available, constraints, level);
            if records.is_empty() {
                debug!(
                    "No {} candidates at level {} ({})",
                    stage.as_str(),
                    level.index(),
                    level.as_str()
                );
                continue;
            }

            if stage == Stage::Main && !constraints.match_sizes.is_empty() {
                let sized: Vec<&ActivityRecord> = records
                    .iter()
                    .copied()
                    .filter(|r| {
                        self.engine
                            .matcher()
                            .matches_any(r, &constraints.match_sizes)
                    })
                    .collect();
                if !sized.is_empty() {
                    return Some(Candidates {
                        level,
                        records: sized,
                        match_preferred: true,
                    });
                }
            }

            return Some(Candidates {
                level,
                records,
                match_preferred: false,
            });
        }

        None
    }

    /// Main-stage preference: levels 0 to 3 restricted to match-like games.
    fn match_game_candidates<'a>(
        &self,
        available: &[&'a ActivityRecord],
        constraints: &SelectionConstraints,
    ) -> Option<Candidates<'a>> {
        let games: Vec<&ActivityRecord> = available
            .iter()
            .copied()
            .filter(|r| self.engine.is_game_like(r))
            .collect();
        if games.is_empty() {
            return None;
        }

        RelaxationLevel::ALL
            .into_iter()
            .take_while(|level| *level < RelaxationLevel::StageOnly)
            .find_map(|level| {
                let records = self.candidates_at(&games, constraints, level);
                (!records.is_empty()).then_some(Candidates {
                    level,
                    records,
                    match_preferred: true,
                })
            })
    }

    /// Picks the best candidate for a stage, or reports that none exists.
    pub fn select<R: Rng + ?Sized>(
        &self,
        pool: &[&ActivityRecord],
        stage: Stage,
        constraints: &SelectionConstraints,
        usage: &PlanUsage,
        counts: &UsageCounts,
        rng: &mut R,
    ) -> StagePick {
        let Some(found) = self.candidates(pool, stage, constraints, usage) else {
            warn!("No activity available for stage {}", stage.as_str());
            return StagePick::NotFound { stage };
        };

        let scored = self
            .engine
            .rank(&found.records, stage, constraints, &usage.media, rng);
        let winner = prefer_least_used(&scored, counts)
            .into_iter()
            .max_by(|a, b| a.score.total().total_cmp(&b.score.total()));

        // A non-positive best score falls back to the first remaining candidate
        let chosen = match winner {
            Some(best) if best.score.total() > 0.0 => Some((best, false)),
            _ => scored.first().copied().map(|first| (first, true)),
        };
        let Some((chosen, fallback)) = chosen else {
            return StagePick::NotFound { stage };
        };

        let selection = Selection {
            stage,
            activity: chosen.activity.clone(),
            level: found.level,
            score: chosen.score.total(),
            match_preferred: found.match_preferred,
            fallback,
        };

        debug!(
            "Picked '{}' for stage {} at level {} (score {:.2}{})",
            selection.activity.title,
            stage.as_str(),
            selection.level.index(),
            selection.score,
            if selection.fallback { ", fallback" } else { "" }
        );
        StagePick::Found(selection)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        config::ScoringConfig,
        models::{AgeBracket, TacticalGoal},
    };

    fn activity(title: &str, stage: Stage, ages: &[&str], tactical: &[&str]) -> ActivityRecord {
        ActivityRecord {
            identity_key: format!("{}|", title.to_lowercase()),
            title: title.to_string(),
            format: String::new(),
            stage_affinity: stage,
            age_tags: ages.iter().map(|a| (*a).to_string()).collect(),
            tactical_tags: tactical.iter().map(|t| (*t).to_string()).collect(),
            technical_tags: BTreeSet::new(),
            fitness_tags: BTreeSet::new(),
            media_reference: None,
            url: None,
            sections: BTreeMap::new(),
            search_text: title.to_lowercase(),
        }
    }

    fn strict_constraints() -> SelectionConstraints {
        SelectionConstraints {
            age_tokens: BTreeSet::from(["u12".to_string()]),
            tactical: vec!["pressing".to_string()],
            technical: vec!["passing".to_string()],
            fitness: vec!["sprint".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_relaxed_drops_filters_in_order() {
        let original = strict_constraints();
        let level1 = original.relaxed(RelaxationLevel::WithoutFitness);
        assert!(level1.fitness.is_empty());
        assert!(!level1.technical.is_empty());

        let level3 = original.relaxed(RelaxationLevel::AgeOnly);
        assert!(level3.tactical.is_empty());
        assert!(!level3.age_tokens.is_empty());

        let level4 = original.relaxed(RelaxationLevel::StageOnly);
        assert!(level4.age_tokens.is_empty());

        // The original is never mutated
        assert_eq!(original, strict_constraints());
    }

    #[test]
    fn test_levels_widen_monotonically() {
        let engine: ScoringEngine = ScoringEngine::default();
        let pipeline = RelaxationPipeline::new(&engine);
        let records = [
            activity("pressing passing sprint", Stage::Small, &["u12"], &[]),
            activity("pressing passing", Stage::Small, &["u12"], &[]),
            activity("pressing", Stage::Small, &[], &[]),
            activity("rondo", Stage::Small, &["u12"], &[]),
            activity("rondo for seniors", Stage::Small, &["adult"], &["pressing"]),
        ];
        let pool: Vec<&ActivityRecord> = records.iter().collect();
        let constraints = strict_constraints();

        let mut previous: Option<BTreeSet<String>> = None;
        let mut sizes = Vec::new();
        for level in RelaxationLevel::ALL {
            let keys: BTreeSet<String> = pipeline
                .candidates_at(&pool, &constraints, level)
                .iter()
                .map(|r| r.identity_key.clone())
                .collect();
            if let Some(previous) = &previous {
                assert!(keys.is_superset(previous), "level {}", level.index());
            }
            sizes.push(keys.len());
            previous = Some(keys);
        }
        assert_eq!(sizes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_select_skips_plan_local_identities() {
        let engine: ScoringEngine = ScoringEngine::default();
        let pipeline = RelaxationPipeline::new(&engine);
        let first = activity("rondo", Stage::Small, &[], &[]);
        let second = activity("duel", Stage::Small, &[], &[]);
        let pool = [&first, &second];

        let mut usage = PlanUsage::new();
        usage.record(&first);
        let mut rng = StdRng::seed_from_u64(5);

        let pick = pipeline.select(
            &pool,
            Stage::Small,
            &SelectionConstraints::default(),
            &usage,
            &UsageCounts::new(),
            &mut rng,
        );
        assert_eq!(pick.selection().unwrap().activity.title, "duel");

        usage.record(&second);
        let pick = pipeline.select(
            &pool,
            Stage::Small,
            &SelectionConstraints::default(),
            &usage,
            &UsageCounts::new(),
            &mut rng,
        );
        assert_eq!(pick, StagePick::NotFound { stage: Stage::Small });
    }

    #[test]
    fn test_non_positive_scores_fall_back_to_first_candidate() {
        let engine = ScoringEngine::new(ScoringConfig {
            jitter: 0.0,
            ..Default::default()
        });
        let pipeline = RelaxationPipeline::new(&engine);
        let first = activity("passing drill", Stage::Main, &[], &[]);
        let second = activity("shooting circuit", Stage::Main, &[], &[]);
        let mut rng = StdRng::seed_from_u64(11);

        let pick = pipeline.select(
            &[&first, &second],
            Stage::Main,
            &SelectionConstraints::default(),
            &PlanUsage::new(),
            &UsageCounts::new(),
            &mut rng,
        );
        let selection = pick.selection().unwrap();
        assert!(selection.fallback);
        assert_eq!(selection.activity.title, "passing drill");
        assert_eq!(selection.level, RelaxationLevel::Strict);
    }

    #[test]
    fn test_least_used_wins_a_tie() {
        let engine: ScoringEngine = ScoringEngine::default();
        let pipeline = RelaxationPipeline::new(&engine);
        let worn = activity("rondo square", Stage::Small, &[], &[]);
        let fresh = activity("rondo circle", Stage::Small, &[], &[]);
        let mut counts = UsageCounts::new();
        counts.increment(["rondo square|", "rondo square|"]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pick = pipeline.select(
                &[&worn, &fresh],
                Stage::Small,
                &SelectionConstraints {
                    tactical: vec!["rondo".to_string()],
                    ..Default::default()
                },
                &PlanUsage::new(),
                &counts,
                &mut rng,
            );
            assert_eq!(pick.selection().unwrap().activity.title, "rondo circle");
        }
    }

    #[test]
    fn test_main_prefers_match_games_before_relaxing() {
        let engine: ScoringEngine = ScoringEngine::default();
        let pipeline = RelaxationPipeline::new(&engine);
        let drill = activity("pressing drill", Stage::Main, &["u12"], &[]);
        let game = activity("11vs11 match", Stage::Main, &["u12"], &[]);
        let constraints = SelectionConstraints::for_age(AgeBracket::U12ToU13)
            .with_tactical(TacticalGoal::Pressing);

        let found = pipeline
            .candidates(&[&drill, &game], Stage::Main, &constraints, &PlanUsage::new())
            .unwrap();
        // The drill passes level 0 but the game sub-pipeline runs first
        assert!(found.match_preferred);
        assert_eq!(found.level, RelaxationLevel::AgeOnly);
        assert_eq!(found.records.len(), 1);
        assert_eq!(found.records[0].title, "11vs11 match");
    }

    #[test]
    fn test_main_falls_back_to_other_ages_at_stage_only() {
        let engine: ScoringEngine = ScoringEngine::default();
        let pipeline = RelaxationPipeline::new(&engine);
        let adult_match = activity("11vs11 match", Stage::Main, &["adult"], &[]);
        let constraints = SelectionConstraints::for_age(AgeBracket::U10ToU11);
        let mut rng = StdRng::seed_from_u64(2);

        let pick = pipeline.select(
            &[&adult_match],
            Stage::Main,
            &constraints,
            &PlanUsage::new(),
            &UsageCounts::new(),
            &mut rng,
        );
        let selection = pick.selection().unwrap();
        assert_eq!(selection.level, RelaxationLevel::StageOnly);
        assert_eq!(selection.activity.title, "11vs11 match");
    }
}
