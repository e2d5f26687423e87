//! Stage-by-stage plan generation over a loaded catalog.
//!
//! Stages are processed in fixed order and every pick is recorded in the
//! plan-local usage before the next stage runs, so later stages never repeat
//! an identity chosen earlier in the same call.

use jiff::Timestamp;
use log::debug;
use rand::Rng;

use crate::{
    catalog::ActivityCatalog,
    models::{SelectionConstraints, SessionSummary, Stage, StagePick, TrainingPlan, UsageCounts},
    relaxation::RelaxationPipeline,
    repetition::PlanUsage,
    scoring::{KeywordMatcher, ScoringEngine, TextMatcher},
};

/// Pure selection over a catalog and a snapshot of persistent usage counts.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a, M = TextMatcher> {
    catalog: &'a ActivityCatalog,
    scoring: &'a ScoringEngine<M>,
    counts: &'a UsageCounts,
}

impl<'a, M: KeywordMatcher> Selector<'a, M> {
    pub fn new(
        catalog: &'a ActivityCatalog,
        scoring: &'a ScoringEngine<M>,
        counts: &'a UsageCounts,
    ) -> Self {
        Self {
            catalog,
            scoring,
            counts,
        }
    }

    /// Picks one activity for `stage`, skipping everything in `plan_usage`.
    pub fn pick_activity_for_stage<R: Rng + ?Sized>(
        &self,
        stage: Stage,
        constraints: &SelectionConstraints,
        plan_usage: &PlanUsage,
        rng: &mut R,
    ) -> StagePick {
        let pool = self.catalog.by_stage(stage);
        RelaxationPipeline::new(self.scoring).select(
            &pool,
            stage,
            constraints,
            plan_usage,
            self.counts,
            rng,
        )
    }

    /// Generates a full four-stage plan.
    pub fn generate_plan<R: Rng + ?Sized>(
        &self,
        constraints: &SelectionConstraints,
        rng: &mut R,
    ) -> TrainingPlan {
        let mut usage = PlanUsage::new();
        let mut stages = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            let pick = self.pick_activity_for_stage(stage, constraints, &usage, rng);
            if let Some(selection) = pick.selection() {
                usage.record(&selection.activity);
            }
            stages.push(pick);
        }

        debug!(
            "Generated plan with {} of {} stages filled",
            usage.identity_keys.len(),
            Stage::ALL.len()
        );

        TrainingPlan {
            constraints: constraints.clone(),
            stages,
            generated_at: Timestamp::now(),
            summary: SessionSummary::default(),
        }
    }

    /// Re-picks one stage of an existing plan.
    ///
    /// Every identity of the other stages and the current pick itself are
    /// excluded. When no alternative exists the current pick is kept.
    /// Persistent counters are never touched.
    pub fn reroll_stage<R: Rng + ?Sized>(
        &self,
        plan: &TrainingPlan,
        stage: Stage,
        rng: &mut R,
    ) -> TrainingPlan {
        let mut usage =
            PlanUsage::from_selections(plan.chosen().filter(|selection| selection.stage != stage));
        let current = plan.pick(stage).cloned();
        if let Some(selection) = current.as_ref().and_then(StagePick::selection) {
            usage.identity_keys.insert(selection.activity.identity_key.clone());
        }

        let pick = match self.pick_activity_for_stage(stage, &plan.constraints, &usage, rng) {
            StagePick::NotFound { .. } if current.as_ref().is_some_and(StagePick::is_found) => {
                debug!("No alternative for stage {}, keeping current pick", stage.as_str());
                current.unwrap_or(StagePick::NotFound { stage })
            }
            pick => pick,
        };

        let mut rerolled = plan.clone();
        match rerolled.stages.iter_mut().find(|p| p.stage() == stage) {
            Some(slot) => *slot = pick,
            None => {
                rerolled.stages.push(pick);
                rerolled.stages.sort_by_key(StagePick::stage);
            }
        }
        rerolled
    }
}
