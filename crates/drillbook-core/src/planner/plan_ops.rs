//! Plan generation operations. None of these touch the database.

use log::info;

use super::TrainingPlanner;
use crate::{
    display::RerollResult,
    models::{SelectionConstraints, Stage, StagePick, TrainingPlan},
    params::GeneratePlan,
    repetition::PlanUsage,
    selector::Selector,
};

impl TrainingPlanner {
    /// Generates a four-stage plan for the given presets.
    ///
    /// Persistent usage counters only steer the choice; they are not
    /// incremented until [`finalize_plan`](Self::finalize_plan).
    pub async fn generate_plan(&self, params: &GeneratePlan) -> TrainingPlan {
        let constraints = SelectionConstraints::from(params);
        let mut plan = self.generate_plan_with(&constraints).await;
        plan.summary = params.summary();
        plan
    }

    /// Generates a plan from explicit constraints.
    pub async fn generate_plan_with(&self, constraints: &SelectionConstraints) -> TrainingPlan {
        let counts = self.usage.read().await;
        let mut rng = self.rng.lock().await;
        let plan = Selector::new(&self.catalog, &self.scoring, &counts)
            .generate_plan(constraints, &mut *rng);
        info!(
            "Generated plan: {} stage(s) filled, {} missing",
            plan.included_stages().len(),
            plan.missing_stages().len()
        );
        plan
    }

    /// Picks a single stage, skipping identities already in `plan_usage`.
    pub async fn pick_activity_for_stage(
        &self,
        stage: Stage,
        constraints: &SelectionConstraints,
        plan_usage: &PlanUsage,
    ) -> StagePick {
        let counts = self.usage.read().await;
        let mut rng = self.rng.lock().await;
        Selector::new(&self.catalog, &self.scoring, &counts).pick_activity_for_stage(
            stage,
            constraints,
            plan_usage,
            &mut *rng,
        )
    }

    /// Replaces one stage of a generated plan with a different activity.
    pub async fn reroll_stage(&self, plan: &TrainingPlan, stage: Stage) -> RerollResult {
        let rerolled = {
            let counts = self.usage.read().await;
            let mut rng = self.rng.lock().await;
            Selector::new(&self.catalog, &self.scoring, &counts)
                .reroll_stage(plan, stage, &mut *rng)
        };
        let result = RerollResult::new(plan, rerolled, stage);
        info!(
            "Rerolled stage {} ({})",
            stage.as_str(),
            if result.changed { "changed" } else { "kept" }
        );
        result
    }
}
