//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{SessionWorkload, Stage, TrainingPlan, UsageCounts};

/// Outcome of finalizing a plan: refreshed usage counters and, when a
/// session load was supplied, the recorded workload.
///
/// # Examples
///
/// ```rust
/// use drillbook_core::{display::FinalizeResult, models::UsageCounts};
///
/// let mut usage = UsageCounts::new();
/// usage.increment(["rondo 4vs2", "coordination ladder"]);
///
/// let result = FinalizeResult::new(usage);
/// let output = result.to_string();
/// assert!(output.contains("Finalized plan with 2 activities"));
/// assert!(output.contains("- rondo 4vs2: used 1 time(s)"));
/// ```
#[derive(Debug, Clone)]
pub struct FinalizeResult {
    /// New counts of the identities in the finalized plan
    pub usage: UsageCounts,
    pub workload: Option<SessionWorkload>,
}

impl FinalizeResult {
    pub fn new(usage: UsageCounts) -> Self {
        Self {
            usage,
            workload: None,
        }
    }

    /// Attach the recorded session workload.
    pub fn with_workload(mut self, workload: SessionWorkload) -> Self {
        self.workload = Some(workload);
        self
    }
}

impl fmt::Display for FinalizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Finalized plan with {} activities", self.usage.len())?;
        writeln!(f)?;
        for (key, count) in &self.usage.0 {
            writeln!(f, "- {key}: used {count} time(s)")?;
        }
        if let Some(workload) = &self.workload {
            writeln!(f)?;
            write!(f, "{workload}")?;
        }
        Ok(())
    }
}

/// A plan after one of its stages was picked again.
pub struct RerollResult {
    pub plan: TrainingPlan,
    pub stage: Stage,
    /// False when no alternative existed and the earlier pick was kept
    pub changed: bool,
}

impl RerollResult {
    pub fn new(previous: &TrainingPlan, plan: TrainingPlan, stage: Stage) -> Self {
        let changed = previous.pick(stage) != plan.pick(stage);
        Self {
            plan,
            stage,
            changed,
        }
    }
}

impl fmt::Display for RerollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed {
            writeln!(f, "Rerolled stage: {}", self.stage.label())?;
        } else {
            writeln!(
                f,
                "No alternative for stage {}, kept the current activity",
                self.stage.label()
            )?;
        }
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}
