//! Selection outcomes and generated plans.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ActivityRecord, SelectionConstraints, Stage};

/// One step of the progressively weaker constraint sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RelaxationLevel {
    /// Age, tactical, technical and fitness constraints all applied
    Strict,
    /// Fitness constraint dropped
    WithoutFitness,
    /// Technical constraint dropped as well
    WithoutTechnical,
    /// Only the age constraint kept
    AgeOnly,
    /// Stage affinity only
    StageOnly,
}

impl RelaxationLevel {
    /// Every level, strictest first.
    pub const ALL: [RelaxationLevel; 5] = [
        RelaxationLevel::Strict,
        RelaxationLevel::WithoutFitness,
        RelaxationLevel::WithoutTechnical,
        RelaxationLevel::AgeOnly,
        RelaxationLevel::StageOnly,
    ];

    /// Numeric level, 0 for strict up to 4 for the final fallback.
    pub fn index(&self) -> usize {
        match self {
            RelaxationLevel::Strict => 0,
            RelaxationLevel::WithoutFitness => 1,
            RelaxationLevel::WithoutTechnical => 2,
            RelaxationLevel::AgeOnly => 3,
            RelaxationLevel::StageOnly => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelaxationLevel::Strict => "strict",
            RelaxationLevel::WithoutFitness => "without-fitness",
            RelaxationLevel::WithoutTechnical => "without-technical",
            RelaxationLevel::AgeOnly => "age-only",
            RelaxationLevel::StageOnly => "stage-only",
        }
    }
}

/// A chosen activity together with how it was found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    pub stage: Stage,
    pub activity: ActivityRecord,
    /// Level at which the candidate set first became non-empty
    pub level: RelaxationLevel,
    /// Final score including jitter
    pub score: f64,
    /// True when the main-phase match-game preference narrowed the pool
    #[serde(default)]
    pub match_preferred: bool,
    /// True when every score was non-positive and the first remaining
    /// candidate was taken instead
    #[serde(default)]
    pub fallback: bool,
}

/// Result of picking an activity for one stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum StagePick {
    Found(Selection),
    /// No record with this stage affinity remained after full relaxation
    NotFound { stage: Stage },
}

impl StagePick {
    pub fn stage(&self) -> Stage {
        match self {
            StagePick::Found(selection) => selection.stage,
            StagePick::NotFound { stage } => *stage,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            StagePick::Found(selection) => Some(selection),
            StagePick::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, StagePick::Found(_))
    }
}

/// Headcount and session length the coach planned for. Shown in the plan
/// summary only; selection does not read them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSummary {
    /// Free text such as `14` or `7-9`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.players.is_none() && self.duration_minutes.is_none()
    }
}

/// A generated (not yet finalized) session plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingPlan {
    pub constraints: SelectionConstraints,
    /// One entry per stage, in session order
    pub stages: Vec<StagePick>,
    pub generated_at: Timestamp,
    #[serde(default, skip_serializing_if = "SessionSummary::is_empty")]
    pub summary: SessionSummary,
}

impl TrainingPlan {
    /// Chosen activities in stage order.
    pub fn chosen(&self) -> impl Iterator<Item = &Selection> {
        self.stages.iter().filter_map(StagePick::selection)
    }

    /// Stages that received an activity.
    pub fn included_stages(&self) -> Vec<Stage> {
        self.chosen().map(|s| s.stage).collect()
    }

    /// Stages for which nothing could be found.
    pub fn missing_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|pick| !pick.is_found())
            .map(StagePick::stage)
            .collect()
    }

    pub fn pick(&self, stage: Stage) -> Option<&StagePick> {
        self.stages.iter().find(|pick| pick.stage() == stage)
    }

    pub fn identity_keys(&self) -> Vec<String> {
        self.chosen()
            .map(|s| s.activity.identity_key.clone())
            .collect()
    }
}
