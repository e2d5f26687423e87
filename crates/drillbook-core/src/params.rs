//! Parameter structures for planner operations.
//!
//! These structures are shared by every interface built on the core crate.
//! They carry no framework-specific derives; the CLI wraps them in its own
//! clap argument types and converts with `From`.
//!
//! ```rust
//! use drillbook_core::{
//!     models::{AgeBracket, TacticalGoal, TechnicalFocus},
//!     params::GeneratePlan,
//!     SelectionConstraints,
//! };
//!
//! let params = GeneratePlan {
//!     age: AgeBracket::U14ToU15,
//!     tactical: Some(TacticalGoal::Finishing),
//!     technical: vec![TechnicalFocus::BallControl],
//!     match_game: true,
//!     ..Default::default()
//! };
//! let constraints = SelectionConstraints::from(&params);
//! assert_eq!(constraints.main_format, vec!["10vs10", "11vs11"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    config::WorkloadConfig,
    models::{
        AgeBracket, FitnessFocus, LargeFormat, MainFormat, MainProfile, SelectionConstraints,
        SessionSummary, Stage, TacticalGoal, TechnicalFocus, TrainingPlan,
    },
    workload::compute_workload,
};

/// Preset choices for one plan generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratePlan {
    pub age: AgeBracket,
    pub tactical: Option<TacticalGoal>,
    pub technical: Vec<TechnicalFocus>,
    pub fitness: Option<FitnessFocus>,
    pub large_format: Option<LargeFormat>,
    pub main_profile: Option<MainProfile>,
    pub main_format: Option<MainFormat>,
    /// Ask for a genuine match game with age-appropriate sizes in the main
    /// phase. Overrides `main_format`.
    pub match_game: bool,
    /// Planned headcount, free text such as `14` or `7-9`
    pub players: Option<String>,
    pub duration_minutes: Option<u32>,
}

impl GeneratePlan {
    /// Summary fields carried into the generated plan.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            players: self
                .players
                .as_deref()
                .map(str::trim)
                .filter(|players| !players.is_empty())
                .map(str::to_string),
            duration_minutes: self.duration_minutes.filter(|minutes| *minutes > 0),
        }
    }
}

impl Default for GeneratePlan {
    fn default() -> Self {
        Self {
            age: AgeBracket::Any,
            tactical: None,
            technical: Vec::new(),
            fitness: None,
            large_format: None,
            main_profile: None,
            main_format: None,
            match_game: false,
            players: None,
            duration_minutes: None,
        }
    }
}

impl From<&GeneratePlan> for SelectionConstraints {
    fn from(params: &GeneratePlan) -> Self {
        let mut constraints =
            SelectionConstraints::for_age(params.age).with_technical(&params.technical);
        if let Some(goal) = params.tactical {
            constraints = constraints.with_tactical(goal);
        }
        if let Some(focus) = params.fitness {
            constraints = constraints.with_fitness(focus);
        }
        if let Some(format) = params.large_format {
            constraints = constraints.with_large_format(format);
        }
        if let Some(profile) = params.main_profile {
            constraints = constraints.with_main_profile(profile);
        }
        if let Some(format) = params.main_format {
            constraints = constraints.with_main_format(format);
        }
        if params.match_game {
            constraints = constraints.wanting_match_game(params.age);
        }
        constraints
    }
}

/// Workload to record when a plan is finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionLoad {
    pub coach_id: String,
    pub team_id: String,
    /// Period to accumulate into; the current ISO week when absent
    pub period_key: Option<String>,
    /// Periodization week, 0 for none
    pub week: u32,
    pub technical: Vec<TechnicalFocus>,
    pub fitness: Vec<FitnessFocus>,
}

impl SessionLoad {
    /// Workload of the stages a plan actually filled.
    pub fn workload_for(&self, plan: &TrainingPlan, config: &WorkloadConfig) -> f64 {
        compute_workload(
            self.week,
            &plan.included_stages(),
            &self.technical,
            &self.fitness,
            config,
        )
    }
}

/// Parameters for committing a generated plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizePlan {
    pub plan: TrainingPlan,
    /// Record the session workload as well
    #[serde(default)]
    pub session: Option<SessionLoad>,
}

/// Parameters for adding a session load directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSession {
    pub coach_id: String,
    pub team_id: String,
    pub period_key: String,
    pub load: f64,
}

/// Parameters for an ACWR query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GetAcwr {
    pub coach_id: String,
    pub team_id: String,
    pub period_key: String,
}

/// Parameters for computing a session workload without recording it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComputeWorkload {
    pub week: u32,
    pub stages: Vec<Stage>,
    pub technical: Vec<TechnicalFocus>,
    pub fitness: Vec<FitnessFocus>,
}

impl ComputeWorkload {
    pub fn compute(&self, config: &WorkloadConfig) -> f64 {
        compute_workload(
            self.week,
            &self.stages,
            &self.technical,
            &self.fitness,
            config,
        )
    }
}

/// Parameters for listing usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MostUsed {
    pub limit: usize,
}

impl Default for MostUsed {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_unconstrained() {
        let constraints = SelectionConstraints::from(&GeneratePlan::default());
        assert_eq!(constraints, SelectionConstraints::default());
    }

    #[test]
    fn test_presets_expand() {
        let params = GeneratePlan {
            age: AgeBracket::U10ToU11,
            tactical: Some(TacticalGoal::Pressing),
            fitness: Some(FitnessFocus::Endurance),
            large_format: Some(LargeFormat::SixVsSix),
            main_profile: Some(MainProfile::Finishing),
            main_format: Some(MainFormat::Reduced),
            ..Default::default()
        };
        let constraints = SelectionConstraints::from(&params);
        assert!(constraints.age_tokens.contains("u11"));
        assert!(constraints.tactical.contains(&"pressing".to_string()));
        assert!(constraints.fitness.contains(&"endurance".to_string()));
        assert_eq!(constraints.large_format, vec!["6vs6"]);
        assert_eq!(constraints.main_format, vec!["7vs7", "8vs8"]);
        assert_eq!(constraints.match_sizes, vec!["6vs6", "7vs7"]);
    }

    #[test]
    fn test_compute_workload_params() {
        let params = ComputeWorkload {
            week: 2,
            stages: vec![Stage::Warmup, Stage::Small],
            technical: vec![TechnicalFocus::LongPasses],
            fitness: Vec::new(),
        };
        assert!((params.compute(&WorkloadConfig::default()) - 407.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_drops_blank_values() {
        let params = GeneratePlan {
            players: Some(" 7-9 ".to_string()),
            duration_minutes: Some(90),
            ..Default::default()
        };
        let summary = params.summary();
        assert_eq!(summary.players.as_deref(), Some("7-9"));
        assert_eq!(summary.duration_minutes, Some(90));

        let blank = GeneratePlan {
            players: Some("   ".to_string()),
            duration_minutes: Some(0),
            ..Default::default()
        };
        assert!(blank.summary().is_empty());
    }
}
