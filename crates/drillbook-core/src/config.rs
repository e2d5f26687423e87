//! Engine configuration.
//!
//! Every tunable table of the engine (scoring weights, the stage inference
//! keyword table, workload constants) lives in [`EngineConfig`]. The config
//! is plain JSON; missing fields fall back to the built-in defaults, so a
//! file only needs to name what it overrides:
//!
//! ```json
//! { "workload": { "chronic_window": 6 }, "scoring": { "jitter": 0.0 } }
//! ```
//!
//! Lookup order used by [`EngineConfig::discover`]: explicit path, then
//! `$XDG_CONFIG_HOME/drillbook/config.json`, then defaults.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    models::Stage,
};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub stage_keywords: StageKeywordTable,
    pub workload: WorkloadConfig,
}

/// Weights used by the scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub tactical_weight: f64,
    pub technical_weight: f64,
    pub fitness_weight: f64,

    pub warmup_bonus: f64,
    pub warmup_match_penalty: f64,

    pub small_size_bonus: f64,

    pub large_size_bonus: f64,
    pub large_format_bonus: f64,
    pub large_organisation_bonus: f64,
    pub large_circuit_penalty: f64,
    pub large_warmup_penalty: f64,

    pub main_game_bonus: f64,
    pub main_non_game_penalty: f64,
    pub main_format_bonus: f64,
    pub main_profile_bonus: f64,
    pub main_drill_penalty: f64,

    /// Subtracted when the media reference was already used in the plan.
    /// Must exceed any achievable positive score.
    pub media_repeat_penalty: f64,

    /// Upper bound of the uniform tie-breaking jitter; 0 disables it
    pub jitter: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tactical_weight: 3.0,
            technical_weight: 2.0,
            fitness_weight: 2.0,
            warmup_bonus: 6.0,
            warmup_match_penalty: 4.0,
            small_size_bonus: 5.0,
            large_size_bonus: 4.0,
            large_format_bonus: 4.0,
            large_organisation_bonus: 4.0,
            large_circuit_penalty: 3.0,
            large_warmup_penalty: 3.0,
            main_game_bonus: 10.0,
            main_non_game_penalty: 8.0,
            main_format_bonus: 5.0,
            main_profile_bonus: 4.0,
            main_drill_penalty: 4.0,
            media_repeat_penalty: 1000.0,
            jitter: 1.0,
        }
    }
}

/// One stage inference rule: any keyword hit assigns the stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageRule {
    pub stage: Stage,
    pub keywords: Vec<String>,
}

impl StageRule {
    fn new(stage: Stage, keywords: &[&str]) -> Self {
        Self {
            stage,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Keyword heuristics used when a record has no explicit stage field.
///
/// Rules are tried in order against the title, then the category, then the
/// full text; the first hit wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageKeywordTable {
    pub rules: Vec<StageRule>,
    /// Stage for records that match no rule. `None` drops them.
    pub default_stage: Option<Stage>,
}

impl Default for StageKeywordTable {
    fn default() -> Self {
        Self {
            rules: vec![
                StageRule::new(
                    Stage::Warmup,
                    &["warm-up", "coordination", "activation", "mobility"],
                ),
                StageRule::new(
                    Stage::Main,
                    &[
                        "match game",
                        "final game",
                        "11vs11",
                        "10vs10",
                        "9vs9",
                        "full pitch",
                        "match",
                    ],
                ),
                StageRule::new(
                    Stage::Large,
                    &[
                        "8vs8",
                        "7vs7",
                        "6vs6",
                        "5vs5",
                        "possession game",
                        "team training",
                        "game systems",
                    ],
                ),
                StageRule::new(
                    Stage::Small,
                    &["4vs4", "3vs3", "2vs2", "1vs1", "small-sided", "rondo", "duel"],
                ),
            ],
            default_stage: None,
        }
    }
}

/// Per-stage base loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageLoads {
    pub warmup: f64,
    pub small: f64,
    pub large: f64,
    pub main: f64,
}

impl StageLoads {
    pub fn for_stage(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Warmup => self.warmup,
            Stage::Small => self.small,
            Stage::Large => self.large,
            Stage::Main => self.main,
        }
    }
}

impl Default for StageLoads {
    fn default() -> Self {
        Self {
            warmup: 100.0,
            small: 250.0,
            large: 300.0,
            main: 350.0,
        }
    }
}

/// Constants of the workload model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkloadConfig {
    pub stage_loads: StageLoads,
    /// Bonus per selected technical focus term
    pub technical_bonus: f64,
    /// Bonus per selected fitness focus term
    pub fitness_bonus: f64,
    /// Intensity multiplier per periodization week, starting at week 1.
    /// Weeks past the end of the table cycle through it again.
    pub periodization: Vec<f64>,
    /// Number of preceding periods averaged into the chronic load
    pub chronic_window: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            stage_loads: StageLoads::default(),
            technical_bonus: 20.0,
            fitness_bonus: 30.0,
            periodization: vec![1.0, 1.1, 1.2, 0.8],
            chronic_window: 4,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(EngineError::file_system(path))?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Resolves the configuration: explicit path, XDG config file, defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match xdg::BaseDirectories::with_prefix("drillbook").find_config_file("config.json") {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Rejects values that would make the engine misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.workload.chronic_window == 0 {
            return Err(EngineError::setting("workload.chronic_window")
                .with_reason("must be at least 1"));
        }
        if self.workload.periodization.is_empty() {
            return Err(EngineError::setting("workload.periodization")
                .with_reason("must contain at least one week"));
        }
        if self.workload.periodization.iter().any(|m| *m < 0.0) {
            return Err(EngineError::setting("workload.periodization")
                .with_reason("multipliers must not be negative"));
        }
        if self.scoring.jitter < 0.0 {
            return Err(EngineError::setting("scoring.jitter").with_reason("must not be negative"));
        }
        Ok(())
    }
}
