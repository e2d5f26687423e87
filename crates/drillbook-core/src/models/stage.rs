//! The four fixed phases of a generated session plan.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan stages, in session order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Low-intensity opening block
    #[serde(alias = "warm-up", alias = "warm_up")]
    Warmup,

    /// Small-sided game (1v1 up to 4v4)
    #[serde(alias = "small-sided", alias = "small_sided")]
    Small,

    /// Larger tactical game (5v5 up to 8v8)
    #[serde(alias = "large-sided", alias = "large_sided")]
    Large,

    /// Main phase, ideally a genuine match-format game
    #[serde(alias = "match")]
    Main,
}

impl Stage {
    /// All stages in the order a plan is generated.
    pub const ALL: [Stage; 4] = [Stage::Warmup, Stage::Small, Stage::Large, Stage::Main];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Warmup => "warmup",
            Stage::Small => "small",
            Stage::Large => "large",
            Stage::Main => "main",
        }
    }

    /// Human readable heading used in plan output.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Warmup => "Warm-up",
            Stage::Small => "Small-sided game",
            Stage::Large => "Larger tactical game",
            Stage::Main => "Main phase - match game",
        }
    }

    /// Position of the stage within a plan, starting at 1.
    pub fn position(&self) -> usize {
        match self {
            Stage::Warmup => 1,
            Stage::Small => 2,
            Stage::Large => 3,
            Stage::Main => 4,
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "warmup" | "warm-up" => Ok(Stage::Warmup),
            "small" | "small-sided" | "goal1" => Ok(Stage::Small),
            "large" | "large-sided" | "goal2" => Ok(Stage::Large),
            "main" | "match" | "match-game" | "goal3" => Ok(Stage::Main),
            _ => Err(format!("Invalid stage: {s}")),
        }
    }
}
