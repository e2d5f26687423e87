//! Workload and acute:chronic workload ratio models.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Accumulated load for one (coach, team, period) triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkloadRecord {
    pub coach_id: String,
    pub team_id: String,
    /// Period identifier, e.g. an ISO week label such as `2025-W07`
    pub period_key: String,
    /// Sum of every session load finalized for this period
    pub load: f64,
    /// Timestamp of the last session added to this period (UTC)
    pub updated_at: Timestamp,
}

/// Risk zone derived from the acute:chronic ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RiskZone {
    /// Ratio below 0.8
    UnderLoad,
    /// Ratio from 0.8 to 1.3 inclusive
    Optimal,
    /// Ratio above 1.3 up to 1.5 inclusive
    Elevated,
    /// Ratio above 1.5
    HighRisk,
}

impl RiskZone {
    /// Classifies a ratio with the fixed threshold table.
    ///
    /// ```rust
    /// use drillbook_core::models::RiskZone;
    ///
    /// assert_eq!(RiskZone::classify(0.79), RiskZone::UnderLoad);
    /// assert_eq!(RiskZone::classify(0.8), RiskZone::Optimal);
    /// assert_eq!(RiskZone::classify(1.3), RiskZone::Optimal);
    /// assert_eq!(RiskZone::classify(1.5), RiskZone::Elevated);
    /// assert_eq!(RiskZone::classify(1.51), RiskZone::HighRisk);
    /// ```
    pub fn classify(ratio: f64) -> Self {
        if ratio < 0.8 {
            RiskZone::UnderLoad
        } else if ratio <= 1.3 {
            RiskZone::Optimal
        } else if ratio <= 1.5 {
            RiskZone::Elevated
        } else {
            RiskZone::HighRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskZone::UnderLoad => "under-load",
            RiskZone::Optimal => "optimal",
            RiskZone::Elevated => "elevated",
            RiskZone::HighRisk => "high-risk",
        }
    }

    /// Status with an icon, for terminal output.
    pub fn with_icon(&self) -> &'static str {
        match self {
            RiskZone::UnderLoad => "▽ Under-load",
            RiskZone::Optimal => "✓ Optimal",
            RiskZone::Elevated => "△ Elevated",
            RiskZone::HighRisk => "✗ High risk",
        }
    }
}

impl FromStr for RiskZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "under-load" | "underload" => Ok(RiskZone::UnderLoad),
            "optimal" => Ok(RiskZone::Optimal),
            "elevated" => Ok(RiskZone::Elevated),
            "high-risk" | "highrisk" => Ok(RiskZone::HighRisk),
            _ => Err(format!("Invalid risk zone: {s}")),
        }
    }
}

/// ACWR values for a period that has recorded load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcwrReport {
    pub coach_id: String,
    pub team_id: String,
    pub period_key: String,

    /// Accumulated load of the requested period
    pub acute: f64,

    /// Mean load of the preceding periods with data; `None` without history
    pub chronic: Option<f64>,

    /// `acute / chronic`; `None` when chronic is unavailable or zero
    pub ratio: Option<f64>,

    /// Classification of `ratio`, when a ratio exists
    pub risk_zone: Option<RiskZone>,

    /// Period keys that fed the chronic average, newest first
    #[serde(default)]
    pub chronic_periods: Vec<String>,
}

/// Outcome of an ACWR query.
///
/// `Unavailable` means the requested period has no recorded load at all. It
/// is deliberately distinct from a zero load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AcwrOutcome {
    Available(AcwrReport),
    Unavailable {
        coach_id: String,
        team_id: String,
        period_key: String,
    },
}

impl AcwrOutcome {
    /// Returns the report when the acute load is known.
    pub fn report(&self) -> Option<&AcwrReport> {
        match self {
            AcwrOutcome::Available(report) => Some(report),
            AcwrOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AcwrOutcome::Available(_))
    }
}

/// Workload recorded while finalizing a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionWorkload {
    pub period_key: String,
    /// Load of this session alone
    pub load: f64,
    /// Accumulated load of the period after adding this session
    pub total: f64,
    pub acwr: AcwrOutcome,
}
