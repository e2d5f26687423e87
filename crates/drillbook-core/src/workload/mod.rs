//! Training-load bookkeeping: session workload, period keys and ACWR.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    config::WorkloadConfig,
    models::{FitnessFocus, Stage, TechnicalFocus},
};

mod tracker;

pub use tracker::WorkloadTracker;
pub(crate) use tracker::validate_session;

/// Intensity multiplier for a periodization week.
///
/// Week 0 means "no periodization" and yields 1.0. Weeks past the end of the
/// table wrap around, so with the default four-week table week 5 equals
/// week 1.
///
/// ```rust
/// use drillbook_core::workload::periodization_multiplier;
///
/// let table = [1.0, 1.1, 1.2, 0.8];
/// assert_eq!(periodization_multiplier(0, &table), 1.0);
/// assert_eq!(periodization_multiplier(2, &table), 1.1);
/// assert_eq!(periodization_multiplier(6, &table), 1.1);
/// ```
pub fn periodization_multiplier(week: u32, table: &[f64]) -> f64 {
    if week == 0 || table.is_empty() {
        return 1.0;
    }
    let index = (week as usize - 1) % table.len();
    table.get(index).copied().unwrap_or(1.0)
}

/// Load of one session: the base load of every included stage plus a bonus
/// per selected technical and fitness focus, scaled by the week multiplier.
pub fn compute_workload(
    week: u32,
    stages: &[Stage],
    technical: &[TechnicalFocus],
    fitness: &[FitnessFocus],
    config: &WorkloadConfig,
) -> f64 {
    let base: f64 = stages
        .iter()
        .map(|stage| config.stage_loads.for_stage(*stage))
        .sum();
    let bonus = config.technical_bonus * technical.len() as f64
        + config.fitness_bonus * fitness.len() as f64;

    (base + bonus) * periodization_multiplier(week, &config.periodization)
}

/// Identifier of an accumulation period.
///
/// Any string works as a period key as long as lexicographic order equals
/// temporal order. [`PeriodKey::for_date`] builds ISO week keys such as
/// `2025-W07`, which satisfy that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    /// ISO week key of a calendar date.
    pub fn for_date(date: Date) -> Self {
        let week = date.iso_week_date();
        Self(format!("{:04}-W{:02}", week.year(), week.week()))
    }

    /// ISO week key of today, in the system time zone.
    pub fn current() -> Self {
        Self::for_date(jiff::Zoned::now().date())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PeriodKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Period key must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PeriodKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_week_two_workload() {
        let load = compute_workload(
            2,
            &[Stage::Warmup, Stage::Small],
            &[TechnicalFocus::ShortPassing],
            &[],
            &WorkloadConfig::default(),
        );
        assert!((load - 407.0).abs() < 1e-9, "load was {load}");
    }

    #[test]
    fn test_full_session_with_fitness_bonus() {
        let load = compute_workload(
            4,
            &Stage::ALL,
            &[],
            &[FitnessFocus::Speed],
            &WorkloadConfig::default(),
        );
        // (100 + 250 + 300 + 350 + 30) * 0.8
        assert!((load - 824.0).abs() < 1e-9, "load was {load}");
    }

    #[test]
    fn test_no_stages_no_load() {
        let load = compute_workload(1, &[], &[], &[], &WorkloadConfig::default());
        assert_eq!(load, 0.0);
    }

    #[test]
    fn test_period_key_for_date() {
        assert_eq!(PeriodKey::for_date(date(2025, 2, 12)).as_str(), "2025-W07");
        // 2024-12-30 belongs to ISO week 1 of 2025
        assert_eq!(PeriodKey::for_date(date(2024, 12, 30)).as_str(), "2025-W01");
        assert!(PeriodKey::for_date(date(2025, 3, 3)) > PeriodKey::for_date(date(2025, 2, 24)));
    }

    #[test]
    fn test_period_key_parse() {
        assert_eq!(
            " 2025-W03 ".parse::<PeriodKey>().map(|k| k.to_string()),
            Ok("2025-W03".to_string())
        );
        assert!("".parse::<PeriodKey>().is_err());
    }
}
