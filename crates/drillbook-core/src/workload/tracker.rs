//! Additive workload recording and ACWR computation over a store.

use log::{debug, info};

use crate::{
    error::{EngineError, Result},
    models::{AcwrOutcome, AcwrReport, RiskZone},
    store::WorkloadStore,
};

/// Records session loads and computes acute:chronic workload ratios.
#[derive(Debug)]
pub struct WorkloadTracker<S> {
    store: S,
    chronic_window: usize,
}

impl<S: WorkloadStore> WorkloadTracker<S> {
    /// Creates a tracker averaging over `chronic_window` preceding periods.
    pub fn new(store: S, chronic_window: usize) -> Self {
        Self {
            store,
            chronic_window: chronic_window.max(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Adds `load` to the period's accumulated value and returns the new
    /// total. Loads are never overwritten.
    pub fn record_session(
        &mut self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
        load: f64,
    ) -> Result<f64> {
        validate_session(coach_id, team_id, period_key, load)?;

        let total = self.store.add_load(coach_id, team_id, period_key, load)?;
        info!("Recorded load {load:.1} for {coach_id}/{team_id} in {period_key} (total {total:.1})");
        Ok(total)
    }

    /// Acute load, chronic mean of the preceding periods with data, their
    /// ratio and the risk zone.
    pub fn compute_acwr(
        &self,
        coach_id: &str,
        team_id: &str,
        period_key: &str,
    ) -> Result<AcwrOutcome> {
        validate_ids(coach_id, team_id, period_key)?;

        let Some(acute) = self.store.period_load(coach_id, team_id, period_key)? else {
            debug!("No load recorded for {coach_id}/{team_id} in {period_key}");
            return Ok(AcwrOutcome::Unavailable {
                coach_id: coach_id.to_string(),
                team_id: team_id.to_string(),
                period_key: period_key.to_string(),
            });
        };

        let preceding =
            self.store
                .preceding_loads(coach_id, team_id, period_key, self.chronic_window)?;
        let chronic = if preceding.is_empty() {
            None
        } else {
            Some(preceding.iter().map(|(_, load)| load).sum::<f64>() / preceding.len() as f64)
        };
        let ratio = chronic.filter(|c| *c > 0.0).map(|c| acute / c);

        Ok(AcwrOutcome::Available(AcwrReport {
            coach_id: coach_id.to_string(),
            team_id: team_id.to_string(),
            period_key: period_key.to_string(),
            acute,
            chronic,
            ratio,
            risk_zone: ratio.map(RiskZone::classify),
            chronic_periods: preceding.into_iter().map(|(key, _)| key).collect(),
        }))
    }
}

/// Checks a session before anything is written for it.
pub(crate) fn validate_session(
    coach_id: &str,
    team_id: &str,
    period_key: &str,
    load: f64,
) -> Result<()> {
    validate_ids(coach_id, team_id, period_key)?;
    if !load.is_finite() || load < 0.0 {
        return Err(EngineError::invalid_input("load")
            .with_reason(format!("must be a finite, non-negative number (got {load})")));
    }
    Ok(())
}

fn validate_ids(coach_id: &str, team_id: &str, period_key: &str) -> Result<()> {
    for (field, value) in [
        ("coach_id", coach_id),
        ("team_id", team_id),
        ("period_key", period_key),
    ] {
        if value.trim().is_empty() {
            return Err(EngineError::invalid_input(field).with_reason("must not be empty"));
        }
    }
    Ok(())
}
