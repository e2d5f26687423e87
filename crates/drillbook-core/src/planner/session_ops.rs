//! Operations that persist: finalization, workload and usage statistics.

use log::{info, warn};
use tokio::task;

use super::TrainingPlanner;
use crate::{
    db::Database,
    display::{FinalizeResult, UsageEntries, WorkloadHistory},
    error::{EngineError, Result},
    models::{AcwrOutcome, RiskZone, SessionWorkload, UsageCounts},
    params::{ComputeWorkload, FinalizePlan, GetAcwr, MostUsed, RecordSession},
    workload::{validate_session, PeriodKey, WorkloadTracker},
};

impl TrainingPlanner {
    /// Commits a generated plan.
    ///
    /// Increments the usage counter of every chosen identity in one
    /// transaction and, when `params.session` is present, adds the session
    /// workload to its period and computes the resulting ACWR. The session
    /// is validated before either write, so a rejected call leaves the usage
    /// counters untouched. The in-memory counters are refreshed from the
    /// stored values afterwards.
    pub async fn finalize_plan(&self, params: &FinalizePlan) -> Result<FinalizeResult> {
        let keys = params.plan.identity_keys();
        if keys.is_empty() {
            return Err(EngineError::invalid_input("plan")
                .with_reason("contains no chosen activities to finalize"));
        }

        let session = match &params.session {
            Some(session) => {
                let period_key = match &session.period_key {
                    Some(key) => key.parse::<PeriodKey>().map_err(|reason| {
                        EngineError::invalid_input("period_key").with_reason(reason)
                    })?,
                    None => PeriodKey::current(),
                };
                let load = session.workload_for(&params.plan, &self.config.workload);
                validate_session(&session.coach_id, &session.team_id, period_key.as_str(), load)?;
                Some((session.clone(), period_key, load))
            }
            None => None,
        };

        let db_path = self.db_path.clone();
        let window = self.config.workload.chronic_window;
        let (usage, workload) = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let usage = db.increment_usage(&keys)?;

            let workload = match session {
                Some((session, period_key, load)) => {
                    let mut tracker = WorkloadTracker::new(db, window);
                    let total = tracker.record_session(
                        &session.coach_id,
                        &session.team_id,
                        period_key.as_str(),
                        load,
                    )?;
                    let acwr = tracker.compute_acwr(
                        &session.coach_id,
                        &session.team_id,
                        period_key.as_str(),
                    )?;
                    Some(SessionWorkload {
                        period_key: period_key.to_string(),
                        load,
                        total,
                        acwr,
                    })
                }
                None => None,
            };
            Ok::<_, EngineError>((usage, workload))
        })
        .await??;

        self.usage.write().await.merge(&usage);
        info!("Finalized plan with {} activities", usage.len());

        let result = FinalizeResult::new(usage);
        Ok(match workload {
            Some(workload) => result.with_workload(workload),
            None => result,
        })
    }

    /// Adds a session load directly and returns the period total.
    pub async fn record_session(&self, params: &RecordSession) -> Result<f64> {
        let db_path = self.db_path.clone();
        let window = self.config.workload.chronic_window;
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut tracker = WorkloadTracker::new(Database::new(&db_path)?, window);
            tracker.record_session(
                &params.coach_id,
                &params.team_id,
                &params.period_key,
                params.load,
            )
        })
        .await?
    }

    /// Acute:chronic workload ratio of one period.
    pub async fn get_acwr(&self, params: &GetAcwr) -> Result<AcwrOutcome> {
        let db_path = self.db_path.clone();
        let window = self.config.workload.chronic_window;
        let params = params.clone();

        let outcome = task::spawn_blocking(move || {
            let tracker = WorkloadTracker::new(Database::new(&db_path)?, window);
            tracker.compute_acwr(&params.coach_id, &params.team_id, &params.period_key)
        })
        .await??;

        if let Some(report) = outcome.report() {
            if let Some(zone @ (RiskZone::Elevated | RiskZone::HighRisk)) = report.risk_zone {
                warn!(
                    "{}/{} in {} is in the {zone} zone",
                    report.coach_id, report.team_id, report.period_key
                );
            }
        }
        Ok(outcome)
    }

    /// Every recorded period of a coach and team, oldest first.
    pub async fn workload_history(&self, coach_id: &str, team_id: &str) -> Result<WorkloadHistory> {
        let db_path = self.db_path.clone();
        let coach_id = coach_id.to_string();
        let team_id = team_id.to_string();

        let records = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_workload_history(&coach_id, &team_id)
        })
        .await??;
        Ok(WorkloadHistory(records))
    }

    /// Workload of a hypothetical session, without recording it.
    pub fn compute_workload(&self, params: &ComputeWorkload) -> f64 {
        params.compute(&self.config.workload)
    }

    /// Most finalized activities, highest count first.
    pub async fn most_used(&self, params: &MostUsed) -> Result<UsageEntries> {
        let db_path = self.db_path.clone();
        let limit = params.limit;

        let entries = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.most_used_activities(limit)
        })
        .await??;
        Ok(UsageEntries(entries))
    }

    /// Reloads the usage counters from the database, picking up plans other
    /// processes finalized since this planner was built.
    pub async fn refresh_usage(&self) -> Result<UsageCounts> {
        let db_path = self.db_path.clone();
        let counts = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.load_usage()
        })
        .await??;

        *self.usage.write().await = counts.clone();
        Ok(counts)
    }
}
