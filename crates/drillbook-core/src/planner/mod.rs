//! High-level async API over the selection engine and the database.
//!
//! [`TrainingPlanner`] owns the catalog, the configuration and an in-memory
//! snapshot of the usage counters. Selection runs in memory; every database
//! access runs on the blocking pool via `tokio::task::spawn_blocking`, and
//! each call opens its own connection, so several processes can share one
//! database file.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │ TrainingPlanner │───▶│ Selector /      │    │    Database     │
//! │  (plan_ops,     │    │ WorkloadTracker │───▶│   (via db/)     │
//! │   session_ops)  │    │                 │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`builder`]: Factory for [`TrainingPlanner`] instances
//! - [`plan_ops`]: Plan generation and rerolls (no persistence)
//! - [`session_ops`]: Finalization, workload and usage statistics
//!
//! # Examples
//!
//! ```rust,no_run
//! use drillbook_core::{
//!     models::AgeBracket,
//!     params::{FinalizePlan, GeneratePlan},
//!     TrainingPlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = TrainingPlannerBuilder::new()
//!     .with_catalog_path(Some("drills.json"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .generate_plan(&GeneratePlan {
//!         age: AgeBracket::U12ToU13,
//!         match_game: true,
//!         ..Default::default()
//!     })
//!     .await;
//!
//! // Nothing is persisted until the coach accepts the plan.
//! planner
//!     .finalize_plan(&FinalizePlan { plan, session: None })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock};

use crate::{
    catalog::{ActivityCatalog, CatalogStats},
    config::EngineConfig,
    models::UsageCounts,
    scoring::ScoringEngine,
};

pub mod builder;
pub mod plan_ops;
pub mod session_ops;

pub use builder::TrainingPlannerBuilder;

/// Entry point for plan generation and workload tracking.
#[derive(Debug)]
pub struct TrainingPlanner {
    db_path: PathBuf,
    config: EngineConfig,
    catalog: ActivityCatalog,
    scoring: ScoringEngine,
    usage: RwLock<UsageCounts>,
    rng: Mutex<StdRng>,
}

impl TrainingPlanner {
    pub(crate) fn new(
        db_path: PathBuf,
        config: EngineConfig,
        catalog: ActivityCatalog,
        usage: UsageCounts,
        rng: StdRng,
    ) -> Self {
        let scoring = ScoringEngine::new(config.scoring.clone());
        Self {
            db_path,
            config,
            catalog,
            scoring,
            usage: RwLock::new(usage),
            rng: Mutex::new(rng),
        }
    }

    /// Path of the database file this planner writes to.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn catalog_stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    /// Copy of the usage counters the next selection will see.
    pub async fn usage_snapshot(&self) -> UsageCounts {
        self.usage.read().await.clone()
    }
}
