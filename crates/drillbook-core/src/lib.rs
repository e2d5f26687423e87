//! Core library for the drillbook training session planner.
//!
//! The crate turns a loosely-structured collection of football drills into
//! four-stage session plans (warm-up, small-sided game, larger tactical
//! game, main match phase) and tracks the training load those sessions put
//! on a team.
//!
//! # Layers
//!
//! - [`catalog`]: Normalizes raw JSON records into [`ActivityRecord`]s
//! - [`scoring`], [`relaxation`], [`repetition`], [`selector`]: Pure,
//!   in-memory selection with progressive constraint relaxation
//! - [`workload`]: Session load computation and the acute:chronic workload
//!   ratio
//! - [`store`], [`db`]: Usage counters and workload totals, in memory or in
//!   SQLite
//! - [`planner`]: Async facade tying it all together
//! - [`display`]: Markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use drillbook_core::{
//!     catalog::ActivityCatalog,
//!     config::StageKeywordTable,
//!     models::{AgeBracket, Stage},
//!     params::{FinalizePlan, GeneratePlan},
//!     TrainingPlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ActivityCatalog::from_json_str(
//!     r#"[{"title": "Rondo 4 v 2", "stage": "small"}]"#,
//!     &StageKeywordTable::default(),
//! )?;
//!
//! let planner = TrainingPlannerBuilder::new()
//!     .with_database_path(Some("drillbook.db"))
//!     .with_catalog(catalog)
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .generate_plan(&GeneratePlan {
//!         age: AgeBracket::U10ToU11,
//!         ..Default::default()
//!     })
//!     .await;
//! assert!(plan.pick(Stage::Small).is_some_and(|pick| pick.is_found()));
//! println!("{plan}");
//!
//! let result = planner
//!     .finalize_plan(&FinalizePlan { plan, session: None })
//!     .await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod relaxation;
pub mod repetition;
pub mod scoring;
pub mod selector;
pub mod store;
pub mod workload;

// Re-export commonly used types
pub use catalog::{ActivityCatalog, CatalogStats, NormalizeReport};
pub use config::EngineConfig;
pub use db::Database;
pub use display::{FinalizeResult, LocalDateTime, RerollResult, UsageEntries, WorkloadHistory};
pub use error::{EngineError, Result};
pub use models::{
    AcwrOutcome, AcwrReport, ActivityRecord, RelaxationLevel, RiskZone, Selection,
    SelectionConstraints, SessionSummary, Stage, StagePick, TrainingPlan, UsageCounts,
    WorkloadRecord,
};
pub use planner::{TrainingPlanner, TrainingPlannerBuilder};
pub use scoring::ScoringEngine;
pub use selector::Selector;
pub use store::{MemoryStore, UsageStore, WorkloadStore};
pub use workload::{PeriodKey, WorkloadTracker};
