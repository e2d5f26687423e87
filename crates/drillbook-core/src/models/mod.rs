//! Data models for activities, constraints, selections and workload.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping data structures separate from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use drillbook_core::models::{
//!     AgeBracket, FitnessFocus, SelectionConstraints, Stage, TacticalGoal, TechnicalFocus,
//! };
//!
//! let constraints = SelectionConstraints::for_age(AgeBracket::U12ToU13)
//!     .with_tactical(TacticalGoal::Pressing)
//!     .with_technical(&[TechnicalFocus::ShortPassing])
//!     .with_fitness(FitnessFocus::Speed)
//!     .wanting_match_game(AgeBracket::U12ToU13);
//!
//! assert!(constraints.age_tokens.contains("u12"));
//! assert_eq!(constraints.main_format, vec!["7vs7", "8vs8", "9vs9"]);
//! assert_eq!("warm-up".parse::<Stage>(), Ok(Stage::Warmup));
//! ```

pub mod activity;
pub mod constraints;
pub mod selection;
pub mod stage;
pub mod usage;
pub mod workload;


pub use activity::ActivityRecord;
pub use constraints::{
    AgeBracket, FitnessFocus, LargeFormat, MainFormat, MainProfile, SelectionConstraints,
    TacticalGoal, TechnicalFocus,
};
pub use selection::{RelaxationLevel, Selection, SessionSummary, StagePick, TrainingPlan};
pub use stage::Stage;
pub use usage::{UsageCounts, UsageEntry};
pub use workload::{AcwrOutcome, AcwrReport, RiskZone, SessionWorkload, WorkloadRecord};
