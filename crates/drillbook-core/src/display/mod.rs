//! Display formatting for plans, workload reports and statistics.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes get small wrapper types. All output
//! is markdown, rendered by the CLI's terminal renderer.
//!
//! - [`collections`]: `UsageEntries`, `WorkloadHistory`
//! - [`results`]: `FinalizeResult`, `RerollResult`
//! - [`datetime`]: `LocalDateTime`
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{UsageEntries, WorkloadHistory};
pub use datetime::LocalDateTime;
pub use results::{FinalizeResult, RerollResult};
