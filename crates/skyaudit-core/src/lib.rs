//! Skyaudit Core
//!
//! The audit orchestration and aggregation engine. A run decomposes a
//! (regions × services) selection into independent tasks, executes them
//! under a bounded concurrency budget, captures per-task failures as data
//! instead of letting one broken probe abort the run, and folds the
//! collected outcomes into summary views for export.
//!
//! Pipeline:
//!
//! ```text
//! selection ──► planner ──► TaskPlan ──► Scheduler ──► RunResult ──► aggregate ──► Summary
//!                                           │
//!                                     ProbeRegistry
//! ```
//!
//! Task-scoped failures (denied credentials, a service missing in a region,
//! network trouble, the run deadline) never surface as `Err` from the
//! scheduler; they live inside the [`RunResult`] as [`TaskStatus::Failed`]
//! outcomes. The only fatal error type is [`AuditError`], which marks a
//! structural bug in the run itself.

pub mod aggregator;
pub mod collector;
pub mod error;
pub mod planner;
pub mod scheduler;
pub mod task;

// Re-exports
pub use aggregator::{FailedTask, RegionStats, ServiceTotal, Summary, UsageCell, aggregate};
pub use collector::ResultCollector;
pub use error::{AuditError, Result};
pub use planner::{Selection, TaskPlan, plan};
pub use scheduler::{AuditConfig, DEFAULT_WORKER_BUDGET, Scheduler};
pub use task::{
    AuditTask, FailureKind, IssueKind, RunResult, SelectionIssue, TaskOutcome, TaskStatus,
};
