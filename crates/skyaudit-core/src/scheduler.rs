//! Task scheduling
//!
//! Executes every planned task exactly once against its registered probe,
//! with at most `worker_budget` probe calls in flight. Dispatch follows
//! plan order (the semaphore grants permits FIFO); completion order is
//! deliberately unconstrained and never observable in the result, because
//! the collector re-orders outcomes by task identity.
//!
//! A probe failure is captured into that task's outcome and dispatching
//! continues; a run in which every task fails is still a completed run.

use crate::collector::ResultCollector;
use crate::error::{AuditError, Result};
use crate::planner::TaskPlan;
use crate::task::{AuditTask, FailureKind, RunResult, TaskOutcome};
use chrono::Utc;
use skyaudit_probe::{Probe, ProbeError, ProbeRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Default number of concurrently in-flight tasks
pub const DEFAULT_WORKER_BUDGET: usize = 10;

/// Run configuration, threaded explicitly into the scheduler
///
/// There is intentionally no process-wide default to mutate; callers build
/// the value they want and pass it in.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Maximum number of concurrently in-flight probe calls
    pub worker_budget: usize,

    /// Coarse deadline for the whole run. Tasks still in flight when it
    /// passes resolve to `TimedOut` outcomes; completed work is kept.
    pub run_timeout: Option<Duration>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            worker_budget: DEFAULT_WORKER_BUDGET,
            run_timeout: None,
        }
    }
}

/// Bounded worker pool executing one run's task grid
pub struct Scheduler {
    registry: Arc<ProbeRegistry>,
    config: AuditConfig,
}

impl Scheduler {
    pub fn new(registry: Arc<ProbeRegistry>, config: AuditConfig) -> Self {
        Self { registry, config }
    }

    /// Execute the plan and collect one outcome per task
    ///
    /// Only structural bugs (lost/duplicated outcomes, a panicking worker)
    /// return `Err`; probe failures are data inside the `RunResult`.
    pub async fn run(&self, plan: TaskPlan) -> Result<RunResult> {
        let started_at = Utc::now();
        let collector = Arc::new(ResultCollector::new(plan.tasks.len()));
        let semaphore = Arc::new(Semaphore::new(self.config.worker_budget.max(1)));
        let deadline = self.config.run_timeout.map(|t| Instant::now() + t);

        tracing::info!(
            "Dispatching {} tasks with worker budget {}",
            plan.tasks.len(),
            self.config.worker_budget
        );

        let mut workers = JoinSet::new();
        for task in plan.tasks.iter().cloned() {
            let probe = self.registry.get(&task.service);
            let semaphore = semaphore.clone();
            let collector = collector.clone();
            workers.spawn(async move {
                let outcome = execute_task(task, probe, semaphore, deadline).await;
                collector.deposit(outcome)
            });
        }

        // Full barrier: the aggregator must never see a partial run
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(deposited) => deposited?,
                Err(e) => {
                    return Err(AuditError::Integrity(format!("worker panicked: {}", e)));
                }
            }
        }

        let collector = Arc::try_unwrap(collector)
            .map_err(|_| AuditError::Integrity("collector still shared after join".to_string()))?;
        let outcomes = collector.into_outcomes()?;

        tracing::info!(
            "Run complete: {} ok, {} failed",
            outcomes.iter().filter(|o| o.is_ok()).count(),
            outcomes.iter().filter(|o| !o.is_ok()).count()
        );

        Ok(RunResult {
            regions: plan.regions,
            services: plan.services,
            outcomes,
            issues: plan.issues,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Run one task to its terminal outcome; never returns early, never panics
/// across the task boundary
async fn execute_task(
    task: AuditTask,
    probe: Option<Arc<dyn Probe>>,
    semaphore: Arc<Semaphore>,
    deadline: Option<Instant>,
) -> TaskOutcome {
    // The planner validated the service name, so a missing probe here is
    // unexpected, but it still must not sink the task silently.
    let Some(probe) = probe else {
        return TaskOutcome::failed(
            task,
            FailureKind::Unknown,
            "no probe registered for service",
        );
    };

    // The permit is acquired inside the timed future so tasks still queued
    // at the deadline resolve to TimedOut instead of hanging.
    let work = async {
        let _permit = semaphore
            .acquire_owned()
            .await
            .map_err(|_| ProbeError::Unknown("worker pool closed".to_string()))?;
        tracing::debug!("Probing {} in {}", task.service, task.region);
        probe.collect(&task.region).await
    };

    let result = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, work).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Task {} hit the run deadline", task);
                return TaskOutcome::failed(task, FailureKind::TimedOut, "run deadline reached");
            }
        },
        None => work.await,
    };

    match result {
        Ok(records) => {
            tracing::debug!("Task {} found {} resources", task, records.len());
            TaskOutcome::ok(task, records)
        }
        Err(err) => {
            tracing::warn!("Task {} failed: {}", task, err);
            TaskOutcome::from_probe_error(task, &err)
        }
    }
}
