//! Result collection
//!
//! The single shared mutable resource of a run. Workers deposit outcomes
//! concurrently; the collector guarantees at-most-one write per task
//! identity and releases the accumulated set only once every dispatched
//! task has reported. Keying by [`AuditTask`] makes the final order
//! independent of completion interleaving, so a run is byte-identical
//! whether it executed on one worker or ten.

use crate::error::{AuditError, Result};
use crate::task::{AuditTask, TaskOutcome};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Run-scoped accumulation point for task outcomes
pub struct ResultCollector {
    expected: usize,
    slots: Mutex<BTreeMap<AuditTask, TaskOutcome>>,
}

impl ResultCollector {
    /// Create a collector expecting exactly `expected` outcomes
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            slots: Mutex::new(BTreeMap::new()),
        }
    }

    /// Deposit one outcome
    ///
    /// A second deposit for the same task identity is a structural bug and
    /// fails with [`AuditError::DuplicateOutcome`].
    pub fn deposit(&self, outcome: TaskOutcome) -> Result<()> {
        let task = outcome.task();
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AuditError::Integrity("collector lock poisoned".to_string()))?;
        if slots.insert(task.clone(), outcome).is_some() {
            return Err(AuditError::DuplicateOutcome { task });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the collector, verifying no task outcome was lost
    pub fn into_outcomes(self) -> Result<Vec<TaskOutcome>> {
        let slots = self
            .slots
            .into_inner()
            .map_err(|_| AuditError::Integrity("collector lock poisoned".to_string()))?;
        if slots.len() != self.expected {
            return Err(AuditError::OutcomeCountMismatch {
                expected: self.expected,
                actual: slots.len(),
            });
        }
        Ok(slots.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{FailureKind, TaskStatus};
    use std::sync::Arc;

    fn ok_outcome(region: &str, service: &str) -> TaskOutcome {
        TaskOutcome::ok(AuditTask::new(region, service), Vec::new())
    }

    #[test]
    fn test_duplicate_deposit_is_fatal() {
        let collector = ResultCollector::new(1);
        collector.deposit(ok_outcome("us-east-1", "ec2")).unwrap();
        let err = collector.deposit(ok_outcome("us-east-1", "ec2")).unwrap_err();
        assert!(matches!(err, AuditError::DuplicateOutcome { .. }));
    }

    #[test]
    fn test_missing_outcome_is_fatal() {
        let collector = ResultCollector::new(2);
        collector.deposit(ok_outcome("us-east-1", "ec2")).unwrap();
        let err = collector.into_outcomes().unwrap_err();
        assert!(matches!(
            err,
            AuditError::OutcomeCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_outcomes_sorted_by_task_identity() {
        let collector = ResultCollector::new(3);
        collector.deposit(ok_outcome("us-west-2", "ec2")).unwrap();
        collector
            .deposit(TaskOutcome::failed(
                AuditTask::new("us-east-1", "rds"),
                FailureKind::Transient,
                "boom",
            ))
            .unwrap();
        collector.deposit(ok_outcome("us-east-1", "ec2")).unwrap();

        let outcomes = collector.into_outcomes().unwrap();
        let tasks: Vec<AuditTask> = outcomes.iter().map(|o| o.task()).collect();
        assert_eq!(
            tasks,
            vec![
                AuditTask::new("us-east-1", "ec2"),
                AuditTask::new("us-east-1", "rds"),
                AuditTask::new("us-west-2", "ec2"),
            ]
        );
        assert!(matches!(outcomes[1].status, TaskStatus::Failed { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deposits_lose_nothing() {
        let regions: Vec<String> = (0..8).map(|i| format!("region-{}", i)).collect();
        let services = ["ec2", "rds", "s3", "dynamodb"];
        let collector = Arc::new(ResultCollector::new(regions.len() * services.len()));

        let mut handles = Vec::new();
        for region in &regions {
            for service in services {
                let collector = collector.clone();
                let region = region.clone();
                handles.push(tokio::spawn(async move {
                    collector.deposit(ok_outcome(&region, service))
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let collector = Arc::try_unwrap(collector).unwrap_or_else(|_| panic!("still shared"));
        assert_eq!(collector.into_outcomes().unwrap().len(), 32);
    }
}
