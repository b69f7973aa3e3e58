//! Summary aggregation
//!
//! Reduces a complete [`RunResult`] into the three canonical summary
//! views: per-region totals, per-service totals, and the region × service
//! usage matrix. All three are recomputed from scratch on every call.
//! There is deliberately no incremental path: an earlier incarnation of
//! this tool patched new services into a cached matrix and the matrix went
//! stale, so any outcome that does not fit the planned grid now fails
//! loudly instead of being skipped.

use crate::error::{AuditError, Result};
use crate::task::{AuditTask, FailureKind, RunResult, TaskOutcome, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of the usage matrix
///
/// An errored task is marked unavailable with its failure kind; it is
/// never folded into counts as a misleading zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageCell {
    Count(u64),
    Unavailable(FailureKind),
}

/// Per-service total across all regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTotal {
    /// At least one task for the service succeeded; zero is a real zero
    Count(u64),
    /// Every task for the service errored
    Unavailable,
}

/// A failed task attributed to its region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTask {
    pub service: String,
    pub kind: FailureKind,
}

/// Per-region totals plus the tasks that errored there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    /// Total resources across all successfully probed services
    pub resources: u64,
    pub failed_tasks: Vec<FailedTask>,
}

/// The three derived summary views, a pure function of one `RunResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Region → totals
    pub region_summary: BTreeMap<String, RegionStats>,
    /// Service → total across all regions
    pub service_counts: BTreeMap<String, ServiceTotal>,
    /// Region → service → cell, covering the full planned grid
    pub usage_matrix: BTreeMap<String, BTreeMap<String, UsageCell>>,
}

/// Compute all summary views from a complete run
///
/// Fails with [`AuditError`] if the outcomes do not line up with the
/// planned grid — a structural bug that must abort the run rather than
/// produce a report with silently missing cells.
pub fn aggregate(run: &RunResult) -> Result<Summary> {
    let indexed = index_outcomes(run)?;

    let mut usage_matrix: BTreeMap<String, BTreeMap<String, UsageCell>> = BTreeMap::new();
    let mut region_summary: BTreeMap<String, RegionStats> = BTreeMap::new();
    let mut service_sums: BTreeMap<String, u64> = BTreeMap::new();
    let mut service_ok: BTreeMap<String, bool> = BTreeMap::new();

    for region in &run.regions {
        let row = usage_matrix.entry(region.clone()).or_default();
        let stats = region_summary.entry(region.clone()).or_default();

        for service in &run.services {
            let task = AuditTask::new(region.clone(), service.clone());
            let outcome = indexed
                .get(&task)
                .ok_or_else(|| AuditError::MissingCell { task: task.clone() })?;

            let cell = match &outcome.status {
                TaskStatus::Ok { records } => {
                    let count = records.len() as u64;
                    stats.resources += count;
                    *service_sums.entry(service.clone()).or_insert(0) += count;
                    service_ok.insert(service.clone(), true);
                    UsageCell::Count(count)
                }
                TaskStatus::Failed { kind, .. } => {
                    stats.failed_tasks.push(FailedTask {
                        service: service.clone(),
                        kind: *kind,
                    });
                    service_ok.entry(service.clone()).or_insert(false);
                    UsageCell::Unavailable(*kind)
                }
            };
            row.insert(service.clone(), cell);
        }
    }

    let service_counts = run
        .services
        .iter()
        .map(|service| {
            let total = match service_ok.get(service) {
                // No task for this service ever ran (empty region axis)
                // or at least one succeeded: report the summed count.
                Some(true) | None => {
                    ServiceTotal::Count(service_sums.get(service).copied().unwrap_or(0))
                }
                Some(false) => ServiceTotal::Unavailable,
            };
            (service.clone(), total)
        })
        .collect();

    Ok(Summary {
        region_summary,
        service_counts,
        usage_matrix,
    })
}

/// Index outcomes by task identity, rejecting anything outside the grid
fn index_outcomes(run: &RunResult) -> Result<BTreeMap<AuditTask, &TaskOutcome>> {
    let expected = run.regions.len() * run.services.len();
    if run.outcomes.len() != expected {
        return Err(AuditError::OutcomeCountMismatch {
            expected,
            actual: run.outcomes.len(),
        });
    }

    let mut indexed = BTreeMap::new();
    for outcome in &run.outcomes {
        let task = outcome.task();
        if !run.regions.contains(&task.region) || !run.services.contains(&task.service) {
            return Err(AuditError::UnplannedOutcome { task });
        }
        if indexed.insert(task.clone(), outcome).is_some() {
            return Err(AuditError::DuplicateOutcome { task });
        }
    }
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skyaudit_probe::ResourceRecord;

    fn records(n: usize) -> Vec<ResourceRecord> {
        (0..n)
            .map(|i| ResourceRecord::new("fixture", format!("r-{}", i)))
            .collect()
    }

    /// The two-region / two-service scenario: ec2 in us-west-2 errors,
    /// the other three tasks succeed with 3, 0 and 5 resources.
    fn scenario_run() -> RunResult {
        let now = Utc::now();
        RunResult {
            regions: vec!["us-east-1".into(), "us-west-2".into()],
            services: vec!["ec2".into(), "rds".into()],
            outcomes: vec![
                TaskOutcome::ok(AuditTask::new("us-east-1", "ec2"), records(3)),
                TaskOutcome::ok(AuditTask::new("us-east-1", "rds"), records(0)),
                TaskOutcome::failed(
                    AuditTask::new("us-west-2", "ec2"),
                    FailureKind::ServiceUnavailable,
                    "ec2 not enabled in us-west-2",
                ),
                TaskOutcome::ok(AuditTask::new("us-west-2", "rds"), records(5)),
            ],
            issues: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_scenario_summary_views() {
        let summary = aggregate(&scenario_run()).unwrap();

        // ServiceCounts: the errored cell is marked, not summed as zero
        assert_eq!(summary.service_counts["ec2"], ServiceTotal::Count(3));
        assert_eq!(summary.service_counts["rds"], ServiceTotal::Count(5));

        // RegionSummary
        assert_eq!(summary.region_summary["us-east-1"].resources, 3);
        assert_eq!(summary.region_summary["us-west-2"].resources, 5);
        assert_eq!(
            summary.region_summary["us-west-2"].failed_tasks,
            vec![FailedTask {
                service: "ec2".into(),
                kind: FailureKind::ServiceUnavailable,
            }]
        );

        // UsageMatrix: full grid with exactly one unavailable cell
        assert_eq!(
            summary.usage_matrix["us-east-1"]["ec2"],
            UsageCell::Count(3)
        );
        assert_eq!(
            summary.usage_matrix["us-east-1"]["rds"],
            UsageCell::Count(0)
        );
        assert_eq!(
            summary.usage_matrix["us-west-2"]["ec2"],
            UsageCell::Unavailable(FailureKind::ServiceUnavailable)
        );
        assert_eq!(
            summary.usage_matrix["us-west-2"]["rds"],
            UsageCell::Count(5)
        );
    }

    #[test]
    fn test_cross_check_invariants() {
        let run = scenario_run();
        let summary = aggregate(&run).unwrap();

        for service in &run.services {
            let column_sum: u64 = summary
                .usage_matrix
                .values()
                .filter_map(|row| match row[service] {
                    UsageCell::Count(n) => Some(n),
                    UsageCell::Unavailable(_) => None,
                })
                .sum();
            match summary.service_counts[service] {
                ServiceTotal::Count(total) => assert_eq!(total, column_sum),
                ServiceTotal::Unavailable => unreachable!("scenario has no all-error service"),
            }
        }

        for region in &run.regions {
            let row_sum: u64 = summary.usage_matrix[region]
                .values()
                .filter_map(|cell| match cell {
                    UsageCell::Count(n) => Some(*n),
                    UsageCell::Unavailable(_) => None,
                })
                .sum();
            assert_eq!(summary.region_summary[region].resources, row_sum);
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let run = scenario_run();
        assert_eq!(aggregate(&run).unwrap(), aggregate(&run).unwrap());
    }

    #[test]
    fn test_all_error_service_is_unavailable_not_zero() {
        let now = Utc::now();
        let run = RunResult {
            regions: vec!["us-east-1".into(), "us-west-2".into()],
            services: vec!["ec2".into()],
            outcomes: vec![
                TaskOutcome::failed(
                    AuditTask::new("us-east-1", "ec2"),
                    FailureKind::AuthorizationDenied,
                    "denied",
                ),
                TaskOutcome::failed(
                    AuditTask::new("us-west-2", "ec2"),
                    FailureKind::Transient,
                    "timeout",
                ),
            ],
            issues: Vec::new(),
            started_at: now,
            finished_at: now,
        };

        let summary = aggregate(&run).unwrap();
        assert_eq!(summary.service_counts["ec2"], ServiceTotal::Unavailable);
    }

    #[test]
    fn test_empty_success_is_a_real_zero() {
        let now = Utc::now();
        let run = RunResult {
            regions: vec!["us-east-1".into()],
            services: vec!["rds".into()],
            outcomes: vec![TaskOutcome::ok(AuditTask::new("us-east-1", "rds"), records(0))],
            issues: Vec::new(),
            started_at: now,
            finished_at: now,
        };
        let summary = aggregate(&run).unwrap();
        assert_eq!(summary.service_counts["rds"], ServiceTotal::Count(0));
        assert_eq!(summary.usage_matrix["us-east-1"]["rds"], UsageCell::Count(0));
    }

    #[test]
    fn test_unplanned_outcome_fails_loudly() {
        let mut run = scenario_run();
        run.outcomes.pop();
        run.outcomes.push(TaskOutcome::ok(
            AuditTask::new("eu-west-1", "ec2"),
            records(1),
        ));

        let err = aggregate(&run).unwrap_err();
        assert!(matches!(err, AuditError::UnplannedOutcome { .. }));
    }

    #[test]
    fn test_missing_outcome_fails_loudly() {
        let mut run = scenario_run();
        run.outcomes.pop();

        let err = aggregate(&run).unwrap_err();
        assert!(matches!(err, AuditError::OutcomeCountMismatch { .. }));
    }

    #[test]
    fn test_duplicate_outcome_fails_loudly() {
        let mut run = scenario_run();
        run.outcomes.pop();
        run.outcomes.push(run.outcomes[0].clone());

        let err = aggregate(&run).unwrap_err();
        assert!(matches!(err, AuditError::DuplicateOutcome { .. }));
    }
}
