//! Run data model
//!
//! Everything in this module is scoped to a single run: tasks are created
//! by the planner, outcomes are produced exactly once per task by the
//! scheduler, and the `RunResult` hands the whole set to the aggregator by
//! value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyaudit_probe::{ProbeError, ResourceRecord};

/// One (region, service) unit of audit work
///
/// The pair is the task's identity; it is unique within a run by
/// construction. `Ord` is region-major so sorted task collections match
/// the planner's dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuditTask {
    pub region: String,
    pub service: String,
}

impl AuditTask {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }
}

impl std::fmt::Display for AuditTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.region, self.service)
    }
}

/// Why a task failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Credentials lack permission for the probe's API call
    AuthorizationDenied,
    /// The service's API does not exist or is not enabled in the region
    ServiceUnavailable,
    /// Network/timeout trouble; safe to retry at a higher layer
    Transient,
    /// The run deadline passed while the task was still in flight
    TimedOut,
    /// Anything else; the outcome message retains the diagnostics
    Unknown,
}

impl From<&ProbeError> for FailureKind {
    fn from(err: &ProbeError) -> Self {
        match err {
            ProbeError::AuthorizationDenied(_) => FailureKind::AuthorizationDenied,
            ProbeError::ServiceUnavailable(_) => FailureKind::ServiceUnavailable,
            ProbeError::Transient(_) => FailureKind::Transient,
            ProbeError::Unknown(_) => FailureKind::Unknown,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::AuthorizationDenied => write!(f, "authorization denied"),
            FailureKind::ServiceUnavailable => write!(f, "service unavailable"),
            FailureKind::Transient => write!(f, "transient failure"),
            FailureKind::TimedOut => write!(f, "timed out"),
            FailureKind::Unknown => write!(f, "unknown failure"),
        }
    }
}

/// Terminal result of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// The probe ran to completion; zero records is a valid success
    Ok { records: Vec<ResourceRecord> },
    /// The probe failed; the error is data, not a thrown exception
    Failed { kind: FailureKind, message: String },
}

/// Outcome of executing one task, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub region: String,
    pub service: String,
    #[serde(flatten)]
    pub status: TaskStatus,
}

impl TaskOutcome {
    pub fn ok(task: AuditTask, records: Vec<ResourceRecord>) -> Self {
        Self {
            region: task.region,
            service: task.service,
            status: TaskStatus::Ok { records },
        }
    }

    pub fn failed(task: AuditTask, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            region: task.region,
            service: task.service,
            status: TaskStatus::Failed {
                kind,
                message: message.into(),
            },
        }
    }

    pub fn from_probe_error(task: AuditTask, err: &ProbeError) -> Self {
        Self::failed(task, FailureKind::from(err), err.to_string())
    }

    /// The task identity this outcome belongs to
    pub fn task(&self) -> AuditTask {
        AuditTask::new(self.region.clone(), self.service.clone())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, TaskStatus::Ok { .. })
    }

    /// Number of records for a successful outcome
    pub fn record_count(&self) -> Option<usize> {
        match &self.status {
            TaskStatus::Ok { records } => Some(records.len()),
            TaskStatus::Failed { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            TaskStatus::Ok { .. } => None,
            TaskStatus::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Kind of planning-time selection problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Explicitly requested region not in the catalog; no tasks generated
    UnknownRegion,
    /// Explicitly requested service not in the registry; no tasks generated
    UnknownService,
    /// Region outside the catalog, admitted because the catalog is permissive
    UnverifiedRegion,
}

/// Structured planning-time error attached to the run
///
/// Invalid selection entries are reported here and dropped; the valid
/// remainder of the selection is still audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionIssue {
    pub kind: IssueKind,
    pub name: String,
    pub message: String,
}

impl SelectionIssue {
    pub fn new(kind: IssueKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Complete result set of one run
///
/// Carries the resolved grid alongside the outcomes so the aggregator can
/// cover zero and error cells and detect outcomes that do not belong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Resolved regions, alphabetical
    pub regions: Vec<String>,
    /// Resolved services, alphabetical
    pub services: Vec<String>,
    /// One outcome per dispatched task, in task order
    pub outcomes: Vec<TaskOutcome>,
    /// Planning-time selection issues
    pub issues: Vec<SelectionIssue>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    pub fn task_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    /// Total records across all successful outcomes
    pub fn resource_count(&self) -> usize {
        self.outcomes.iter().filter_map(|o| o.record_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_ordering_is_region_major() {
        let mut tasks = vec![
            AuditTask::new("us-west-2", "ec2"),
            AuditTask::new("us-east-1", "rds"),
            AuditTask::new("us-east-1", "ec2"),
        ];
        tasks.sort();
        assert_eq!(tasks[0], AuditTask::new("us-east-1", "ec2"));
        assert_eq!(tasks[1], AuditTask::new("us-east-1", "rds"));
        assert_eq!(tasks[2], AuditTask::new("us-west-2", "ec2"));
    }

    #[test]
    fn test_outcome_from_probe_error() {
        let err = ProbeError::AuthorizationDenied("DescribeInstances".to_string());
        let outcome = TaskOutcome::from_probe_error(AuditTask::new("us-east-1", "ec2"), &err);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::AuthorizationDenied));
        assert!(!outcome.is_ok());
        assert_eq!(outcome.record_count(), None);
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let outcome = TaskOutcome::failed(
            AuditTask::new("us-east-1", "ec2"),
            FailureKind::Transient,
            "connect timeout",
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "transient");
        assert_eq!(json["region"], "us-east-1");
    }
}
