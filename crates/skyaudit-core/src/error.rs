//! Fatal engine errors
//!
//! Probe failures are run data, not errors (see [`crate::task`]). The
//! variants here all indicate a structural bug — a lost, duplicated or
//! unplanned outcome — and abort the run rather than let a silently-wrong
//! report be written.

use crate::task::AuditTask;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("duplicate outcome for task {task}")]
    DuplicateOutcome { task: AuditTask },

    #[error("collected {actual} outcomes for {expected} dispatched tasks")]
    OutcomeCountMismatch { expected: usize, actual: usize },

    #[error("outcome for task {task} which is not in the planned grid")]
    UnplannedOutcome { task: AuditTask },

    #[error("no outcome for planned task {task}")]
    MissingCell { task: AuditTask },

    #[error("aggregation integrity error: {0}")]
    Integrity(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
