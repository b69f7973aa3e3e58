//! Probe error taxonomy
//!
//! These errors are task-scoped: the scheduler captures them into the
//! outcome for the failing (region, service) pair and keeps going. They
//! are `Clone` because they end up stored as run data, not just thrown.

use thiserror::Error;

/// Errors a probe can report for a single (region, service) invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Credentials lack permission for the probe's API call
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    /// The probe's target API does not exist or is not enabled in the region
    #[error("service unavailable in region: {0}")]
    ServiceUnavailable(String),

    /// Network-level or timeout failure; safe to retry at a higher layer
    #[error("transient failure: {0}")]
    Transient(String),

    /// Catch-all; retains the underlying message for diagnostics
    #[error("probe failure: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
