//! Shared SDK plumbing: per-region config and error classification

use aws_config::{Region, SdkConfig};
use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use skyaudit_probe::ProbeError;

/// Derive a region-scoped config from the shared base config
pub(crate) fn region_config(base: &SdkConfig, region: &str) -> SdkConfig {
    base.to_builder()
        .region(Region::new(region.to_string()))
        .build()
}

/// Map an SDK failure into the probe error taxonomy
///
/// Dispatch and timeout failures never reached the service and are
/// retryable; service errors are classified by their error code.
pub(crate) fn classify_sdk_error<E, R>(call: &str, err: SdkError<E, R>) -> ProbeError
where
    E: ProvideErrorMetadata,
{
    match &err {
        SdkError::TimeoutError(_) => ProbeError::Transient(format!("{}: request timed out", call)),
        SdkError::DispatchFailure(_) => {
            ProbeError::Transient(format!("{}: connection failed", call))
        }
        SdkError::ServiceError(ctx) => {
            let meta = ctx.err().meta();
            let message = format!(
                "{}: {}",
                call,
                meta.message().unwrap_or("service returned an error")
            );
            probe_error_for_code(meta.code(), message)
        }
        _ => ProbeError::Unknown(format!("{}: unexpected SDK failure", call)),
    }
}

/// Classify an AWS error code into the probe taxonomy
pub(crate) fn probe_error_for_code(code: Option<&str>, message: String) -> ProbeError {
    match code {
        Some(
            "AccessDenied"
            | "AccessDeniedException"
            | "UnauthorizedOperation"
            | "AuthFailure"
            | "UnrecognizedClientException",
        ) => ProbeError::AuthorizationDenied(message),
        Some("OptInRequired" | "InvalidClientTokenId" | "UnsupportedOperation") => {
            ProbeError::ServiceUnavailable(message)
        }
        Some(
            "Throttling"
            | "ThrottlingException"
            | "RequestLimitExceeded"
            | "RequestTimeout"
            | "ServiceUnavailable"
            | "SlowDown",
        ) => ProbeError::Transient(message),
        _ => ProbeError::Unknown(message),
    }
}
