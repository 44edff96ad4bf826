//! Errors surfaced by the resilient completion client.

use crate::UpstreamError;
use std::time::Duration;

/// Terminal failure modes of a `complete` call.
///
/// Intermediate attempt failures are retried internally and never surface
/// individually; callers only see one of these.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ClientErrorKind {
    /// A rate-limit slot could not be acquired within the configured wait.
    #[display("admission wait timed out after {_0:?}")]
    AdmissionTimeout(Duration),
    /// The upstream call failed with a non-retryable error.
    #[display("upstream call failed: {}", _0)]
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// All attempts failed; carries the last upstream failure for diagnostics.
    #[display("retries exhausted after {} attempts: {}", attempts, last)]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: usize,
        /// The failure observed on the final attempt
        last: UpstreamError,
    },
}

/// Client error with source location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{ClientError, UpstreamError};
///
/// let err = ClientError::exhausted(3, UpstreamError::api(503, "overloaded"));
/// assert!(format!("{}", err).contains("3 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display)]
#[display("Client Error: {} at line {} in {}", kind, line, file)]
pub struct ClientError {
    /// The kind of error that occurred
    pub kind: ClientErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Bounded admission wait expired before a slot freed.
    #[track_caller]
    pub fn admission_timeout(waited: Duration) -> Self {
        Self::new(ClientErrorKind::AdmissionTimeout(waited))
    }

    /// Non-retryable upstream failure, propagated on first occurrence.
    #[track_caller]
    pub fn upstream(error: UpstreamError) -> Self {
        Self::new(ClientErrorKind::Upstream(error))
    }

    /// All attempts consumed; `last` is the final attempt's failure.
    #[track_caller]
    pub fn exhausted(attempts: usize, last: UpstreamError) -> Self {
        Self::new(ClientErrorKind::RetriesExhausted { attempts, last })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ClientErrorKind {
        &self.kind
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ClientErrorKind::Upstream(e) => Some(e),
            ClientErrorKind::RetriesExhausted { last, .. } => Some(last),
            ClientErrorKind::AdmissionTimeout(_) => None,
        }
    }
}
