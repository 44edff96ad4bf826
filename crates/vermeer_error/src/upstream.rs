//! Upstream completion API error types and retry classification.

/// Upstream-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Transport-level failure (connection, timeout, TLS)
    #[display("completion request failed: {}", _0)]
    Http(String),
    /// API returned a non-success status code
    #[display("completion API returned HTTP {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by the API
        message: String,
    },
    /// Response body could not be deserialized
    #[display("failed to parse completion response: {}", _0)]
    Parse(String),
}

impl UpstreamErrorKind {
    /// Check if this error type is transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            UpstreamErrorKind::Http(_) => true,
            _ => false,
        }
    }
}

/// Upstream error with source location tracking.
///
/// Represents a failure of the external completion call, whatever the
/// transport. The resilient client wraps these into [`crate::ClientError`]
/// once retries are exhausted.
///
/// # Examples
///
/// ```
/// use vermeer_error::{UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(UpstreamErrorKind::Api {
///     status: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Transport-level failure.
    #[track_caller]
    pub fn http(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Http(message.into()))
    }

    /// Non-success status returned by the API.
    #[track_caller]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Api {
            status,
            message: message.into(),
        })
    }

    /// Malformed response body.
    #[track_caller]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(UpstreamErrorKind::Parse(message.into()))
    }
}

/// Trait for errors that support retry classification.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit), or
/// network timeouts should return true. Permanent errors like 401
/// (unauthorized) or 400 (bad request) should return false.
///
/// # Examples
///
/// ```
/// use vermeer_error::{RetryableError, UpstreamError};
///
/// assert!(UpstreamError::api(503, "overloaded").is_retryable());
/// assert!(!UpstreamError::api(400, "bad request").is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for UpstreamError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
