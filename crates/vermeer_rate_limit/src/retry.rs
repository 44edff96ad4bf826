//! Retry policy: bounded exponential backoff plus failure classification.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use vermeer_error::{RetryableError, UpstreamError};

type Predicate = Arc<dyn Fn(&UpstreamError) -> bool + Send + Sync>;

/// Describes how a `complete` call retries.
///
/// `max_attempts` counts every attempt including the first; the delay
/// before attempt `n` (n ≥ 2) is `1s * 2^(n-2)` clamped to
/// `[min_wait, max_wait]`. The schedule carries no jitter, so a given
/// failure sequence always produces the same timing.
///
/// The predicate decides whether a given upstream failure is retried.
/// The default retries **everything**, including failures that are clearly
/// non-transient (malformed requests, auth errors). That looseness is
/// deliberate and preserved; use [`transient_only`](Self::transient_only)
/// for status-code-based classification.
///
/// # Examples
///
/// ```
/// use vermeer_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.delay_before(2), Duration::from_secs(4));
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: usize,
    min_wait: Duration,
    max_wait: Duration,
    predicate: Predicate,
}

impl Default for RetryPolicy {
    /// Three attempts, backoff clamped to 4–10 seconds, everything retried.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(4), Duration::from_secs(10))
    }
}

impl RetryPolicy {
    /// Create a policy retrying every failure kind.
    ///
    /// `max_attempts` below 1 is coerced to 1 (the first attempt always
    /// runs), and `max_wait` is raised to `min_wait` if the bounds cross.
    pub fn new(max_attempts: usize, min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_wait,
            max_wait: max_wait.max(min_wait),
            predicate: Arc::new(|_| true),
        }
    }

    /// Replace the retry predicate.
    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&UpstreamError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Retry only failures classified transient by [`RetryableError`]
    /// (429, 5xx, transport errors).
    pub fn transient_only(self) -> Self {
        self.with_predicate(|e| e.is_retryable())
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Whether this policy retries the given failure.
    pub fn is_retryable(&self, error: &UpstreamError) -> bool {
        (self.predicate)(error)
    }

    /// Delay inserted before attempt `attempt` (≥ 2).
    pub fn delay_before(&self, attempt: usize) -> Duration {
        debug_assert!(attempt >= 2);
        let exponent = (attempt - 2).min(62) as u32;
        let raw = Duration::from_secs(1u64 << exponent);
        raw.clamp(self.min_wait, self.max_wait)
    }

    /// The full backoff schedule: one delay per retry, `max_attempts - 1`
    /// entries. This is what drives the retry executor.
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        (2..=self.max_attempts)
            .map(|attempt| self.delay_before(attempt))
            .collect()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("min_wait", &self.min_wait)
            .field("max_wait", &self.max_wait)
            .finish_non_exhaustive()
    }
}
