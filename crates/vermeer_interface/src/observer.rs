//! Caller-injected observation of attempt lifecycle events.

use std::time::Duration;
use vermeer_error::UpstreamError;

/// Observer for the attempt lifecycle of a single `complete` call.
///
/// The client reports every attempt and retry decision here in addition to
/// emitting `tracing` events. Supplying an observer is how callers get
/// structured visibility without the client depending on any globally
/// configured logging subsystem.
///
/// All methods have no-op defaults; implement only what you need.
///
/// # Examples
///
/// ```
/// use vermeer_interface::CallObserver;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct RetryCounter(AtomicUsize);
///
/// impl CallObserver for RetryCounter {
///     fn on_retry(&self, _error: &vermeer_error::UpstreamError, _delay: std::time::Duration) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait CallObserver: Send + Sync {
    /// An attempt is starting. `attempt` counts from 1.
    fn on_attempt(&self, attempt: usize) {
        let _ = attempt;
    }

    /// An attempt failed with a retryable error; the client will sleep for
    /// `delay` and try again.
    fn on_retry(&self, error: &UpstreamError, delay: Duration) {
        let _ = (error, delay);
    }

    /// The call finished successfully on attempt `attempt`.
    fn on_success(&self, attempt: usize) {
        let _ = attempt;
    }
}

/// Observer that ignores every event. The client default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {}
