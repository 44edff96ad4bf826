//! Sliding-window rate limiter.
//!
//! Bounds the number of admissions granted within a trailing time window.
//! Unlike a fixed-bucket counter that resets at clock boundaries, a sliding
//! window cannot be bursted at a boundary: `capacity` grants at second 59
//! followed by `capacity` more at second 61 would exceed the true
//! per-minute rate, and this limiter refuses the second burst.
//!
//! The implementation keeps a timestamp log of recent grants behind a
//! single mutex. Prune cost is O(capacity) per call, which is fine for
//! realistic API quotas (hundreds to low thousands per minute).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::trace;

/// Poll interval while waiting for a slot to free.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Thread-safe sliding-window admission gate.
///
/// Cloning is cheap and shares the same window: a client clones its
/// limiter into however many tasks call it concurrently.
///
/// # Examples
///
/// ```
/// use vermeer_rate_limit::SlidingWindowRateLimiter;
/// use std::time::Duration;
///
/// let limiter = SlidingWindowRateLimiter::new(2, Duration::from_secs(60));
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindowRateLimiter {
    capacity: usize,
    window: Duration,
    admissions: Arc<Mutex<VecDeque<Instant>>>,
}

impl SlidingWindowRateLimiter {
    /// Create a limiter granting at most `capacity` admissions per `window`.
    ///
    /// A zero capacity is coerced to 1; a limiter that can never admit
    /// would deadlock every caller.
    pub fn new(capacity: u32, window: Duration) -> Self {
        let capacity = capacity.max(1) as usize;
        Self {
            capacity,
            window,
            admissions: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    /// Create a limiter with the canonical 60-second window.
    ///
    /// Requests-per-minute budgets are defined against exactly 60 seconds.
    pub fn per_minute(rpm: u32) -> Self {
        Self::new(rpm, Duration::from_secs(60))
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> u32 {
        self.capacity as u32
    }

    /// The trailing window duration.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Try to acquire an admission without waiting.
    ///
    /// Atomically prunes grants older than the window, then appends the
    /// current instant and returns true iff the remaining count is below
    /// capacity. A denial mutates nothing.
    pub fn try_acquire(&self) -> bool {
        let mut admissions = self
            .admissions
            .lock()
            .expect("rate limiter mutex poisoned");
        let now = Instant::now();

        while let Some(oldest) = admissions.front() {
            if now.duration_since(*oldest) > self.window {
                admissions.pop_front();
            } else {
                break;
            }
        }

        if admissions.len() < self.capacity {
            admissions.push_back(now);
            true
        } else {
            false
        }
    }

    /// Wait until an admission is granted.
    ///
    /// Polls [`try_acquire`](Self::try_acquire) with a short sleep between
    /// attempts. There is no upper bound on the total wait; callers wanting
    /// one should wrap this in `tokio::time::timeout`. Dropping the future
    /// (timeout, shutdown) interrupts the wait cleanly: the sleep is the
    /// only suspension point and a denied poll holds no state.
    ///
    /// Admission order among concurrently blocked callers is unordered:
    /// whoever polls first after a slot frees wins.
    pub async fn acquire(&self) {
        loop {
            if self.try_acquire() {
                return;
            }
            trace!(
                capacity = self.capacity,
                window_secs = self.window.as_secs_f64(),
                "window full, waiting for a slot"
            );
            sleep(POLL_INTERVAL).await;
        }
    }
}
