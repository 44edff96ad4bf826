//! The admission + retry pipeline around a completion driver.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};
use vermeer_core::{CompletionRequest, CompletionResponse};
use vermeer_error::{ClientError, UpstreamError, VermeerResult};
use vermeer_interface::{CallObserver, CompletionDriver, NoopObserver};
use vermeer_rate_limit::{BudgetPolicy, RetryPolicy, SlidingWindowRateLimiter};

/// Failure of a single attempt, before terminal classification.
#[derive(Debug, Clone)]
enum AttemptError {
    /// Bounded admission wait expired
    Admission(Duration),
    /// The external call failed
    Upstream(UpstreamError),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Admission(waited) => {
                write!(f, "admission wait timed out after {:?}", waited)
            }
            AttemptError::Upstream(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AttemptError {}

// `Retry::spawn_notify` takes a plain fn pointer, so this cannot touch
// client state; observer notification happens in the attempt closure.
fn log_backoff(error: &AttemptError, delay: Duration) {
    warn!(%error, ?delay, "attempt failed, backing off before retry");
}

/// A completion client that survives quota pressure and transient failures.
///
/// Owns one driver, one target model, one sliding-window rate limiter, and
/// one retry policy. The limiter capacity is resolved at construction:
/// an explicit [`with_rpm`](Self::with_rpm) override wins, otherwise the
/// budget policy decides from the model identifier. The window is fixed at
/// 60 seconds; rpm budgets are defined against exactly that span.
///
/// One instance is meant to be shared by many concurrent callers (wrap it
/// in an `Arc` or clone the driver side as needed); the admission window
/// is the only state shared between calls.
///
/// # Examples
///
/// ```no_run
/// use vermeer_models::{OpenAiClient, ResilientClient};
/// use vermeer_core::{CompletionRequest, Message};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = OpenAiClient::from_env()?;
/// let client = ResilientClient::new(driver, "gpt-4");
///
/// let request = CompletionRequest::builder()
///     .messages(vec![Message::user("Write a short poem about rust.")])
///     .max_tokens(100u32)
///     .build()?;
///
/// let response = client.complete(&request).await?;
/// println!("{}", response.first_text().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct ResilientClient<D> {
    driver: D,
    model: String,
    limiter: SlidingWindowRateLimiter,
    retry: RetryPolicy,
    admission_timeout: Option<Duration>,
    observer: Arc<dyn CallObserver>,
}

impl<D: CompletionDriver> ResilientClient<D> {
    /// Create a client with the default budget table and retry policy.
    pub fn new(driver: D, model: impl Into<String>) -> Self {
        Self::with_policy(driver, model, &BudgetPolicy::default())
    }

    /// Create a client resolving its request budget from `policy`.
    pub fn with_policy(driver: D, model: impl Into<String>, policy: &BudgetPolicy) -> Self {
        let model = model.into();
        let rpm = policy.resolve(&model);
        debug!(model, rpm, "creating resilient client");
        Self {
            driver,
            model,
            limiter: SlidingWindowRateLimiter::per_minute(rpm),
            retry: RetryPolicy::default(),
            admission_timeout: None,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Override the requests-per-minute budget, bypassing policy resolution.
    ///
    /// Replaces the limiter, so any admissions already recorded are
    /// forgotten; call this at construction time, not mid-flight.
    pub fn with_rpm(mut self, rpm: u32) -> Self {
        self.limiter = SlidingWindowRateLimiter::per_minute(rpm);
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Bound the admission wait. Off by default (waits indefinitely).
    ///
    /// When the bound expires the call fails with
    /// [`ClientErrorKind::AdmissionTimeout`](vermeer_error::ClientErrorKind)
    /// and is not retried.
    pub fn with_admission_timeout(mut self, timeout: Duration) -> Self {
        self.admission_timeout = Some(timeout);
        self
    }

    /// Inject an observer for attempt lifecycle events.
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The target model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The effective requests-per-minute budget.
    pub fn rpm(&self) -> u32 {
        self.limiter.capacity()
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Acquire a rate-limit slot, honoring the configured admission bound.
    async fn admit(&self) -> Result<(), AttemptError> {
        match self.admission_timeout {
            None => {
                self.limiter.acquire().await;
                Ok(())
            }
            Some(limit) => match tokio::time::timeout(limit, self.limiter.acquire()).await {
                Ok(()) => Ok(()),
                Err(_) => {
                    warn!(model = %self.model, ?limit, "admission wait timed out");
                    Err(AttemptError::Admission(limit))
                }
            },
        }
    }

    /// Issue a completion call with admission control and bounded retries.
    ///
    /// Every attempt, including each retry, acquires a rate-limit slot
    /// before invoking the driver; a retry is not exempt from admission
    /// control. On success the driver's response is returned
    /// verbatim. On failure the retry policy decides: retryable failures
    /// are re-attempted after a deterministic backoff until attempts are
    /// exhausted (surfaced as `RetriesExhausted` carrying the last
    /// failure); non-retryable failures propagate immediately.
    ///
    /// Intermediate failures are reported to the observer and traced, but
    /// only the terminal outcome reaches the caller.
    #[instrument(skip(self, request), fields(model = %self.model))]
    pub async fn complete(&self, request: &CompletionRequest) -> VermeerResult<CompletionResponse> {
        let attempts = AtomicUsize::new(0);

        let result = Retry::spawn_notify(
            self.retry.backoff_schedule(),
            || async {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                self.observer.on_attempt(attempt);
                debug!(attempt, "starting completion attempt");

                self.admit().await.map_err(RetryError::Permanent)?;

                match self.driver.complete(&self.model, request).await {
                    Ok(response) => {
                        debug!(attempt, "completion succeeded");
                        self.observer.on_success(attempt);
                        Ok(response)
                    }
                    Err(e) if self.retry.is_retryable(&e) => {
                        // Notify only when a retry will actually follow.
                        if attempt < self.retry.max_attempts() {
                            self.observer.on_retry(&e, self.retry.delay_before(attempt + 1));
                        }
                        Err(RetryError::Transient {
                            err: AttemptError::Upstream(e),
                            retry_after: None,
                        })
                    }
                    Err(e) => Err(RetryError::Permanent(AttemptError::Upstream(e))),
                }
            },
            log_backoff,
        )
        .await;

        match result {
            Ok(response) => Ok(response),
            Err(AttemptError::Admission(waited)) => {
                Err(ClientError::admission_timeout(waited).into())
            }
            Err(AttemptError::Upstream(last)) => {
                let made = attempts.load(Ordering::SeqCst);
                if made >= self.retry.max_attempts() && self.retry.is_retryable(&last) {
                    warn!(attempts = made, error = %last, "retries exhausted");
                    Err(ClientError::exhausted(made, last).into())
                } else {
                    warn!(error = %last, "permanent upstream failure");
                    Err(ClientError::upstream(last).into())
                }
            }
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for ResilientClient<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("driver", &self.driver)
            .field("model", &self.model)
            .field("rpm", &self.limiter.capacity())
            .field("retry", &self.retry)
            .field("admission_timeout", &self.admission_timeout)
            .finish_non_exhaustive()
    }
}
