//! Tests for the resilient client pipeline.
//!
//! Backoff-heavy tests run on a paused tokio clock so the multi-second
//! delays elapse instantly while remaining deterministic.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vermeer_core::{Choice, CompletionRequest, CompletionResponse, Message};
use vermeer_error::{ClientErrorKind, UpstreamError, VermeerError, VermeerErrorKind};
use vermeer_interface::{CallObserver, CompletionDriver};
use vermeer_models::ResilientClient;
use vermeer_rate_limit::{BudgetPolicy, RetryPolicy};

/// Driver that replays a scripted sequence of outcomes and counts calls.
struct ScriptedDriver {
    script: Mutex<Vec<Result<CompletionResponse, UpstreamError>>>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    fn new(script: Vec<Result<CompletionResponse, UpstreamError>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionDriver for ScriptedDriver {
    async fn complete(
        &self,
        _model: &str,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script mutex poisoned")
            .remove(0)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

fn ok_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        id: None,
        model: None,
        choices: vec![Choice {
            index: 0,
            message: Message::assistant(text),
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

fn request() -> CompletionRequest {
    CompletionRequest::from_messages(vec![Message::user("hello")])
}

fn client_kind(err: &VermeerError) -> &ClientErrorKind {
    match err.kind() {
        VermeerErrorKind::Client(client) => client.kind(),
        other => panic!("expected client error, got {:?}", other),
    }
}

#[derive(Default)]
struct CountingObserver {
    attempts: AtomicUsize,
    retries: AtomicUsize,
    successes: AtomicUsize,
}

impl CallObserver for CountingObserver {
    fn on_attempt(&self, _attempt: usize) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_retry(&self, _error: &UpstreamError, _delay: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: usize) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn success_on_first_attempt_makes_one_call() {
    let client = ResilientClient::new(ScriptedDriver::new(vec![Ok(ok_response("hi"))]), "gpt-4");

    let response = client.complete(&request()).await.expect("should succeed");
    assert_eq!(response.first_text(), Some("hi"));
    assert_eq!(client.driver().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failures_then_success_uses_exactly_three_calls() {
    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(503, "overloaded")),
        Err(UpstreamError::api(503, "overloaded")),
        Ok(ok_response("finally")),
    ]);
    let client = ResilientClient::new(driver, "gpt-4");

    let response = client.complete(&request()).await.expect("should succeed");
    assert_eq!(response.first_text(), Some("finally"));
    assert_eq!(client.driver().calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn all_failures_surface_retries_exhausted() {
    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(503, "one")),
        Err(UpstreamError::api(503, "two")),
        Err(UpstreamError::api(503, "three")),
    ]);
    let client = ResilientClient::new(driver, "gpt-4");

    let err = client.complete(&request()).await.expect_err("should fail");
    match client_kind(&err) {
        ClientErrorKind::RetriesExhausted { attempts, last } => {
            assert_eq!(*attempts, 3);
            // Only the final attempt's failure is carried out.
            assert!(format!("{}", last).contains("three"));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
    assert_eq!(client.driver().calls(), 3);
}

#[tokio::test]
async fn non_retryable_failure_propagates_after_one_call() {
    let driver = ScriptedDriver::new(vec![Err(UpstreamError::api(400, "malformed"))]);
    let client = ResilientClient::new(driver, "gpt-4")
        .with_retry_policy(RetryPolicy::default().transient_only());

    let err = client.complete(&request()).await.expect_err("should fail");
    match client_kind(&err) {
        ClientErrorKind::Upstream(upstream) => {
            assert!(format!("{}", upstream).contains("malformed"));
        }
        other => panic!("expected Upstream, got {:?}", other),
    }
    assert_eq!(client.driver().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn default_predicate_retries_even_malformed_requests() {
    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(400, "malformed")),
        Err(UpstreamError::api(400, "malformed")),
        Err(UpstreamError::api(400, "malformed")),
    ]);
    let client = ResilientClient::new(driver, "gpt-4");

    let err = client.complete(&request()).await.expect_err("should fail");
    assert!(matches!(
        client_kind(&err),
        ClientErrorKind::RetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(client.driver().calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_policy_never_retries() {
    let driver = ScriptedDriver::new(vec![Err(UpstreamError::api(503, "overloaded"))]);
    let client = ResilientClient::new(driver, "gpt-4").with_retry_policy(RetryPolicy::new(
        1,
        Duration::from_secs(4),
        Duration::from_secs(10),
    ));

    let err = client.complete(&request()).await.expect_err("should fail");
    assert!(matches!(
        client_kind(&err),
        ClientErrorKind::RetriesExhausted { attempts: 1, .. }
    ));
    assert_eq!(client.driver().calls(), 1);
}

#[tokio::test]
async fn budget_resolution_feeds_the_limiter() {
    let known = ResilientClient::new(ScriptedDriver::new(vec![]), "gpt-4");
    assert_eq!(known.rpm(), 200);

    let namespaced = ResilientClient::new(ScriptedDriver::new(vec![]), "gemini/gemini-2.0-flash");
    assert_eq!(namespaced.rpm(), 2000);

    let unknown = ResilientClient::new(ScriptedDriver::new(vec![]), "totally-unknown-model");
    assert_eq!(unknown.rpm(), 100);

    let custom_policy = BudgetPolicy::new([("special".to_string(), 9)], 3);
    let custom = ResilientClient::with_policy(ScriptedDriver::new(vec![]), "special", &custom_policy);
    assert_eq!(custom.rpm(), 9);
}

#[tokio::test]
async fn explicit_rpm_override_beats_the_policy() {
    let client = ResilientClient::new(ScriptedDriver::new(vec![]), "gpt-4").with_rpm(7);
    assert_eq!(client.rpm(), 7);
    assert_eq!(client.model(), "gpt-4");
}

#[tokio::test(start_paused = true)]
async fn admission_timeout_fails_without_calling_upstream() {
    let driver = ScriptedDriver::new(vec![Ok(ok_response("only"))]);
    let client = ResilientClient::new(driver, "gpt-4")
        .with_rpm(1)
        .with_admission_timeout(Duration::from_millis(50));

    // First call takes the only slot in the 60s window.
    client.complete(&request()).await.expect("first call succeeds");
    assert_eq!(client.driver().calls(), 1);

    // Second call cannot be admitted and gives up at the bound.
    let err = client.complete(&request()).await.expect_err("should time out");
    match client_kind(&err) {
        ClientErrorKind::AdmissionTimeout(waited) => {
            assert_eq!(*waited, Duration::from_millis(50));
        }
        other => panic!("expected AdmissionTimeout, got {:?}", other),
    }
    // The driver was never consulted for the rejected call.
    assert_eq!(client.driver().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn observer_sees_every_attempt_and_retry() {
    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(503, "overloaded")),
        Err(UpstreamError::api(503, "overloaded")),
        Ok(ok_response("done")),
    ]);
    let observer = Arc::new(CountingObserver::default());
    let client = ResilientClient::new(driver, "gpt-4").with_observer(observer.clone());

    client.complete(&request()).await.expect("should succeed");

    assert_eq!(observer.attempts.load(Ordering::SeqCst), 3);
    assert_eq!(observer.retries.load(Ordering::SeqCst), 2);
    assert_eq!(observer.successes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn observer_retry_delays_follow_the_backoff_schedule() {
    struct DelayRecorder(Mutex<Vec<Duration>>);

    impl CallObserver for DelayRecorder {
        fn on_retry(&self, _error: &UpstreamError, delay: Duration) {
            self.0.lock().expect("delay mutex poisoned").push(delay);
        }
    }

    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(503, "overloaded")),
        Err(UpstreamError::api(503, "overloaded")),
        Ok(ok_response("done")),
    ]);
    let observer = Arc::new(DelayRecorder(Mutex::new(Vec::new())));
    let client = ResilientClient::new(driver, "gpt-4").with_observer(observer.clone());

    client.complete(&request()).await.expect("should succeed");

    // Default policy: 4s before attempts 2 and 3.
    assert_eq!(
        *observer.0.lock().expect("delay mutex poisoned"),
        vec![Duration::from_secs(4), Duration::from_secs(4)]
    );
}

#[tokio::test(start_paused = true)]
async fn retries_pass_through_admission_control() {
    // Two slots in the window, three attempts: the third attempt must
    // stall on admission and never reach the driver.
    let driver = ScriptedDriver::new(vec![
        Err(UpstreamError::api(503, "overloaded")),
        Err(UpstreamError::api(503, "overloaded")),
    ]);
    let client = ResilientClient::new(driver, "gpt-4")
        .with_rpm(2)
        .with_admission_timeout(Duration::from_millis(50));

    let err = client.complete(&request()).await.expect_err("should fail");
    match client_kind(&err) {
        ClientErrorKind::AdmissionTimeout(waited) => {
            assert_eq!(*waited, Duration::from_millis(50));
        }
        other => panic!("expected AdmissionTimeout, got {:?}", other),
    }
    assert_eq!(client.driver().calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_client_is_safe_under_concurrent_callers() {
    let script: Vec<_> = (0..8).map(|i| Ok(ok_response(&format!("r{}", i)))).collect();
    let client = Arc::new(ResilientClient::new(ScriptedDriver::new(script), "gpt-4"));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.complete(&request()).await.map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked").expect("call succeeded");
    }
    assert_eq!(client.driver().calls(), 8);
}
