//! Vermeer, a resilient client shim for LLM completion APIs.
//!
//! Vermeer sits in front of a remote text-completion API and takes over the
//! two chores callers otherwise manage by hand: staying inside the
//! provider's request quota, and retrying transient failures with
//! exponential backoff.
//!
//! # Quick Start
//!
//! ```no_run
//! use vermeer::{CompletionRequest, Message, OpenAiClient, ResilientClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ResilientClient::new(OpenAiClient::from_env()?, "gpt-4");
//!
//!     let request = CompletionRequest::builder()
//!         .messages(vec![Message::user("Write a short poem about rust.")])
//!         .max_tokens(100u32)
//!         .build()?;
//!
//!     let response = client.complete(&request).await?;
//!     println!("{}", response.first_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Vermeer is organized as a workspace with focused crates:
//!
//! - `vermeer_core` - Core data types (Message, CompletionRequest, etc.)
//! - `vermeer_interface` - CompletionDriver and CallObserver traits
//! - `vermeer_error` - Error types
//! - `vermeer_rate_limit` - Sliding-window rate limiting and retry policy
//! - `vermeer_models` - ResilientClient pipeline and provider drivers
//!
//! This crate (`vermeer`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use vermeer_core::{
    Choice, CompletionRequest, CompletionRequestBuilder, CompletionResponse, Message, Role, Usage,
    init_telemetry,
};
pub use vermeer_error::{
    ClientError, ClientErrorKind, ConfigError, RetryableError, UpstreamError, UpstreamErrorKind,
    VermeerError, VermeerErrorKind, VermeerResult,
};
pub use vermeer_interface::{CallObserver, CompletionDriver, NoopObserver};
pub use vermeer_models::{OpenAiClient, ResilientClient};
pub use vermeer_rate_limit::{
    BudgetEntry, BudgetPolicy, DEFAULT_FALLBACK_RPM, RetryPolicy, SlidingWindowRateLimiter,
    VermeerConfig,
};
