//! Rate limiting and retry policy for the Vermeer completion client.
//!
//! This crate provides the admission side of the resiliency layer:
//! - [`SlidingWindowRateLimiter`] bounds admissions within a trailing time
//!   window, shared by all concurrent callers of one client.
//! - [`BudgetPolicy`] resolves a requests-per-minute budget for a model
//!   identifier, with compiled-in defaults and TOML overrides via
//!   [`VermeerConfig`].
//! - [`RetryPolicy`] describes bounded exponential backoff and classifies
//!   which upstream failures are worth retrying.
//!
//! The pieces are independent strategy objects; `ResilientClient` in
//! `vermeer_models` composes them around a driver.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod budget;
mod config;
mod limiter;
mod retry;

pub use budget::{BudgetPolicy, DEFAULT_FALLBACK_RPM};
pub use config::{BudgetEntry, VermeerConfig};
pub use limiter::SlidingWindowRateLimiter;
pub use retry::RetryPolicy;
