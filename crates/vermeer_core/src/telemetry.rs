//! Opt-in tracing setup for binaries and tests.
//!
//! Library code emits `tracing` events but never installs a subscriber;
//! whether anything listens is entirely the caller's decision. This helper
//! exists for executables that want human-readable logs without wiring up
//! `tracing-subscriber` themselves.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a fmt tracing subscriber honoring `RUST_LOG`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    Ok(())
}
