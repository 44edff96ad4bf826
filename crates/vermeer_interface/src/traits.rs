//! The completion API collaborator trait.

use async_trait::async_trait;
use vermeer_core::{CompletionRequest, CompletionResponse};
use vermeer_error::UpstreamError;

/// A stateless completion backend.
///
/// Implementations perform exactly one external call per invocation: no
/// rate limiting, no retries. Resiliency is layered on top by
/// `ResilientClient`, which consults its rate limiter before every call
/// and owns the retry loop.
///
/// The call is treated as an opaque suspending operation of unknown
/// duration; cancellation semantics of an in-flight call are whatever the
/// implementation's transport provides.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Perform one completion call against `model`.
    ///
    /// Returns the provider's response verbatim, or the failure that
    /// occurred. Implementations must not synthesize success values from
    /// failures.
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError>;

    /// Provider name (e.g., "openai", "mock").
    fn provider_name(&self) -> &'static str;
}
