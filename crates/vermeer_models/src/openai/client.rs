//! HTTP client for OpenAI-compatible chat-completion APIs.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};
use vermeer_core::{CompletionRequest, CompletionResponse, Message};
use vermeer_error::{UpstreamError, UpstreamErrorKind};
use vermeer_interface::CompletionDriver;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Wire format for a chat-completion call.
///
/// The merged parameter set is flattened alongside model and messages, so
/// extra options ride through verbatim and an omitted `max_tokens` never
/// appears on the wire.
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(flatten)]
    params: Map<String, Value>,
}

/// Client for OpenAI-compatible chat-completion endpoints.
///
/// Performs exactly one HTTP call per [`CompletionDriver::complete`]
/// invocation; rate limiting and retries belong to
/// [`ResilientClient`](crate::ResilientClient).
///
/// # Examples
///
/// ```no_run
/// use vermeer_models::OpenAiClient;
///
/// let client = OpenAiClient::new("sk-...");
/// // Point at any compatible endpoint:
/// let local = OpenAiClient::new("unused").with_base_url("http://localhost:8080/v1");
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new client against the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Creates a client from `OPENAI_API_KEY` (and optional
    /// `OPENAI_BASE_URL`) in the environment.
    pub fn from_env() -> Result<Self, UpstreamError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            UpstreamError::new(UpstreamErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()))
        })?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    /// Point the client at a different OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionDriver for OpenAiClient {
    #[instrument(skip(self, request))]
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let body = ChatCompletionBody {
            model,
            messages: &request.messages,
            params: request.merged_params(),
        };

        debug!("Sending request to chat completions endpoint");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send completion request");
                UpstreamError::http(format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, "Completion API returned error");
            return Err(UpstreamError::api(status, body));
        }

        response.json::<CompletionResponse>().await.map_err(|e| {
            error!(error = ?e, "Failed to parse completion response");
            UpstreamError::parse(format!("failed to parse response: {}", e))
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
