//! Request types for completion calls.

use crate::Message;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_temperature() -> f64 {
    0.7
}

/// A completion request: the conversation plus generation parameters.
///
/// The target model is not part of the request; it belongs to the client.
/// `extra` is an open set of provider options passed through verbatim.
///
/// # Examples
///
/// ```
/// use vermeer_core::{CompletionRequest, Message};
///
/// let request = CompletionRequest::builder()
///     .messages(vec![Message::user("Write a short poem about rust.")])
///     .max_tokens(100u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.temperature, 0.7);
/// assert_eq!(request.max_tokens, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
pub struct CompletionRequest {
    /// The conversation messages to send, oldest first
    pub messages: Vec<Message>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum number of tokens to generate. `None` sends no cap at all;
    /// it is never replaced with a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Additional provider-specific options, forwarded untouched
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            temperature: default_temperature(),
            max_tokens: None,
            extra: Map::new(),
        }
    }
}

impl CompletionRequest {
    /// Start building a request.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// Convenience constructor for a plain message sequence with default
    /// generation parameters.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Merge the generation parameters into a single outgoing parameter set.
    ///
    /// `max_tokens` appears only when the caller provided one; `extra`
    /// entries are forwarded verbatim. An `extra` entry may override
    /// `temperature` since explicit options win.
    ///
    /// # Examples
    ///
    /// ```
    /// use vermeer_core::CompletionRequest;
    ///
    /// let request = CompletionRequest::default();
    /// let params = request.merged_params();
    /// assert!(params.contains_key("temperature"));
    /// assert!(!params.contains_key("max_tokens"));
    /// ```
    pub fn merged_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("temperature".to_string(), self.temperature.into());
        for (key, value) in &self.extra {
            params.insert(key.clone(), value.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            params.insert("max_tokens".to_string(), max_tokens.into());
        }
        params
    }
}
