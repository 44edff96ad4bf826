//! Response types for completion calls.

use crate::Message;
use serde::{Deserialize, Serialize};

/// One generated alternative within a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice within the response
    #[serde(default)]
    pub index: u32,
    /// The generated message
    pub message: Message,
    /// Why generation stopped (e.g., "stop", "length")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Usage {
    /// Tokens consumed by the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens
    #[serde(default)]
    pub total_tokens: u32,
}

/// The raw completion response, returned to callers verbatim.
///
/// The resilient client never inspects or synthesizes response content;
/// it only distinguishes success from failure.
///
/// # Examples
///
/// ```
/// use vermeer_core::{Choice, CompletionResponse, Message};
///
/// let response = CompletionResponse {
///     id: None,
///     model: Some("gpt-4".to_string()),
///     choices: vec![Choice {
///         index: 0,
///         message: Message::assistant("Hello! How can I help?"),
///         finish_reason: Some("stop".to_string()),
///     }],
///     usage: None,
/// };
///
/// assert_eq!(response.first_text(), Some("Hello! How can I help?"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned response identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model that produced the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generated choices; providers return at least one on success
    pub choices: Vec<Choice>,
    /// Token usage, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Text of the first generated choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
