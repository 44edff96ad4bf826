//! Message types for conversation history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// Message order is conversation order and is semantically significant;
/// the client never reorders the sequence it is given.
///
/// # Examples
///
/// ```
/// use vermeer_core::{Message, Role};
///
/// let message = Message::user("Hello!");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "Hello!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
