//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Role of a message sender in a conversation.
///
/// Serializes to the lowercase names used by chat-completion wire formats.
///
/// # Examples
///
/// ```
/// use vermeer_core::Role;
///
/// let user_role = Role::User;
/// let assistant_role = Role::Assistant;
/// assert_ne!(user_role, assistant_role);
///
/// // Wire format is lowercase
/// assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages are from the human
    User,
    /// Assistant messages are from the AI
    Assistant,
}
