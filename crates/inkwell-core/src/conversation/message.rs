//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FileAttachment;

/// Reply appended to the transcript when draft generation fails.
pub const CHAT_FALLBACK_REPLY: &str = "I encountered an error. Please try again.";

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the model.
    Model,
    /// System-generated message.
    System,
}

/// A single entry of the chat transcript.
///
/// Messages are immutable once created. `id` is unique per message and only
/// used for identity; transcript order is append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<FileAttachment>,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>, attachments: Vec<FileAttachment>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            attachments,
        }
    }

    /// Creates a user turn carrying its attachments.
    pub fn user(content: impl Into<String>, attachments: Vec<FileAttachment>) -> Self {
        Self::new(MessageRole::User, content, attachments)
    }

    /// Creates a model reply.
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, content, Vec::new())
    }

    /// Creates a system notice.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content, Vec::new())
    }

    /// Returns true for the fixed reply used when generation failed.
    pub fn is_fallback(&self) -> bool {
        self.role == MessageRole::Model && self.content == CHAT_FALLBACK_REPLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Model).unwrap();
        assert_eq!(json, "\"model\"");
        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(serde_json::from_str::<MessageRole>("\"assistant\"").is_err());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user("hi", Vec::new());
        let b = Message::user("hi", Vec::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fallback_detection() {
        assert!(Message::model(CHAT_FALLBACK_REPLY).is_fallback());
        assert!(!Message::user(CHAT_FALLBACK_REPLY, Vec::new()).is_fallback());
    }
}
