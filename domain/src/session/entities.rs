//! Message entities

use crate::critic::CriticIndex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Opaque message identifier (unique per message, not globally ordered)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message in a critique transcript (Entity)
///
/// Assistant messages start pending with empty accumulators and are mutated
/// append-only by the stream accumulator until they complete. A completed
/// message is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critic: Option<CriticIndex>,
    pub pending: bool,
}

impl Message {
    /// A fully-populated user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::User,
            content: content.into(),
            reasoning: None,
            critic: None,
            pending: false,
        }
    }

    /// A pending assistant message for the given critic, with empty accumulators
    pub fn pending_assistant(critic: CriticIndex) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::Assistant,
            content: String::new(),
            reasoning: None,
            critic: Some(critic),
            pending: true,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Reasoning text accumulated so far, if any
    pub fn reasoning_text(&self) -> &str {
        self.reasoning.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_is_complete_on_creation() {
        let msg = Message::user("an idea");
        assert_eq!(msg.role, Role::User);
        assert!(!msg.is_pending());
        assert_eq!(msg.content, "an idea");
    }

    #[test]
    fn pending_assistant_starts_empty() {
        let msg = Message::pending_assistant(CriticIndex::new(2).unwrap());
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.is_pending());
        assert!(msg.content.is_empty());
        assert!(msg.reasoning.is_none());
        assert_eq!(msg.critic.unwrap().get(), 2);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }
}
