//! Session transcript and the fragment reducer

use crate::core::error::DomainError;
use crate::critic::CriticIndex;
use crate::framing::Fragment;
use crate::session::ERROR_MARKER;
use crate::session::entities::{Message, MessageId};
use serde::{Deserialize, Serialize};

/// Ordered sequence of messages for one user query (Entity)
///
/// Insertion order is significant: critics must be read in increasing index
/// order because each depends on all prior critics' final content. A new
/// top-level query replaces the transcript wholesale.
///
/// Invariant: at most one message is pending at a time, and a critic's
/// message is never added while a lower-indexed critic is still pending.
///
/// Mutation goes through [`applied`](Self::applied), a pure reducer that
/// returns an updated snapshot — consumers only ever see immutable
/// snapshots, there is no shared mutable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTranscript {
    messages: Vec<Message>,
}

impl SessionTranscript {
    /// Start a fresh transcript from the user's idea, replacing any prior one
    pub fn begin(idea_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(idea_text)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The message currently being streamed, if any
    pub fn pending_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_pending())
    }

    /// The most recently completed assistant message, if any
    pub fn last_completed_critic(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.critic.is_some() && !m.is_pending())
    }

    /// Append a pending assistant message for `critic`.
    ///
    /// Fails if another message is still pending — the sequential dependency
    /// chain forbids issuing a critic's request before all lower-indexed
    /// critics have completed.
    pub fn push_pending(&self, critic: CriticIndex) -> Result<(Self, MessageId), DomainError> {
        if let Some(pending) = self.pending_message() {
            return Err(DomainError::MessageNotPending(pending.id.to_string()));
        }
        let message = Message::pending_assistant(critic);
        let id = message.id.clone();
        let mut next = self.clone();
        next.messages.push(message);
        Ok((next, id))
    }

    /// Fold one stream fragment into the pending message, returning the
    /// updated snapshot.
    ///
    /// Content and reasoning are append-only; published snapshots are
    /// monotonic. `Done` with no pending message is a no-op so a decoder
    /// may report both a sentinel and a transport close.
    pub fn applied(&self, fragment: &Fragment) -> Result<Self, DomainError> {
        let mut next = self.clone();
        let pending = next.messages.iter_mut().find(|m| m.is_pending());
        match (fragment, pending) {
            (Fragment::Text { value, .. }, Some(message)) => {
                message.content.push_str(value);
            }
            (Fragment::Reasoning { value, .. }, Some(message)) => {
                message.reasoning.get_or_insert_with(String::new).push_str(value);
            }
            (Fragment::Done, Some(message)) => {
                message.pending = false;
            }
            (Fragment::Done, None) => {}
            (_, None) => {
                return Err(DomainError::MessageNotPending("<none>".to_string()));
            }
        }
        Ok(next)
    }

    /// Mark the pending message failed: substitute the error marker for an
    /// empty accumulator, keep partial content otherwise, and complete it.
    pub fn failed(&self) -> Self {
        let mut next = self.clone();
        if let Some(message) = next.messages.iter_mut().find(|m| m.is_pending()) {
            if message.content.is_empty() {
                message.content = ERROR_MARKER.to_string();
            }
            message.pending = false;
        }
        next
    }
}
