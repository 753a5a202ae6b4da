//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("Critic index {0} is out of range (1..={1})")]
    CriticIndexOutOfRange(usize, usize),

    #[error("No critics configured")]
    NoCritics,

    #[error("Message {0} is not pending")]
    MessageNotPending(String),
}
