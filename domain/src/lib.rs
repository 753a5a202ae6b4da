//! Domain layer for critique
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Critic Panel
//!
//! A critique session runs a user's idea past a panel of 1..=6 critics,
//! strictly in index order. Each critic sees the finished output of every
//! lower-indexed critic, so the chain is a sequential dependency — never
//! a parallel fan-out.
//!
//! ## Fragments and Framing
//!
//! Streamed critic output travels as [`Fragment`]s: incremental text or
//! reasoning deltas plus a terminal marker. Two wire framings (SSE and
//! JSON-lines) encode and decode the same Fragment abstraction; the rest
//! of the system never sees framing details.

pub mod core;
pub mod critic;
pub mod framing;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, idea::Idea};
pub use critic::{CriticDescriptor, CriticIndex, CriticPanel, MAX_CRITICS};
pub use framing::{
    Fragment, FragmentDecoder, FragmentEncoder, FramingMode, json_lines::JsonLinesFraming,
    sse::SseFraming,
};
pub use prompt::{CriticResponse, CritiquePrompt};
pub use session::{
    accumulator::StreamAccumulator,
    entities::{Message, MessageId, Role},
    stream::StreamEvent,
    transcript::SessionTranscript,
};
