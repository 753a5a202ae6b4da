//! Session entities and streaming state
//!
//! A critique session owns one [`SessionTranscript`](transcript::SessionTranscript):
//! the user's idea followed by each critic's commentary in index order.

pub mod accumulator;
pub mod entities;
pub mod stream;
pub mod transcript;

/// Text substituted for a critic whose gateway call failed.
///
/// A failed critic shows as a message with this content, never as a crash
/// of the consuming layer, and contributes nothing to later critics' context.
pub const ERROR_MARKER: &str = "error processing request";
