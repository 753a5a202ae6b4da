//! Transcript observation port
//!
//! Defines how incremental transcript snapshots reach the consuming layer.
//! Implementations live in the presentation layer (terminal output, HTTP
//! push) and only ever read immutable snapshots.

use critique_domain::{CriticDescriptor, SessionTranscript};

/// Callback for transcript updates during a critique session
pub trait TranscriptObserver: Send + Sync {
    /// Called with the full current snapshot after every accumulation step
    fn on_update(&self, transcript: &SessionTranscript);

    /// Called when a critic's request is issued
    fn on_critic_start(&self, _critic: &CriticDescriptor) {}

    /// Called when a critic's message reaches Done
    fn on_critic_complete(&self, _critic: &CriticDescriptor, _success: bool) {}
}

/// No-op observer for when nothing consumes snapshots
pub struct NoObserver;

impl TranscriptObserver for NoObserver {
    fn on_update(&self, _transcript: &SessionTranscript) {}
}
