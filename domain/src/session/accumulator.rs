//! Stream accumulator
//!
//! Drives one pending message through
//! `Pending(empty) → Pending(partial) → Done`, one transition per
//! [`Fragment`]. Every step produces a full transcript snapshot so the
//! consuming layer can re-render incrementally; snapshots are monotonic —
//! appended content is never retracted.

use crate::core::error::DomainError;
use crate::framing::{Fragment, FragmentDecoder};
use crate::session::transcript::SessionTranscript;

/// Folds stream fragments into the transcript's pending message
#[derive(Debug, Clone)]
pub struct StreamAccumulator {
    transcript: SessionTranscript,
}

impl StreamAccumulator {
    pub fn new(transcript: SessionTranscript) -> Self {
        Self { transcript }
    }

    /// Current transcript snapshot
    pub fn snapshot(&self) -> &SessionTranscript {
        &self.transcript
    }

    /// Whether the in-flight message has reached `Done`
    pub fn is_complete(&self) -> bool {
        self.transcript.pending_message().is_none()
    }

    /// Apply one fragment and return the updated snapshot
    pub fn apply(&mut self, fragment: &Fragment) -> Result<&SessionTranscript, DomainError> {
        self.transcript = self.transcript.applied(fragment)?;
        Ok(&self.transcript)
    }

    /// Feed raw transport bytes through `decoder`, folding in every
    /// completed fragment. Returns the snapshot after the whole chunk.
    pub fn feed(
        &mut self,
        decoder: &mut dyn FragmentDecoder,
        chunk: &[u8],
    ) -> Result<&SessionTranscript, DomainError> {
        for fragment in decoder.feed(chunk) {
            self.transcript = self.transcript.applied(&fragment)?;
        }
        Ok(&self.transcript)
    }

    /// Transport closed: flush the decoder and complete the message with
    /// whatever partial content was accumulated (incomplete is not failed).
    pub fn finish(
        mut self,
        decoder: &mut dyn FragmentDecoder,
    ) -> Result<SessionTranscript, DomainError> {
        for fragment in decoder.close() {
            self.transcript = self.transcript.applied(&fragment)?;
        }
        if !self.is_complete() {
            self.transcript = self.transcript.applied(&Fragment::Done)?;
        }
        Ok(self.transcript)
    }

    /// Abort the in-flight message, substituting the error marker when no
    /// content arrived, and return the completed transcript.
    pub fn abort(self) -> SessionTranscript {
        self.transcript.failed()
    }
}
