//! Stream framing
//!
//! One internal [`Fragment`] abstraction with two wire framings, selected by
//! configuration rather than duplicated logic:
//!
//! - [`sse::SseFraming`] — `data: <JSON>\n\n` events with a `[DONE]` sentinel
//! - [`json_lines::JsonLinesFraming`] — one JSON object per line, ended by
//!   closing the transport
//!
//! Decoders are incremental: the transport delivers chunks of bytes, not
//! whole events, so a decoder buffers partial chunks and splits on the
//! framing delimiter before parsing. Chunk boundaries never affect the
//! reconstructed text.

pub mod json_lines;
pub mod sse;

use crate::critic::CriticIndex;
use serde::{Deserialize, Serialize};

/// One incremental unit of streamed critic output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A piece of the critic's visible commentary
    Text {
        value: String,
        critic: Option<CriticIndex>,
    },
    /// A piece of the critic's reasoning trace
    Reasoning {
        value: String,
        critic: Option<CriticIndex>,
    },
    /// End-of-stream sentinel
    Done,
}

impl Fragment {
    pub fn text(value: impl Into<String>) -> Self {
        Fragment::Text {
            value: value.into(),
            critic: None,
        }
    }

    pub fn reasoning(value: impl Into<String>) -> Self {
        Fragment::Reasoning {
            value: value.into(),
            critic: None,
        }
    }

    pub fn with_critic(self, critic: CriticIndex) -> Self {
        match self {
            Fragment::Text { value, .. } => Fragment::Text {
                value,
                critic: Some(critic),
            },
            Fragment::Reasoning { value, .. } => Fragment::Reasoning {
                value,
                critic: Some(critic),
            },
            Fragment::Done => Fragment::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Fragment::Done)
    }
}

/// Which wire framing the relay speaks, chosen in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramingMode {
    #[default]
    Sse,
    JsonLines,
}

impl FramingMode {
    pub fn content_type(&self) -> &'static str {
        match self {
            FramingMode::Sse => "text/event-stream",
            FramingMode::JsonLines => "application/x-ndjson",
        }
    }
}

impl std::str::FromStr for FramingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sse" => Ok(FramingMode::Sse),
            "json-lines" | "ndjson" => Ok(FramingMode::JsonLines),
            other => Err(format!("unknown framing mode: {other}")),
        }
    }
}

/// Turns fragments into wire events, one event per fragment
pub trait FragmentEncoder: Send + Sync {
    /// Encode one fragment. `None` means the framing emits nothing for it
    /// (e.g. JSON-lines has no end-of-stream sentinel, and empty deltas are
    /// suppressed).
    fn encode(&self, fragment: &Fragment) -> Option<String>;
}

/// Incrementally turns transport chunks back into fragments
pub trait FragmentDecoder: Send {
    /// Feed one chunk of bytes, yielding every fragment completed by it
    fn feed(&mut self, chunk: &[u8]) -> Vec<Fragment>;

    /// Signal transport close, yielding any trailing fragments.
    ///
    /// The consumer treats an unexpected close as "incomplete, not
    /// necessarily failed", so decoders report `Done` here when the framing
    /// has no explicit sentinel or the sentinel never arrived.
    fn close(&mut self) -> Vec<Fragment>;
}
