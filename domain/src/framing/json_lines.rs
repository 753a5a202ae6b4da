//! Newline-delimited JSON framing
//!
//! Each event is one line: `{"content":...,"reasoning":...,"criticNumber":n}`.
//! Events are only emitted for deltas carrying non-empty content or
//! reasoning, and the stream ends by closing the transport — there is no
//! sentinel on the wire.

use crate::critic::CriticIndex;
use crate::framing::{Fragment, FragmentDecoder, FragmentEncoder};
use serde::{Deserialize, Serialize};

/// Wire shape of one JSON-lines event
#[derive(Debug, Serialize, Deserialize)]
struct LineEvent {
    #[serde(default)]
    content: String,
    #[serde(default)]
    reasoning: String,
    #[serde(rename = "criticNumber", skip_serializing_if = "Option::is_none")]
    critic_number: Option<usize>,
}

/// JSON-lines encoder/decoder pair
#[derive(Debug, Default)]
pub struct JsonLinesFraming {
    buffer: Vec<u8>,
}

impl JsonLinesFraming {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_line(line: &str) -> Vec<Fragment> {
        let Ok(event) = serde_json::from_str::<LineEvent>(line) else {
            // Malformed line: skipped, never fatal
            return Vec::new();
        };
        let critic = event.critic_number.and_then(|n| CriticIndex::new(n).ok());
        let mut fragments = Vec::new();
        if !event.content.is_empty() {
            fragments.push(Fragment::Text {
                value: event.content,
                critic,
            });
        }
        if !event.reasoning.is_empty() {
            fragments.push(Fragment::Reasoning {
                value: event.reasoning,
                critic,
            });
        }
        fragments
    }
}

impl FragmentEncoder for JsonLinesFraming {
    fn encode(&self, fragment: &Fragment) -> Option<String> {
        let event = match fragment {
            Fragment::Text { value, critic } if !value.is_empty() => LineEvent {
                content: value.clone(),
                reasoning: String::new(),
                critic_number: critic.map(|c| c.get()),
            },
            Fragment::Reasoning { value, critic } if !value.is_empty() => LineEvent {
                content: String::new(),
                reasoning: value.clone(),
                critic_number: critic.map(|c| c.get()),
            },
            // Empty deltas and the end-of-stream marker emit nothing; the
            // transport close is the terminator.
            _ => return None,
        };
        let json = serde_json::to_string(&event).ok()?;
        Some(format!("{json}\n"))
    }
}

impl FragmentDecoder for JsonLinesFraming {
    fn feed(&mut self, chunk: &[u8]) -> Vec<Fragment> {
        self.buffer.extend_from_slice(chunk);
        let mut fragments = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            fragments.extend(Self::decode_line(line));
        }
        fragments
    }

    fn close(&mut self) -> Vec<Fragment> {
        // A trailing line without a newline still counts
        let mut fragments = Vec::new();
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned();
            let line = line.trim();
            if !line.is_empty() {
                fragments.extend(Self::decode_line(line));
            }
        }
        fragments.push(Fragment::Done);
        fragments
    }
}
