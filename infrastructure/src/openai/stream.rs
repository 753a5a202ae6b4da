//! Incremental parsing of the gateway's event stream
//!
//! The gateway delivers chunks of bytes, not whole events, so the parser
//! buffers partial lines and splits on newlines before interpreting each
//! `data:` payload as a completion chunk.

use crate::openai::protocol::ChatStreamChunk;

const DONE_SENTINEL: &str = "[DONE]";

/// One interpreted piece of the gateway's stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayDelta {
    Content(String),
    Reasoning(String),
    Done,
}

/// Stateful line-splitting parser for the gateway's SSE stream
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, yielding every delta completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<GatewayDelta> {
        self.buffer.extend_from_slice(chunk);
        let mut deltas = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let mut line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let Some(payload) = line.strip_prefix("data: ").or(line.strip_prefix("data:")) else {
                continue;
            };
            let payload = payload.trim();
            if payload == DONE_SENTINEL {
                deltas.push(GatewayDelta::Done);
                continue;
            }
            let Ok(chunk) = serde_json::from_str::<ChatStreamChunk>(payload) else {
                // Unrecognized payloads are dropped; the stream goes on
                continue;
            };
            for choice in chunk.choices {
                if let Some(content) = choice.delta.content {
                    if !content.is_empty() {
                        deltas.push(GatewayDelta::Content(content));
                    }
                }
                if let Some(reasoning) = choice.delta.reasoning_content {
                    if !reasoning.is_empty() {
                        deltas.push(GatewayDelta::Reasoning(reasoning));
                    }
                }
            }
        }

        deltas
    }
}
