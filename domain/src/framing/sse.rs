//! Server-sent-events framing
//!
//! Events are `data: <JSON>\n\n` where the JSON is
//! `{"type":"text","value":<delta>}`, and the stream ends with a literal
//! `data: [DONE]` event. Decoding is lenient: a data payload that fails to
//! parse as JSON is appended as raw literal text, never raised as an error.

use crate::framing::{Fragment, FragmentDecoder, FragmentEncoder};
use serde::{Deserialize, Serialize};

const DONE_SENTINEL: &str = "[DONE]";

/// Wire shape of one SSE data payload
#[derive(Debug, Serialize, Deserialize)]
struct SseEvent {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

/// SSE encoder/decoder pair
#[derive(Debug, Default)]
pub struct SseFraming {
    buffer: Vec<u8>,
    done_seen: bool,
}

impl SseFraming {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_data(&mut self, payload: &str) -> Option<Fragment> {
        if payload == DONE_SENTINEL {
            self.done_seen = true;
            return Some(Fragment::Done);
        }
        match serde_json::from_str::<SseEvent>(payload) {
            Ok(event) if event.kind == "reasoning" => Some(Fragment::reasoning(event.value)),
            Ok(event) => Some(Fragment::text(event.value)),
            // Lenient fallback: keep the raw payload as literal text
            Err(_) => Some(Fragment::text(payload)),
        }
    }
}

impl FragmentEncoder for SseFraming {
    fn encode(&self, fragment: &Fragment) -> Option<String> {
        let payload = match fragment {
            Fragment::Text { value, .. } => serde_json::json!({"type": "text", "value": value}),
            Fragment::Reasoning { value, .. } => {
                serde_json::json!({"type": "reasoning", "value": value})
            }
            Fragment::Done => return Some(format!("data: {DONE_SENTINEL}\n\n")),
        };
        Some(format!("data: {payload}\n\n"))
    }
}

impl FragmentDecoder for SseFraming {
    fn feed(&mut self, chunk: &[u8]) -> Vec<Fragment> {
        self.buffer.extend_from_slice(chunk);
        let mut fragments = Vec::new();

        // Split only on complete lines; a trailing partial line stays
        // buffered until the next chunk arrives.
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let mut line = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let payload = match line.strip_prefix("data: ").or(line.strip_prefix("data:")) {
                Some(rest) => rest,
                // Other SSE fields (event:, id:, retry:) carry no fragment
                None => continue,
            };
            if let Some(fragment) = self.decode_data(payload) {
                fragments.push(fragment);
            }
        }

        fragments
    }

    fn close(&mut self) -> Vec<Fragment> {
        if self.done_seen {
            return Vec::new();
        }
        // Transport closed without the sentinel: incomplete, not failed
        self.done_seen = true;
        vec![Fragment::Done]
    }
}
