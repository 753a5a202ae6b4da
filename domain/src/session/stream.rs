//! Streaming events for gateway communication
//!
//! [`StreamEvent`] represents individual events in a streaming completion
//! response, bridging the infrastructure adapter (SSE chunks from the
//! hosted gateway) to the application layer.

/// An event in a streaming completion response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model
    Delta(String),
    /// A reasoning chunk from the model
    ReasoningDelta(String),
    /// The complete response text (signals stream end)
    Completed(String),
    /// An error that occurred during streaming
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn reasoning_delta_is_not_text() {
        let event = StreamEvent::ReasoningDelta("thinking".to_string());
        assert_eq!(event.text(), None);
        assert!(!event.is_terminal());
    }

    #[test]
    fn completed_and_error_are_terminal() {
        assert!(StreamEvent::Completed("full".to_string()).is_terminal());
        assert!(StreamEvent::Error("oops".to_string()).is_terminal());
    }
}
