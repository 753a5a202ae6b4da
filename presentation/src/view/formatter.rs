//! Flat plain-text projection of a transcript

use colored::Colorize;
use critique_domain::{Role, SessionTranscript};

/// Formats transcripts for console display
pub struct TranscriptFormatter;

impl TranscriptFormatter {
    /// Format the whole transcript, critics in order
    pub fn format(transcript: &SessionTranscript) -> String {
        let mut output = String::new();
        for message in transcript.messages() {
            match message.role {
                Role::User => {
                    output.push_str(&format!("{} {}\n\n", "Idea:".cyan().bold(), message.content));
                }
                Role::Assistant => {
                    let label = match message.critic {
                        Some(critic) => format!("── Critic {critic} ──"),
                        None => "── Assistant ──".to_string(),
                    };
                    output.push_str(&format!("{}\n", label.yellow().bold()));
                    if !message.reasoning_text().is_empty() {
                        output.push_str(&format!(
                            "{}\n",
                            message.reasoning_text().dimmed()
                        ));
                    }
                    if message.is_pending() {
                        output.push_str(&format!("{}...\n\n", message.content));
                    } else {
                        output.push_str(&format!("{}\n\n", message.content));
                    }
                }
            }
        }
        output
    }
}
