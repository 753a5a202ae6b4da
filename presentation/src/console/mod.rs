//! Console transcript observer
//!
//! Streams critic commentary to stdout as it accumulates, for the terminal
//! path that runs the critic chain without the HTTP relay.

use colored::Colorize;
use critique_application::TranscriptObserver;
use critique_domain::{CriticDescriptor, SessionTranscript};
use std::io::Write;
use std::sync::Mutex;

/// Prints streamed commentary as it arrives
#[derive(Default)]
pub struct ConsoleObserver {
    // Bytes of the pending message already written to stdout
    printed: Mutex<usize>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptObserver for ConsoleObserver {
    fn on_critic_start(&self, critic: &CriticDescriptor) {
        if let Ok(mut printed) = self.printed.lock() {
            *printed = 0;
        }
        println!(
            "\n{}",
            format!("── Critic {} · {} ──", critic.index, critic.display_name)
                .yellow()
                .bold()
        );
    }

    fn on_update(&self, transcript: &SessionTranscript) {
        let Some(pending) = transcript.pending_message() else {
            return;
        };
        let Ok(mut printed) = self.printed.lock() else {
            return;
        };
        // Snapshots are monotonic, so the unprinted tail is a clean suffix
        if pending.content.len() > *printed {
            print!("{}", &pending.content[*printed..]);
            let _ = std::io::stdout().flush();
            *printed = pending.content.len();
        }
    }

    fn on_critic_complete(&self, _critic: &CriticDescriptor, success: bool) {
        if success {
            println!();
        } else {
            println!("{}", "(no response)".red());
        }
    }
}
