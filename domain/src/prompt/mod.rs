//! Prompt construction for the critique flow

use crate::core::idea::Idea;
use crate::critic::CriticDescriptor;
use serde::{Deserialize, Serialize};

/// A prior critic's finished output, threaded into later critics' context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticResponse {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl CriticResponse {
    pub fn new(content: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            content: content.into(),
            reasoning,
        }
    }
}

/// Templates for the two relay modes
pub struct CritiquePrompt;

impl CritiquePrompt {
    /// Fixed instruction for single-shot mode.
    ///
    /// The structured response echoes the user's prompt verbatim in
    /// `initial_query` alongside the model's `my_analysis`.
    pub fn assistant_instruction() -> &'static str {
        "You are a helpful assistant that returns a succinct response about ideas \
         expressed in a user prompt. The initial query in your response should be \
         the user's prompt exactly. Do not change it."
    }

    /// Persona instruction for one critic in streaming mode: the critic's
    /// personality, a rendering of all previous critics' content, the user
    /// prompt, and the one-sentence-response directive.
    pub fn critic_system(
        critic: &CriticDescriptor,
        idea: &Idea,
        previous: &[CriticResponse],
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(&critic.personality);
        prompt.push_str("\n\n");

        if !previous.is_empty() {
            prompt.push_str("Commentary from the critics before you:\n");
            for (i, response) in previous.iter().enumerate() {
                prompt.push_str(&format!("\n--- Critic {} ---\n{}\n", i + 1, response.content));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!("The idea under critique: {}\n\n", idea.content()));
        prompt.push_str("Respond with exactly one sentence.");
        prompt
    }
}
