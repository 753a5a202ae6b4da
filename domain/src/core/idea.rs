//! Idea value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's idea to be critiqued (Value Object)
///
/// Represents the free-text prompt that seeds a critique session. An Idea
/// is always non-empty; the relay rejects empty prompts before any gateway
/// call is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    content: String,
}

impl Idea {
    /// Create a new idea, rejecting empty or whitespace-only content
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self { content })
    }

    /// Get the idea content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Idea {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Idea::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_idea() {
        let idea = Idea::new("I want to build the next Apple").unwrap();
        assert_eq!(idea.content(), "I want to build the next Apple");
    }

    #[test]
    fn empty_idea_rejected() {
        assert!(Idea::new("").is_err());
        assert!(Idea::new("   \n").is_err());
    }

    #[test]
    fn display_matches_content() {
        let idea = Idea::new("solar powered kettle").unwrap();
        assert_eq!(idea.to_string(), "solar powered kettle");
    }
}
