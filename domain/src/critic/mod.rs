//! Critic panel configuration
//!
//! A [`CriticPanel`] is the static roster of personas that take turns
//! commenting on the user's idea. Descriptors are read-only at runtime;
//! the panel size is bounded by [`MAX_CRITICS`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of critics in a panel
pub const MAX_CRITICS: usize = 6;

/// 1-based position of a critic within the panel (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriticIndex(usize);

impl CriticIndex {
    /// Create a critic index, validating the 1..=MAX_CRITICS range
    pub fn new(index: usize) -> Result<Self, DomainError> {
        if index == 0 || index > MAX_CRITICS {
            return Err(DomainError::CriticIndexOutOfRange(index, MAX_CRITICS));
        }
        Ok(Self(index))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CriticIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One configured critic persona (read-only at runtime)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticDescriptor {
    pub index: CriticIndex,
    pub display_name: String,
    /// Prompt fragment that shapes this critic's voice
    pub personality: String,
}

impl CriticDescriptor {
    pub fn new(
        index: CriticIndex,
        display_name: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            index,
            display_name: display_name.into(),
            personality: personality.into(),
        }
    }
}

/// The ordered roster of critics for a session
#[derive(Debug, Clone)]
pub struct CriticPanel {
    critics: Vec<CriticDescriptor>,
}

impl CriticPanel {
    /// Build a panel from descriptors, which must already be in index order
    pub fn new(critics: Vec<CriticDescriptor>) -> Result<Self, DomainError> {
        if critics.is_empty() {
            return Err(DomainError::NoCritics);
        }
        if critics.len() > MAX_CRITICS {
            return Err(DomainError::CriticIndexOutOfRange(critics.len(), MAX_CRITICS));
        }
        Ok(Self { critics })
    }

    /// Default roster of `count` critics with generic personas
    pub fn with_default_roster(count: usize) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::NoCritics);
        }
        let critics = (1..=count)
            .map(|i| {
                let index = CriticIndex::new(i)?;
                Ok(CriticDescriptor::new(
                    index,
                    format!("critic {i}"),
                    default_personality(i),
                ))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self { critics })
    }

    pub fn len(&self) -> usize {
        self.critics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.critics.is_empty()
    }

    /// Look up a critic by its 1-based index
    pub fn get(&self, index: CriticIndex) -> Option<&CriticDescriptor> {
        self.critics.get(index.get() - 1)
    }

    /// Iterate critics in increasing index order
    pub fn iter(&self) -> impl Iterator<Item = &CriticDescriptor> {
        self.critics.iter()
    }
}

fn default_personality(index: usize) -> &'static str {
    // Personas cycle through six fixed angles of attack
    match (index - 1) % MAX_CRITICS {
        0 => "You are a pragmatic critic. Probe whether the idea is concrete enough to act on.",
        1 => "You are a market-minded critic. Weigh the idea against existing competition and demand.",
        2 => "You are a technical critic. Question feasibility and what would have to be built first.",
        3 => "You are a financial critic. Consider capital requirements and the path to revenue.",
        4 => "You are a user-advocate critic. Ask who actually wants this and why they would switch.",
        _ => "You are a synthesis critic. Pull the prior commentary into one decisive recommendation.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bounds() {
        assert!(CriticIndex::new(0).is_err());
        assert!(CriticIndex::new(1).is_ok());
        assert!(CriticIndex::new(6).is_ok());
        assert!(CriticIndex::new(7).is_err());
    }

    #[test]
    fn default_roster_is_ordered() {
        let panel = CriticPanel::with_default_roster(3).unwrap();
        assert_eq!(panel.len(), 3);
        for (i, critic) in panel.iter().enumerate() {
            assert_eq!(critic.index.get(), i + 1);
        }
    }

    #[test]
    fn empty_roster_rejected() {
        assert!(CriticPanel::with_default_roster(0).is_err());
        assert!(CriticPanel::new(vec![]).is_err());
    }

    #[test]
    fn roster_bounded_at_max() {
        assert!(CriticPanel::with_default_roster(MAX_CRITICS).is_ok());
        assert!(CriticPanel::with_default_roster(MAX_CRITICS + 1).is_err());
    }

    #[test]
    fn lookup_by_index() {
        let panel = CriticPanel::with_default_roster(2).unwrap();
        let second = panel.get(CriticIndex::new(2).unwrap()).unwrap();
        assert_eq!(second.display_name, "critic 2");
        assert!(panel.get(CriticIndex::new(3).unwrap()).is_none());
    }
}
