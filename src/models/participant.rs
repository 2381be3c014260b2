//! Participant model
//!
//! A person sharing the bill. Names are not required to be unique, but two
//! participants with the same name share one entry in the split results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to the first participant of every new session
pub const DEFAULT_PARTICIPANT: &str = "Me";

/// A person sharing the bill
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    name: String,
}

impl Participant {
    /// Create a participant; the name is trimmed and must not be empty
    pub fn new(name: impl Into<String>) -> Result<Self, ParticipantValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }
        if name.chars().count() > 50 {
            return Err(ParticipantValidationError::NameTooLong(name.chars().count()));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for ParticipantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Participant name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Participant name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for ParticipantValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_trims() {
        let p = Participant::new("  Budi ").unwrap();
        assert_eq!(p.name(), "Budi");
        assert_eq!(p.to_string(), "Budi");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            Participant::new("   "),
            Err(ParticipantValidationError::EmptyName)
        );
    }

    #[test]
    fn test_long_name_rejected() {
        let long = "x".repeat(51);
        assert_eq!(
            Participant::new(long),
            Err(ParticipantValidationError::NameTooLong(51))
        );
    }
}
