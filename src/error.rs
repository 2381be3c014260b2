//! Custom error types for Patungan
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::gateway::ExtractionError;
use crate::models::{BillValidationError, ParticipantValidationError};
use crate::wizard::Step;

/// The main error type for Patungan operations
#[derive(Error, Debug)]
pub enum PatunganError {
    /// Configuration-related errors (missing API key, unreadable settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A wizard step change whose preconditions are not met
    #[error("Cannot leave step {from}: {reason}")]
    InvalidTransition { from: Step, reason: String },

    /// Bill extraction failed
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl PatunganError {
    /// Create a "not found" error for line items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for participants
    pub fn participant_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Participant",
            identifier: identifier.into(),
        }
    }

    /// Error for operations that need a bill before one was extracted
    pub fn no_bill() -> Self {
        Self::NotFound {
            entity_type: "Bill",
            identifier: "no receipt has been extracted yet".into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: Step, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from,
            reason: reason.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a rejected step change
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

impl From<std::io::Error> for PatunganError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PatunganError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<BillValidationError> for PatunganError {
    fn from(err: BillValidationError) -> Self {
        match err {
            BillValidationError::UnknownItem(id) => Self::item_not_found(id.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<ParticipantValidationError> for PatunganError {
    fn from(err: ParticipantValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for Patungan operations
pub type PatunganResult<T> = Result<T, PatunganError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PatunganError::Config("OPENROUTER_API_KEY is not set".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: OPENROUTER_API_KEY is not set"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = PatunganError::participant_not_found("Budi");
        assert_eq!(err.to_string(), "Participant not found: Budi");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = PatunganError::invalid_transition(Step::Upload, "no bill extracted");
        assert_eq!(
            err.to_string(),
            "Cannot leave step 1 (Upload): no bill extracted"
        );
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_extraction_error_is_transparent() {
        let err: PatunganError = ExtractionError::Http {
            status: 401,
            body: "unauthorized".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API Error: 401 - unauthorized");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PatunganError = io_err.into();
        assert!(matches!(err, PatunganError::Io(_)));
    }
}
