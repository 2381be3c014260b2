//! Bill extraction gateway
//!
//! Turns a receipt image into a [`BillRecord`]. The real implementation calls
//! an OpenRouter-compatible chat completions endpoint with a vision prompt;
//! [`MockGateway`] serves fixed bills for tests and offline use.

pub mod image;
pub mod mock;
pub mod openrouter;
pub mod response;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::BillRecord;

pub use image::{ImageFormat, ReceiptImage};
pub use mock::{mock_bill, MockGateway};
pub use openrouter::{OpenRouterGateway, RequestOptions};
pub use response::{ExtractedBill, ExtractedItem, EXTRACTION_PROMPT};

/// Anything that can read a bill off a receipt image
#[async_trait]
pub trait BillExtractionGateway: Send + Sync {
    /// Extract a bill from `image`
    async fn extract(&self, image: &ReceiptImage) -> Result<BillRecord, ExtractionError>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Why an extraction failed
///
/// None of these are fatal: the caller shows the message and stays on the
/// Upload step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The file is not a PNG or JPEG image
    #[error("Invalid receipt image: {0}")]
    InvalidImage(String),

    /// The request never got a response
    #[error("Error when extract data: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Extraction timed out after {0} seconds")]
    Timeout(u64),

    /// The service answered with a non-success status
    #[error("API Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// The response is not a chat completion
    #[error("Unexpected response from the extraction service: {0}")]
    MalformedResponse(String),

    /// The model's answer does not contain a usable bill
    #[error("Could not read a bill from the receipt: {0}")]
    Unparseable(String),
}

impl ExtractionError {
    /// Whether retrying the same image might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtractionError::Http {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "API Error: 500 - boom");

        let err = ExtractionError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Error when extract data: connection refused");
    }

    #[test]
    fn test_transient_errors() {
        assert!(ExtractionError::Timeout(30).is_transient());
        assert!(ExtractionError::Http {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!ExtractionError::Http {
            status: 401,
            body: String::new()
        }
        .is_transient());
        assert!(!ExtractionError::Unparseable("no json".into()).is_transient());
    }
}
