//! Extraction service credentials
//!
//! Read from the environment (or the matching command-line flags). The API key
//! is wiped from memory when the config is dropped and never printed.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{PatunganError, PatunganResult};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the chat completions endpoint
pub const API_BASE_VAR: &str = "OPENROUTER_API_BASE";
/// Environment variable holding the model id
pub const MODEL_VAR: &str = "AI_MODEL";
/// Environment variable overriding the mock fallback setting
pub const MOCK_FALLBACK_VAR: &str = "PATUNGAN_MOCK_FALLBACK";

/// Where and how to reach the extraction service
#[derive(Clone)]
pub struct ApiConfig {
    api_key: Zeroizing<String>,
    api_base: String,
    model: Option<String>,
}

impl ApiConfig {
    /// Build from optional values; blank values count as missing
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing variable.
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        model: Option<String>,
    ) -> PatunganResult<Self> {
        let api_key = non_blank(api_key).ok_or_else(|| missing(API_KEY_VAR))?;
        let api_base = non_blank(api_base).ok_or_else(|| missing(API_BASE_VAR))?;

        Ok(Self {
            api_key: Zeroizing::new(api_key),
            api_base,
            model: non_blank(model),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Full chat completions URL, used as-is
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// The key with everything but its last four characters masked
    pub fn redacted_key(&self) -> String {
        redact(&self.api_key)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.redacted_key())
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

/// Mask a secret for display
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing(var: &str) -> PatunganError {
    PatunganError::Config(format!(
        "{} is not set. Export it or pass it on the command line.",
        var
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_variable() {
        let err = ApiConfig::new(None, Some("http://localhost".into()), None).unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));

        let err = ApiConfig::new(Some("sk-test".into()), Some("   ".into()), None).unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_BASE"));
    }

    #[test]
    fn test_model_is_optional() {
        let config = ApiConfig::new(
            Some("sk-or-v1-abcdef123456".into()),
            Some("https://openrouter.ai/api/v1/chat/completions".into()),
            Some("".into()),
        )
        .unwrap();
        assert_eq!(config.model(), None);
        assert_eq!(
            config.api_base(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_key_never_printed() {
        let config = ApiConfig::new(
            Some("sk-or-v1-abcdef123456".into()),
            Some("http://localhost".into()),
            Some("google/gemini-flash-1.5".into()),
        )
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("abcdef"));
        assert!(debug.contains("****3456"));
        assert_eq!(redact("short"), "****");
    }
}
