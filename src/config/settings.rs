//! User settings for Patungan
//!
//! Display preferences and extraction request tuning, persisted as JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::PatunganPaths;
use crate::error::PatunganError;
use crate::models::DEFAULT_PARTICIPANT;

/// User settings for Patungan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown before amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Name of the participant every session starts with
    #[serde(default = "default_participant")]
    pub default_participant: String,

    /// Serve the demo bill when the model's answer cannot be parsed
    #[serde(default)]
    pub mock_fallback: bool,

    /// Seconds to wait for the extraction service
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on the model's answer length
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; low for repeatable extraction
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "Rp".to_string()
}

fn default_participant() -> String {
    DEFAULT_PARTICIPANT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    700
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_participant: default_participant(),
            mock_fallback: false,
            request_timeout_secs: default_request_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Settings {
    /// Extraction timeout; never zero
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &PatunganPaths) -> Result<Self, PatunganError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PatunganError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PatunganError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PatunganPaths) -> Result<(), PatunganError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PatunganError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            PatunganError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
