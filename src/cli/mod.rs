//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the wizard and split engine.

pub mod extract;
pub mod split;

use clap::Args;

use crate::config::api::{API_BASE_VAR, API_KEY_VAR, MOCK_FALLBACK_VAR, MODEL_VAR};
use crate::config::{ApiConfig, Settings};
use crate::error::PatunganResult;

pub use extract::{handle_extract_command, BillFormat, ExtractArgs};
pub use split::{handle_split_command, SplitArgs};

/// Extraction service options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    /// API key for the extraction service
    #[arg(long, env = API_KEY_VAR, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Chat completions endpoint, used as-is
    #[arg(long, env = API_BASE_VAR, global = true)]
    pub api_base: Option<String>,

    /// Vision model id (the service default when unset)
    #[arg(long, env = MODEL_VAR, global = true)]
    pub model: Option<String>,

    /// Use the demo bill when the model's answer cannot be read
    #[arg(long, env = MOCK_FALLBACK_VAR, global = true)]
    pub mock_fallback: bool,
}

impl ApiArgs {
    /// Build the API config, failing with the name of any missing variable
    pub fn api_config(&self) -> PatunganResult<ApiConfig> {
        ApiConfig::new(
            self.api_key.clone(),
            self.api_base.clone(),
            self.model.clone(),
        )
    }

    /// Apply command-line overrides to the loaded settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if self.mock_fallback {
            settings.mock_fallback = true;
        }
    }
}
