//! Configuration module for Patungan
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Extraction service credentials from the environment

pub mod api;
pub mod paths;
pub mod settings;

pub use api::ApiConfig;
pub use paths::PatunganPaths;
pub use settings::Settings;
