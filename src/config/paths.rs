//! Path management for Patungan
//!
//! ## Path Resolution Order
//!
//! 1. `PATUNGAN_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/patungan` on Linux,
//!    `~/Library/Application Support/patungan` on macOS, `%APPDATA%\patungan` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PatunganError;

/// Environment variable overriding the base directory
pub const DATA_DIR_VAR: &str = "PATUNGAN_DATA_DIR";

/// Manages all paths used by Patungan
#[derive(Debug, Clone)]
pub struct PatunganPaths {
    base_dir: PathBuf,
}

impl PatunganPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PatunganError> {
        let base_dir = match std::env::var(DATA_DIR_VAR) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "patungan")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    PatunganError::Config(format!(
                        "Could not determine a config directory; set {}",
                        DATA_DIR_VAR
                    ))
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create PatunganPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Log file written while the TUI owns the terminal
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("patungan.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), PatunganError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PatunganError::Io(format!("Failed to create base directory: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PatunganPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.log_file(), temp_dir.path().join("patungan.log"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_VAR, custom_path);
        let paths = PatunganPaths::new().unwrap();
        env::remove_var(DATA_DIR_VAR);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let paths = PatunganPaths::with_base_dir(nested.clone());

        paths.ensure_directories().unwrap();
        assert!(nested.is_dir());
    }
}
