//! Application configuration.
//!
//! Stored as JSON in the platform config directory
//! (`<config_dir>/datacontract/config.json`). Missing keys take their default
//! values and a missing file means "all defaults".

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Draft used by the editor when no path is given on the command line.
pub const DEFAULT_DRAFT_FILE: &str = "contract.draft.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Also write logs to rotating files in the data directory
    pub file_logging: bool,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Draft opened by `edit` without an explicit path
    pub default_draft: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            file_logging: false,
            log_level: "warn".to_owned(),
            default_draft: PathBuf::from(DEFAULT_DRAFT_FILE),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    ///
    /// # Errors
    ///
    /// Fails when the platform has no config directory.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("datacontract").join("config.json"))
    }

    /// Load configuration from the standard location
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Save configuration to the standard location
    ///
    /// # Errors
    ///
    /// Fails when the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Fails when the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = AppConfig {
            file_logging: true,
            log_level: "debug".to_owned(),
            default_draft: PathBuf::from("drafts/orders.json"),
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "file_logging": true }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.file_logging);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.default_draft, PathBuf::from(DEFAULT_DRAFT_FILE));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
