//! Configuration handling for Truss
//!
//! Workspace-wide settings live under `[settings]` in `truss.toml`;
//! user-level defaults in `~/.config/truss/config.toml`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ConstraintPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Default output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Workspace-wide settings (`[settings]` in truss.toml)
///
/// The constraint policy is the single place the explicit-version-vs-pin
/// question is answered; there are no per-module exceptions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// How explicit dependency versions interact with constraint pins
    pub constraint_policy: ConstraintPolicy,
}

/// User-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

impl GlobalConfig {
    /// Returns the global config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "truss", "truss-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads the global configuration, defaulting when absent
    pub fn load() -> Result<Self> {
        let config_dir = match Self::config_dir() {
            Some(dir) => dir,
            None => return Ok(Self::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Saves the global configuration
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write global config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_strict() {
        let settings = WorkspaceSettings::default();
        assert_eq!(settings.constraint_policy, ConstraintPolicy::Strict);
    }

    #[test]
    fn parse_settings() {
        let settings: WorkspaceSettings =
            toml::from_str("constraint_policy = \"advisory\"").unwrap();
        assert_eq!(settings.constraint_policy, ConstraintPolicy::Advisory);
    }

    #[test]
    fn reject_unknown_settings() {
        let result: Result<WorkspaceSettings, _> = toml::from_str("constraint_polcy = \"strict\"");
        assert!(result.is_err());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn default_global_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.default_format, OutputFormat::Text);
    }
}
