use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::summary::Units;

/// Settings read by the `tcxrs` binary; never written back
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging output settings
    pub logging: LogConfig,

    /// How summaries are rendered
    pub display: DisplaySettings,
}

/// Rendering preferences for the command-line interface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Distance units shown in tables
    pub units: Units,

    /// Output format for summaries
    pub output: OutputFormat,
}

/// Output formats for activity summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tcxrs")
            .join("config.toml")
    }

    /// Load the default configuration file, or defaults when it does not exist
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.display.units, deserialized.display.units);
        assert_eq!(config.logging.level, deserialized.logging.level);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [display]
            units = "imperial"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.units, Units::Imperial);
        assert_eq!(config.display.output, OutputFormat::Table);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [display]
            output = "json"

            [logging]
            level = "info"
            file = "/tmp/tcxrs/tcxrs.log"
            rotate_daily = true
            "#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.display.output, OutputFormat::Json);
        assert_eq!(loaded.display.units, Units::Metric);
        assert_eq!(loaded.logging.level, LogLevel::Info);
        assert_eq!(loaded.logging.file, Some(PathBuf::from("/tmp/tcxrs/tcxrs.log")));
        assert!(loaded.logging.rotate_daily);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        assert!(AppConfig::load_from_file(temp_dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "display = 3").unwrap();

        assert!(AppConfig::load_from_file(&config_path).is_err());
    }
}
