//! Configuration for the linux-cru front end.
//!
//! Every field has a default, so a missing or partial file is fine:
//!
//! ```yaml
//! display: DP-0
//! dialect: nvidia
//! blanking: auto
//! force_enable: false
//! quirks: true
//! constraints: /home/user/.config/linux-cru/dp0.yaml
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use linuxcru_common::LogFormat;
use linuxcru_core::{CapabilityConstraint, TargetDialect};

use crate::cli::Args;
use crate::policy::BlankingChoice;

/// Location checked when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/linux-cru/config.yaml";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display (xrandr output) the fragment is written for
    pub display: String,
    /// Configuration dialect name
    pub dialect: String,
    /// Blanking mode, or `auto` for the fallback policy
    pub blanking: BlankingChoice,
    /// Accept modes the constraints reject
    pub force_enable: bool,
    /// Consult the display quirk table
    pub quirks: bool,
    /// Capability constraint file
    pub constraints: Option<PathBuf>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: "default".to_string(),
            dialect: TargetDialect::Generic.as_str().to_string(),
            blanking: BlankingChoice::Auto,
            force_enable: false,
            quirks: false,
            constraints: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty.as_str().to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the explicit config file, else the default location if present,
    /// else defaults. Returns the path actually loaded.
    pub fn resolve(args: &Args) -> Result<(Self, Option<PathBuf>)> {
        let (config, source) = match &args.config {
            Some(path) => (Self::load(path)?, Some(path.clone())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    (Self::load(default_path)?, Some(default_path.to_path_buf()))
                } else {
                    (Self::default(), None)
                }
            }
        };

        let config = config.with_cli_overrides(args);
        config.validate()?;
        Ok((config, source))
    }

    /// Apply CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(ref display) = args.display {
            self.display = display.clone();
        }

        if let Some(ref dialect) = args.dialect {
            self.dialect = dialect.clone();
        }

        if let Some(blanking) = args.blanking {
            self.blanking = blanking;
        }

        if args.force {
            self.force_enable = true;
        }

        if args.quirks {
            self.quirks = true;
        }

        if let Some(ref constraints) = args.constraints {
            self.constraints = Some(constraints.clone());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }

        if let Some(ref format) = args.log_format {
            self.logging.format = format.clone();
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.trim().is_empty() || self.display.contains('"') {
            return Err(ConfigError::InvalidValue {
                field: "display".to_string(),
                message: "must be a non-empty name without quotes".to_string(),
            });
        }

        if self.dialect.parse::<TargetDialect>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "dialect".to_string(),
                message: "must be one of: generic, xorg, nvidia, vendor, nvidia-modprobe, modprobe"
                    .to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                message: format!("must be one of: {:?}", valid_levels),
            });
        }

        if self.logging.format.parse::<LogFormat>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "logging.format".to_string(),
                message: "must be one of: pretty, json".to_string(),
            });
        }

        Ok(())
    }

    /// Parsed dialect. Only valid after [`Config::validate`].
    pub fn target_dialect(&self) -> Result<TargetDialect> {
        self.dialect
            .parse()
            .with_context(|| format!("Invalid dialect: {}", self.dialect))
    }

    /// Parsed log format, falling back to pretty output.
    pub fn log_format(&self) -> LogFormat {
        self.logging.format.parse().unwrap_or_default()
    }

    /// Load the capability constraint file, if one is configured.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn load_constraint(&self) -> Result<Option<CapabilityConstraint>> {
        let Some(path) = &self.constraints else {
            return Ok(None);
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read constraint file: {}", path.display()))?;

        let constraint = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse constraint file: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse constraint file: {}", path.display()))?
        };

        Ok(Some(constraint))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["linux-cru", "1920", "1080", "60"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dialect, "generic");
        assert_eq!(config.blanking, BlankingChoice::Auto);
        assert!(!config.force_enable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(&args(&[
            "--display",
            "HDMI-1",
            "--dialect",
            "vendor",
            "-b",
            "reduced",
            "--force",
            "-l",
            "debug",
        ]));

        assert_eq!(config.display, "HDMI-1");
        assert_eq!(config.target_dialect().unwrap(), TargetDialect::Nvidia);
        assert_eq!(config.blanking, BlankingChoice::Reduced);
        assert!(config.force_enable);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overrides_keep_file_values() {
        let base = Config {
            display: "DP-0".to_string(),
            quirks: true,
            ..Default::default()
        };
        let config = base.clone().with_cli_overrides(&args(&[]));
        assert_eq!(config, base);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.dialect = "wayland".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "dialect"
        ));

        config.dialect = "xorg".to_string();
        config.display = "DP \"0\"".to_string();
        assert!(config.validate().is_err());

        config.display = "DP-0".to_string();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "WARN".to_string();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        config.logging.format = "json".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_partial_yaml() {
        let config: Config =
            serde_yaml::from_str("dialect: nvidia\nblanking: reduced-v2\n").unwrap();
        assert_eq!(config.dialect, "nvidia");
        assert_eq!(config.blanking, BlankingChoice::ReducedV2);
        assert_eq!(config.display, "default");
        assert_eq!(config.logging.level, "info");
    }
}
