//! Configuration loading and merging logic
//!
//! Handles loading configuration from the config file and environment
//! overrides according to precedence rules.

use super::{paths, schema::Config};
use crate::duration::parse_duration;
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        let root_path = paths::root_config_path();
        let config = if root_path.exists() {
            Self::load_file(&root_path)?
        } else {
            Self::load_defaults()
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::load_defaults());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the config file (if any) and the merged result
    ///
    /// Fails on invalid YAML syntax, invalid value types, and a zero poll
    /// interval, which would make the host spin.
    pub fn validate() -> Result<()> {
        let config = Self::load().context("Failed to load configuration")?;
        Self::check(&config)
    }

    /// Check semantic constraints on an already parsed configuration
    pub fn check(config: &Config) -> Result<()> {
        if config.poll_interval.is_zero() {
            return Err(anyhow::anyhow!("pollInterval must be greater than zero"));
        }
        tracing_subscriber::EnvFilter::try_new(&config.logger.level)
            .with_context(|| format!("Invalid logger.level: {}", config.logger.level))?;
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // PROVIDER_NOP_POLL_INTERVAL override
        if let Ok(raw) = std::env::var("PROVIDER_NOP_POLL_INTERVAL") {
            match parse_duration(&raw) {
                Ok(interval) => config.poll_interval = interval,
                Err(e) => tracing::warn!("Ignoring PROVIDER_NOP_POLL_INTERVAL={}: {}", raw, e),
            }
        }

        // PROVIDER_NOP_OUTPUT override
        if let Ok(raw) = std::env::var("PROVIDER_NOP_OUTPUT") {
            match raw.parse() {
                Ok(output) => config.output = output,
                Err(e) => tracing::warn!("Ignoring PROVIDER_NOP_OUTPUT={}: {}", raw, e),
            }
        }

        // PROVIDER_NOP_LOG_LEVEL override
        if let Ok(level) = std::env::var("PROVIDER_NOP_LOG_LEVEL") {
            config.logger.level = level;
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
