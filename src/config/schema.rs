//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use crate::duration::serde_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How long the host waits between reconciles of one resource
    #[serde(default = "default_poll_interval", with = "serde_duration")]
    pub poll_interval: Duration,

    /// Default output format for CLI commands
    #[serde(default)]
    pub output: OutputFormat,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Output format for CLI commands
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Yaml,
    Json,
    #[default]
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a temporary file instead of stderr
    #[serde(default = "default_false")]
    pub to_file: bool,
}

// Default value functions
fn default_poll_interval() -> Duration {
    crate::controller::DEFAULT_POLL_INTERVAL
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            output: OutputFormat::default(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_false(),
        }
    }
}
