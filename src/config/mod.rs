//! Configuration system for provider-nop
//!
//! A single YAML config file layered over built-in defaults, with environment
//! variable overrides on top.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, LoggerConfig, OutputFormat};

use crate::duration::{format_duration, parse_duration};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "pollInterval" => Ok(format_duration(config.poll_interval)),
        "output" => Ok(config.output.to_string()),
        "logger.level" => Ok(config.logger.level.clone()),
        "logger.toFile" => Ok(config.logger.to_file.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "pollInterval" => {
            config.poll_interval = parse_duration(value)
                .context("pollInterval must be a duration such as '30s' or '1m'")?;
        }
        "output" => {
            config.output = value
                .parse::<OutputFormat>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("output must be 'yaml', 'json' or 'table'")?;
        }
        "logger.level" => {
            config.logger.level = value.to_string();
        }
        "logger.toFile" => {
            config.logger.to_file = value
                .parse()
                .context("logger.toFile must be 'true' or 'false'")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
