//! Logging initialization

use anyhow::{Context, Result};
use provider_nop::config::LoggerConfig;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize logging from the logger config and the debug flag
///
/// RUST_LOG wins over both. Returns the log file path when logging to a file.
pub fn init_logging(debug: bool, logger: &LoggerConfig) -> Result<Option<PathBuf>> {
    let default_level = if debug { "debug" } else { logger.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if !logger.to_file {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(debug)
            .init();
        return Ok(None);
    }

    // Keep the temp file around after exit so it can be inspected
    let (file, path) = tempfile::Builder::new()
        .prefix("provider-nop-")
        .suffix(".log")
        .tempfile()
        .context("Failed to create log file")?
        .keep()
        .context("Failed to persist log file")?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_ansi(false) // No ANSI codes in log file
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(path))
}
