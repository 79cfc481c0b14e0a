//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod config;
mod logging;
mod version;

pub use commands::{get, reconcile, run, validate};
pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::*;
pub use version::display_version;

use clap::{Parser, Subcommand};
use provider_nop::config::OutputFormat;
use provider_nop::duration::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

/// provider-nop - a managed resource provider that does nothing, on a schedule
#[derive(Parser, Debug)]
#[command(name = "provider-nop")]
#[command(version, about = "Reconcile NopResources whose conditions appear on a schedule", long_about = None)]
pub struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one reconcile cycle over a manifest and print the result
    Reconcile {
        /// Manifest file with one or more NopResources
        file: PathBuf,
        /// Evaluate each resource as if it were this old (e.g., "30s", "1m30s")
        #[arg(long, value_parser = parse_duration)]
        age: Option<Duration>,
        /// Output format (defaults to the configured output)
        #[arg(long, short = 'o', value_enum)]
        output: Option<OutputFormat>,
    },
    /// Show the READY/SYNCED/AGE table after one reconcile cycle
    Get {
        /// Manifest file with one or more NopResources
        file: PathBuf,
        /// Evaluate each resource as if it were this old
        #[arg(long, value_parser = parse_duration)]
        age: Option<Duration>,
    },
    /// Reconcile a manifest continuously on the poll interval
    Run {
        /// Manifest file with one or more NopResources
        file: PathBuf,
        /// Override the configured poll interval
        #[arg(long, value_parser = parse_duration)]
        poll_interval: Option<Duration>,
        /// Stop each resource after this many reconciles
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Check a manifest without reconciling it
    Validate {
        /// Manifest file with one or more NopResources
        file: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}
