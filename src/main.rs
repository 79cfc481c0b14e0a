//! provider-nop - reconcile NopResources whose conditions appear on a schedule
//!
//! Loads NopResource manifests and runs the reconciliation step over them,
//! either once or continuously on the poll interval.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use provider_nop::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config and version commands run without logging or a loaded config
    let command = match args.command {
        Command::Config { subcommand } => return cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            return Ok(());
        }
        command => command,
    };

    let config = ConfigLoader::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable configuration: {:#}", e);
        ConfigLoader::load_defaults()
    });

    let log_file = cli::init_logging(args.debug, &config.logger)?;
    if let Some(ref log_path) = log_file {
        eprintln!("Logs written to: {}", log_path.display());
    }

    tracing::debug!(
        poll_interval = ?config.poll_interval,
        output = %config.output,
        "Configuration loaded"
    );

    match command {
        Command::Reconcile { file, age, output } => {
            cli::reconcile(&file, age, output.unwrap_or(config.output), &config).await
        }
        Command::Get { file, age } => cli::get(&file, age, &config).await,
        Command::Run {
            file,
            poll_interval,
            cycles,
        } => cli::run(&file, poll_interval, cycles, &config).await,
        Command::Validate { file } => cli::validate(&file),
        Command::Config { .. } | Command::Version => Ok(()),
    }
}
