//! Batchline CLI
//!
//! Builds the action list of a task and classifies polled remote operations.

mod commands;
mod config;
mod task;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "batchline")]
#[command(about = "Batch task action builder and run status interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries command output, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "batchline_cli=info,batchline_actions=info,batchline_status=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = load_config()?;
    debug!(
        "Loaded configuration: transfer_attempts={}, bulk_schemes={:?}",
        config.transfer_attempts, config.bulk_schemes
    );

    handle_command(cli.command, &config).await
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}
