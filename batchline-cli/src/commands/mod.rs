//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod actions;
mod status;

pub use actions::ActionCommands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the action list of a task
    Actions {
        #[command(subcommand)]
        command: ActionCommands,
    },
    /// Classify a polled remote operation
    Status {
        /// Task description (JSON)
        #[arg(short, long)]
        task: PathBuf,

        /// Polled operation (JSON)
        #[arg(short, long)]
        operation: PathBuf,

        /// Action list that was submitted, rebuilt from the task when absent
        #[arg(short, long)]
        actions: Option<PathBuf>,

        /// Print the classified status as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Actions { command } => actions::handle_actions_command(command, config).await,
        Commands::Status {
            task,
            operation,
            actions,
            json,
        } => status::handle_status_command(&task, &operation, actions.as_deref(), json, config).await,
    }
}
