//! Action command handlers
//!
//! Builds localization, delocalization or full action lists for a task and
//! prints them in their wire shape.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use batchline_actions::PipelineBuilder;
use batchline_core::domain::action::Action;
use batchline_core::dto::action::ActionDto;
use clap::Subcommand;
use colored::*;

use crate::config::Config;
use crate::task::load_task;

/// Action subcommands
#[derive(Subcommand)]
pub enum ActionCommands {
    /// Print the localization actions of a task
    Localization {
        /// Task description (JSON)
        #[arg(short, long)]
        task: PathBuf,
    },
    /// Print the delocalization actions of a task
    Delocalization {
        /// Task description (JSON)
        #[arg(short, long)]
        task: PathBuf,
    },
    /// Print the full action list submitted for a task
    Pipeline {
        /// Task description (JSON)
        #[arg(short, long)]
        task: PathBuf,
    },
}

/// Handle action commands
///
/// # Arguments
/// * `command` - The action command to execute
/// * `config` - The CLI configuration
pub async fn handle_actions_command(command: ActionCommands, config: &Config) -> Result<()> {
    let builder = PipelineBuilder::new(config.transfer_config());

    match command {
        ActionCommands::Localization { task } => {
            let task_file = load_task(&task).await?;
            let actions = builder
                .localization_actions(&task_file.parameters, &task_file.mounts)
                .context("Failed to build localization actions")?;
            print_actions(&task, "localization", &actions)
        }
        ActionCommands::Delocalization { task } => {
            let task_file = load_task(&task).await?;
            let actions = builder.delocalization_actions(&task_file.parameters, &task_file.mounts);
            print_actions(&task, "delocalization", &actions)
        }
        ActionCommands::Pipeline { task } => {
            let task_file = load_task(&task).await?;
            let actions = builder
                .pipeline(&task_file.parameters, &task_file.mounts)
                .context("Failed to build action list")?;
            print_actions(&task, "pipeline", &actions)
        }
    }
}

/// Prints actions as wire JSON on stdout with a summary on stderr
fn print_actions(task: &Path, kind: &str, actions: &[Action]) -> Result<()> {
    let dtos: Vec<ActionDto> = actions.iter().map(ActionDto::from).collect();
    let json = serde_json::to_string_pretty(&dtos).context("Failed to serialize actions")?;

    eprintln!(
        "{} Built {} {} action(s) for {}",
        "✓".green().bold(),
        actions.len(),
        kind,
        task.display().to_string().dimmed()
    );
    println!("{}", json);
    Ok(())
}
