//! Status command handler
//!
//! Classifies a polled remote operation against the action list submitted
//! for its task and prints the outcome.

use std::path::Path;

use anyhow::{Context, Result};
use batchline_actions::PipelineBuilder;
use batchline_core::domain::action::Action;
use batchline_core::domain::operation::{OperationSnapshot, RemoteOperation};
use batchline_core::domain::status::{ExecutionEvent, RunStatus};
use batchline_status::{PreemptionMarker, RunStatusInterpreter};
use colored::*;
use tracing::debug;

use crate::config::Config;
use crate::task::{TaskFile, load_actions, load_operation, load_task};

/// Handle the status command
///
/// # Arguments
/// * `task_path` - Task description the operation was submitted for
/// * `operation_path` - Polled operation
/// * `actions_path` - Submitted action list, rebuilt from the task when absent
/// * `json` - Print the status as JSON instead of a summary
/// * `config` - The CLI configuration
pub async fn handle_status_command(
    task_path: &Path,
    operation_path: &Path,
    actions_path: Option<&Path>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let task = load_task(task_path).await?;
    let actions = submitted_actions(&task, actions_path, config).await?;
    debug!("Interpreting against {} submitted action(s)", actions.len());

    let operation = load_operation(operation_path).await?;
    let identity = RemoteOperation::new(operation.name.clone(), task.workflow_id());
    let snapshot = OperationSnapshot::from(operation);

    let status = RunStatusInterpreter::new(&actions, task.context())
        .with_operation(identity)
        .with_preemption_detector(PreemptionMarker::new(config.preemption_marker.clone()))
        .classify(&snapshot);

    if json {
        let output = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{}", output);
    } else {
        print_status(&status);
    }

    Ok(())
}

async fn submitted_actions(
    task: &TaskFile,
    actions_path: Option<&Path>,
    config: &Config,
) -> Result<Vec<Action>> {
    match actions_path {
        Some(path) => Ok(load_actions(path)
            .await?
            .into_iter()
            .map(Action::from)
            .collect()),
        None => PipelineBuilder::new(config.transfer_config())
            .pipeline(&task.parameters, &task.mounts)
            .context("Failed to rebuild the submitted action list"),
    }
}

fn colorize_status(status: &RunStatus) -> colored::ColoredString {
    let name = status.name();
    match status {
        RunStatus::Running => name.cyan(),
        RunStatus::Success(_) => name.green(),
        RunStatus::Preempted(_) | RunStatus::QuotaFailed(_) => name.yellow(),
        RunStatus::Cancelled(_) => name.dimmed(),
        RunStatus::Failed(_) => name.red(),
    }
}

/// Renders a span as `name  start → end (duration)`
fn format_span(event: &ExecutionEvent) -> String {
    let start = event.start.format("%H:%M:%S");
    match (event.end, event.duration()) {
        (Some(end), Some(duration)) => format!(
            "{}  {} → {} ({}s)",
            event.name,
            start,
            end.format("%H:%M:%S"),
            duration.num_seconds()
        ),
        _ => format!("{}  {} → …", event.name, start),
    }
}

fn print_placement(machine_type: Option<&str>, zone: Option<&str>, instance: Option<&str>) {
    if let Some(machine_type) = machine_type {
        println!("  Machine:   {}", machine_type.dimmed());
    }
    if let Some(zone) = zone {
        println!("  Zone:      {}", zone.dimmed());
    }
    if let Some(instance) = instance {
        println!("  Instance:  {}", instance.dimmed());
    }
}

fn print_timeline(events: &[ExecutionEvent]) {
    if events.is_empty() {
        return;
    }

    println!();
    println!("{}", "Execution events:".bold());
    for event in events {
        println!("  {} {}", "▸".cyan(), format_span(event));
    }
}

fn print_status(status: &RunStatus) {
    println!("{}", "Run Status:".bold());
    println!("  Status:    {}", colorize_status(status));

    match status {
        RunStatus::Running => {}
        RunStatus::Success(details) => {
            print_placement(
                details.machine_type.as_deref(),
                details.zone.as_deref(),
                details.instance_name.as_deref(),
            );
            print_timeline(&details.execution_events);
        }
        RunStatus::Preempted(details)
        | RunStatus::Cancelled(details)
        | RunStatus::QuotaFailed(details)
        | RunStatus::Failed(details) => {
            println!("  Code:      {}", details.code.to_string().red());
            if let Some(message) = &details.error_message {
                println!("  Error:     {}", message);
            }
            println!(
                "  Retryable: {}",
                if status.is_retryable() {
                    "yes".green()
                } else {
                    "no".dimmed()
                }
            );
            println!("  Preemptible: {}", details.was_preemptible);
            print_placement(
                details.machine_type.as_deref(),
                details.zone.as_deref(),
                details.instance_name.as_deref(),
            );

            if !details.messages.is_empty() {
                println!();
                println!("{}", "Diagnostics:".bold());
                println!("{}", "─".repeat(80).dimmed());
                for message in &details.messages {
                    println!("  {}", message);
                }
                println!("{}", "─".repeat(80).dimmed());
            }

            print_timeline(&details.execution_events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_span() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let mut event = ExecutionEvent {
            name: "Localization".to_string(),
            start,
            end: Some(start + chrono::Duration::seconds(90)),
        };

        assert_eq!(format_span(&event), "Localization  10:00:00 → 10:01:30 (90s)");

        event.end = None;
        assert_eq!(format_span(&event), "Localization  10:00:00 → …");
    }
}
