//! Task and operation files read by the CLI

use std::path::Path;

use anyhow::{Context, Result};
use batchline_actions::TaskParameters;
use batchline_core::domain::mount::Mount;
use batchline_core::dto::action::ActionDto;
use batchline_core::dto::operation::OperationDto;
use batchline_status::TaskContext;
use serde::Deserialize;
use uuid::Uuid;

/// A task description as written to disk
#[derive(Debug, Clone, Deserialize)]
pub struct TaskFile {
    #[serde(flatten)]
    pub parameters: TaskParameters,

    #[serde(default)]
    pub mounts: Vec<Mount>,

    #[serde(default)]
    pub workflow_id: Option<Uuid>,

    #[serde(default)]
    pub preemptible: bool,

    #[serde(default)]
    pub machine_type: Option<String>,

    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub instance_name: Option<String>,
}

impl TaskFile {
    /// Interpreter context derived from the task
    pub fn context(&self) -> TaskContext {
        TaskContext {
            machine_type: self.machine_type.clone(),
            zone: self.zone.clone(),
            instance_name: self.instance_name.clone(),
            preemptible: self.preemptible,
            execution_events: Vec::new(),
        }
    }

    pub fn workflow_id(&self) -> Uuid {
        self.workflow_id.unwrap_or_else(Uuid::nil)
    }
}

/// Reads and parses a JSON file
async fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

pub async fn load_task(path: &Path) -> Result<TaskFile> {
    read_json(path, "task").await
}

pub async fn load_operation(path: &Path) -> Result<OperationDto> {
    read_json(path, "operation").await
}

/// Loads a previously submitted action list
pub async fn load_actions(path: &Path) -> Result<Vec<ActionDto>> {
    read_json(path, "actions").await
}
