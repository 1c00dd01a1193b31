//! Operation DTOs
//!
//! Wire shape of a polled remote operation and its event metadata. Every
//! field is optional on the wire; conversion into the domain never fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::event::{Event, EventDetails};
use crate::domain::operation::{OperationError, OperationSnapshot};
use crate::domain::status::StatusCode;

/// Polled operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDto {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub error: Option<ErrorDto>,

    #[serde(default)]
    pub metadata: Option<MetadataDto>,
}

/// Terminal error of an operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDto {
    #[serde(default)]
    pub code: Option<CodeDto>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Status code, sent either numerically or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeDto {
    Number(i64),
    Name(String),
}

impl CodeDto {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            CodeDto::Number(code) => StatusCode::from_code(*code),
            CodeDto::Name(name) => StatusCode::parse(name).unwrap_or(StatusCode::Unknown),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDto {
    #[serde(default)]
    pub events: Vec<EventDto>,
}

/// Event as reported by the remote service; at most one detail is populated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub unexpected_exit_status: Option<UnexpectedExitStatusDto>,

    #[serde(default)]
    pub container_stopped: Option<ContainerStoppedDto>,

    #[serde(default)]
    pub failed: Option<FailedDto>,

    #[serde(default)]
    pub container_started: Option<ContainerRefDto>,

    #[serde(default)]
    pub container_killed: Option<ContainerRefDto>,

    #[serde(default)]
    pub worker_assigned: Option<WorkerDto>,

    #[serde(default)]
    pub worker_released: Option<WorkerDto>,

    #[serde(default)]
    pub pull_started: Option<PullDto>,

    #[serde(default)]
    pub pull_stopped: Option<PullDto>,

    #[serde(default)]
    pub delayed: Option<DelayedDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnexpectedExitStatusDto {
    #[serde(default)]
    pub action_id: i64,
    #[serde(default)]
    pub exit_status: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStoppedDto {
    #[serde(default)]
    pub action_id: i64,
    #[serde(default)]
    pub exit_status: i32,
    #[serde(default)]
    pub stderr: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailedDto {
    #[serde(default)]
    pub code: Option<CodeDto>,
    #[serde(default)]
    pub cause: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRefDto {
    #[serde(default)]
    pub action_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerDto {
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub instance: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullDto {
    #[serde(default)]
    pub image_uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelayedDto {
    #[serde(default)]
    pub cause: String,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

impl EventDto {
    fn details(self) -> EventDetails {
        if let Some(exit) = self.unexpected_exit_status {
            return EventDetails::UnexpectedExitStatus {
                action_id: exit.action_id,
                exit_status: exit.exit_status,
            };
        }
        if let Some(stopped) = self.container_stopped {
            return EventDetails::ContainerStopped {
                action_id: stopped.action_id,
                exit_status: stopped.exit_status,
                stderr: stopped.stderr,
            };
        }
        if let Some(failed) = self.failed {
            return EventDetails::Failed {
                code: failed.code.as_ref().map(CodeDto::to_status_code),
                cause: failed.cause,
            };
        }
        if let Some(started) = self.container_started {
            return EventDetails::ContainerStarted {
                action_id: started.action_id,
            };
        }
        if let Some(killed) = self.container_killed {
            return EventDetails::ContainerKilled {
                action_id: killed.action_id,
            };
        }
        if let Some(worker) = self.worker_assigned {
            return EventDetails::WorkerAssigned {
                zone: worker.zone,
                instance: worker.instance,
            };
        }
        if let Some(worker) = self.worker_released {
            return EventDetails::WorkerReleased {
                zone: worker.zone,
                instance: worker.instance,
            };
        }
        if let Some(pull) = self.pull_started {
            return EventDetails::PullStarted {
                image: pull.image_uri,
            };
        }
        if let Some(pull) = self.pull_stopped {
            return EventDetails::PullStopped {
                image: pull.image_uri,
            };
        }
        if let Some(delayed) = self.delayed {
            return EventDetails::Delayed {
                cause: delayed.cause,
            };
        }
        EventDetails::Other
    }
}

impl From<EventDto> for Event {
    fn from(mut dto: EventDto) -> Self {
        let timestamp = dto.timestamp.take().as_deref().and_then(parse_timestamp);
        let description = std::mem::take(&mut dto.description);

        Self {
            timestamp,
            description,
            details: dto.details(),
        }
    }
}

impl From<ErrorDto> for OperationError {
    fn from(dto: ErrorDto) -> Self {
        Self {
            code: dto.code.as_ref().map(CodeDto::to_status_code),
            message: dto.message,
        }
    }
}

impl From<OperationDto> for OperationSnapshot {
    fn from(dto: OperationDto) -> Self {
        Self {
            done: dto.done,
            error: dto.error.map(OperationError::from),
            events: dto
                .metadata
                .map(|metadata| metadata.events.into_iter().map(Event::from).collect())
                .unwrap_or_default(),
        }
    }
}
