//! Event domain types
//!
//! Events are the progress notifications the remote service emits over a
//! run's lifetime. Each event carries exactly one detail variant; action ids
//! inside details are 1-based positions in the submitted action list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusCode;

/// One timestamped occurrence reported by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
    pub details: EventDetails,
}

/// Detail variant of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDetails {
    /// A step terminated with an exit status that fails the run
    UnexpectedExitStatus { action_id: i64, exit_status: i32 },

    /// A step's container exited; carries the tail of its standard error
    ContainerStopped {
        action_id: i64,
        exit_status: i32,
        stderr: Option<String>,
    },

    /// The run failed as a whole
    Failed {
        code: Option<StatusCode>,
        cause: String,
    },

    ContainerStarted { action_id: i64 },
    ContainerKilled { action_id: i64 },
    WorkerAssigned { zone: String, instance: String },
    WorkerReleased { zone: String, instance: String },
    PullStarted { image: String },
    PullStopped { image: String },
    Delayed { cause: String },

    /// An event shape this crate does not model
    Other,
}

impl Event {
    pub fn new(description: impl Into<String>, details: EventDetails) -> Self {
        Self {
            timestamp: None,
            description: description.into(),
            details,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Action id of an unexpected-exit event
    pub fn unexpected_exit_action(&self) -> Option<i64> {
        match self.details {
            EventDetails::UnexpectedExitStatus { action_id, .. } => Some(action_id),
            _ => None,
        }
    }

    /// Cause of a run-level failure event
    pub fn failure_cause(&self) -> Option<&str> {
        match &self.details {
            EventDetails::Failed { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Standard error captured when the given action's container stopped
    pub fn stderr_for(&self, id: i64) -> Option<&str> {
        match &self.details {
            EventDetails::ContainerStopped {
                action_id, stderr, ..
            } if *action_id == id => stderr.as_deref(),
            _ => None,
        }
    }

    pub fn started_action(&self) -> Option<i64> {
        match self.details {
            EventDetails::ContainerStarted { action_id } => Some(action_id),
            _ => None,
        }
    }

    pub fn stopped_action(&self) -> Option<i64> {
        match self.details {
            EventDetails::ContainerStopped { action_id, .. } => Some(action_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_only_their_variant() {
        let exit = Event::new(
            "Execution failed",
            EventDetails::UnexpectedExitStatus {
                action_id: 4,
                exit_status: 1,
            },
        );
        assert_eq!(exit.unexpected_exit_action(), Some(4));
        assert_eq!(exit.failure_cause(), None);
        assert_eq!(exit.stderr_for(4), None);

        let failed = Event::new(
            "Worker failed",
            EventDetails::Failed {
                code: Some(StatusCode::Unknown),
                cause: "boom".to_string(),
            },
        );
        assert_eq!(failed.failure_cause(), Some("boom"));
        assert_eq!(failed.unexpected_exit_action(), None);
    }

    #[test]
    fn test_stderr_for_requires_matching_action() {
        let stopped = Event::new(
            "Stopped running",
            EventDetails::ContainerStopped {
                action_id: 2,
                exit_status: 1,
                stderr: Some("no such file".to_string()),
            },
        );

        assert_eq!(stopped.stderr_for(2), Some("no such file"));
        assert_eq!(stopped.stderr_for(3), None);
        assert_eq!(stopped.stopped_action(), Some(2));
    }
}
