//! Remote operation domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Event;
use super::status::StatusCode;

/// Identity of a remote run, used as logging context only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOperation {
    /// Opaque operation name assigned by the remote service
    pub id: String,
    pub workflow_id: Uuid,
}

impl RemoteOperation {
    pub fn new(id: impl Into<String>, workflow_id: Uuid) -> Self {
        Self {
            id: id.into(),
            workflow_id,
        }
    }
}

impl std::fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (workflow {})", self.id, self.workflow_id)
    }
}

/// Terminal error reported for a run
///
/// Both fields may be missing in what the remote service sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub code: Option<StatusCode>,
    pub message: Option<String>,
}

impl OperationError {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
        }
    }
}

/// Point-in-time view of a remote run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSnapshot {
    pub done: bool,
    pub error: Option<OperationError>,
    pub events: Vec<Event>,
}
