//! Run status domain types
//!
//! Status codes reported by the remote service and the typed outcome the
//! interpreter produces from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard RPC status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl StatusCode {
    /// Maps a numeric code; values outside the standard range are `Unknown`
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::Cancelled,
            3 => StatusCode::InvalidArgument,
            4 => StatusCode::DeadlineExceeded,
            5 => StatusCode::NotFound,
            6 => StatusCode::AlreadyExists,
            7 => StatusCode::PermissionDenied,
            8 => StatusCode::ResourceExhausted,
            9 => StatusCode::FailedPrecondition,
            10 => StatusCode::Aborted,
            11 => StatusCode::OutOfRange,
            12 => StatusCode::Unimplemented,
            13 => StatusCode::Internal,
            14 => StatusCode::Unavailable,
            15 => StatusCode::DataLoss,
            16 => StatusCode::Unauthenticated,
            _ => StatusCode::Unknown,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::Cancelled => 1,
            StatusCode::Unknown => 2,
            StatusCode::InvalidArgument => 3,
            StatusCode::DeadlineExceeded => 4,
            StatusCode::NotFound => 5,
            StatusCode::AlreadyExists => 6,
            StatusCode::PermissionDenied => 7,
            StatusCode::ResourceExhausted => 8,
            StatusCode::FailedPrecondition => 9,
            StatusCode::Aborted => 10,
            StatusCode::OutOfRange => 11,
            StatusCode::Unimplemented => 12,
            StatusCode::Internal => 13,
            StatusCode::Unavailable => 14,
            StatusCode::DataLoss => 15,
            StatusCode::Unauthenticated => 16,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Cancelled => "CANCELLED",
            StatusCode::Unknown => "UNKNOWN",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::AlreadyExists => "ALREADY_EXISTS",
            StatusCode::PermissionDenied => "PERMISSION_DENIED",
            StatusCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            StatusCode::FailedPrecondition => "FAILED_PRECONDITION",
            StatusCode::Aborted => "ABORTED",
            StatusCode::OutOfRange => "OUT_OF_RANGE",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unavailable => "UNAVAILABLE",
            StatusCode::DataLoss => "DATA_LOSS",
            StatusCode::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Parses a code name such as `FAILED_PRECONDITION`
    pub fn parse(name: &str) -> Option<Self> {
        (0..=16)
            .map(StatusCode::from_code)
            .find(|code| code.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named span of the task's lifetime, recovered from the event timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl ExecutionEvent {
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end.map(|end| end - self.start)
    }
}

/// Details of a successfully completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessDetails {
    pub execution_events: Vec<ExecutionEvent>,
    pub machine_type: Option<String>,
    pub zone: Option<String>,
    pub instance_name: Option<String>,
}

/// Details carried by every unsuccessful outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsuccessfulDetails {
    /// Resolved status code of the terminal error
    pub code: StatusCode,

    /// Message of the terminal error, if the remote service sent one
    pub error_message: Option<String>,

    /// Diagnostics, with the most relevant unexpected exit last
    pub messages: Vec<String>,

    pub execution_events: Vec<ExecutionEvent>,
    pub machine_type: Option<String>,
    pub zone: Option<String>,
    pub instance_name: Option<String>,
    pub was_preemptible: bool,
}

/// Category of an unsuccessful outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsuccessfulKind {
    Preempted,
    QuotaFailed,
    Cancelled,
    Failed,
}

impl UnsuccessfulKind {
    pub fn into_status(self, details: UnsuccessfulDetails) -> RunStatus {
        match self {
            UnsuccessfulKind::Preempted => RunStatus::Preempted(details),
            UnsuccessfulKind::QuotaFailed => RunStatus::QuotaFailed(details),
            UnsuccessfulKind::Cancelled => RunStatus::Cancelled(details),
            UnsuccessfulKind::Failed => RunStatus::Failed(details),
        }
    }
}

/// Classified outcome of a remote run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success(SuccessDetails),
    Preempted(UnsuccessfulDetails),
    Cancelled(UnsuccessfulDetails),
    QuotaFailed(UnsuccessfulDetails),
    Failed(UnsuccessfulDetails),
}

impl RunStatus {
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Running => "Running",
            RunStatus::Success(_) => "Success",
            RunStatus::Preempted(_) => "Preempted",
            RunStatus::Cancelled(_) => "Cancelled",
            RunStatus::QuotaFailed(_) => "QuotaFailed",
            RunStatus::Failed(_) => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }

    /// Preemption and quota exhaustion are transient; a retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, RunStatus::Preempted(_) | RunStatus::QuotaFailed(_))
    }

    pub fn unsuccessful_details(&self) -> Option<&UnsuccessfulDetails> {
        match self {
            RunStatus::Preempted(details)
            | RunStatus::Cancelled(details)
            | RunStatus::QuotaFailed(details)
            | RunStatus::Failed(details) => Some(details),
            RunStatus::Running | RunStatus::Success(_) => None,
        }
    }

    pub fn kind(&self) -> Option<UnsuccessfulKind> {
        match self {
            RunStatus::Preempted(_) => Some(UnsuccessfulKind::Preempted),
            RunStatus::QuotaFailed(_) => Some(UnsuccessfulKind::QuotaFailed),
            RunStatus::Cancelled(_) => Some(UnsuccessfulKind::Cancelled),
            RunStatus::Failed(_) => Some(UnsuccessfulKind::Failed),
            RunStatus::Running | RunStatus::Success(_) => None,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(code: StatusCode) -> UnsuccessfulDetails {
        UnsuccessfulDetails {
            code,
            error_message: None,
            messages: vec![],
            execution_events: vec![],
            machine_type: None,
            zone: None,
            instance_name: None,
            was_preemptible: false,
        }
    }

    #[test]
    fn test_status_code_numeric_mapping() {
        for code in 0..=16 {
            assert_eq!(StatusCode::from_code(code).code(), code);
        }
        assert_eq!(StatusCode::from_code(99), StatusCode::Unknown);
        assert_eq!(StatusCode::from_code(-1), StatusCode::Unknown);
    }

    #[test]
    fn test_status_code_parse() {
        assert_eq!(
            StatusCode::parse("FAILED_PRECONDITION"),
            Some(StatusCode::FailedPrecondition)
        );
        assert_eq!(StatusCode::parse("unavailable"), Some(StatusCode::Unavailable));
        assert_eq!(StatusCode::parse("NOPE"), None);
    }

    #[test]
    fn test_status_code_serde_uses_code_names() {
        let json = serde_json::to_value(StatusCode::FailedPrecondition).unwrap();
        assert_eq!(json, serde_json::json!("FAILED_PRECONDITION"));
    }

    #[test]
    fn test_retryable_outcomes() {
        assert!(UnsuccessfulKind::Preempted.into_status(details(StatusCode::Unavailable)).is_retryable());
        assert!(UnsuccessfulKind::QuotaFailed
            .into_status(details(StatusCode::FailedPrecondition))
            .is_retryable());
        assert!(!UnsuccessfulKind::Cancelled.into_status(details(StatusCode::Cancelled)).is_retryable());
        assert!(!UnsuccessfulKind::Failed.into_status(details(StatusCode::Internal)).is_retryable());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[test]
    fn test_run_status_serializes_with_tag() {
        let status = UnsuccessfulKind::Cancelled.into_status(details(StatusCode::Cancelled));
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["status"], "cancelled");
        assert_eq!(json["code"], "CANCELLED");
        assert_eq!(status.kind(), Some(UnsuccessfulKind::Cancelled));
    }
}
