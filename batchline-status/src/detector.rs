//! Message detectors used by the classification rules
//!
//! The remote service signals quota exhaustion and some preemptions only
//! through free-text error messages. Detection is behind traits so callers
//! can track provider wording changes without touching the rules.

/// Decides whether an error message reports quota exhaustion
pub trait QuotaDetector: Send + Sync {
    fn is_quota_message(&self, message: &str) -> bool;
}

/// Decides whether an error message reports a preempted worker
pub trait PreemptionDetector: Send + Sync {
    fn is_preemption_message(&self, message: &str) -> bool;
}

/// Matched case-sensitively
const RESOURCE_LIMIT_MESSAGE: &str = "A resource limit has delayed the operation";

/// Matched case-insensitively
const QUOTA_FRAGMENTS: &[&str] = &[
    "usage too high",
    "no available zones",
    "resource_exhausted",
    "quota too low",
];

/// Quota detector matching the provider's known quota messages
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownQuotaMessages;

impl QuotaDetector for KnownQuotaMessages {
    fn is_quota_message(&self, message: &str) -> bool {
        if message.contains(RESOURCE_LIMIT_MESSAGE) {
            return true;
        }
        let lowered = message.to_lowercase();
        QUOTA_FRAGMENTS
            .iter()
            .any(|fragment| lowered.contains(fragment))
    }
}

/// Message the provider attaches to `ABORTED` errors of preempted workers
pub const DEFAULT_PREEMPTION_MARKER: &str =
    "The assigned worker has failed to complete the operation";

/// Preemption detector matching a marker substring
#[derive(Debug, Clone)]
pub struct PreemptionMarker {
    marker: String,
}

impl PreemptionMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for PreemptionMarker {
    fn default() -> Self {
        Self::new(DEFAULT_PREEMPTION_MARKER)
    }
}

impl PreemptionDetector for PreemptionMarker {
    fn is_preemption_message(&self, message: &str) -> bool {
        !self.marker.is_empty() && message.contains(&self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_quota_messages() {
        let detector = KnownQuotaMessages;

        assert!(detector.is_quota_message(
            "Execution failed: A resource limit has delayed the operation: CPUS quota"
        ));
        assert!(detector.is_quota_message("Quota 'CPUS' usage too high in region"));
        assert!(detector.is_quota_message("RESOURCE_EXHAUSTED: no capacity"));
        assert!(detector.is_quota_message("No available zones in us-central1"));
        assert!(!detector.is_quota_message("Execution failed: action 5 exited with 1"));
        assert!(!detector.is_quota_message(""));
    }

    #[test]
    fn test_resource_limit_message_is_case_sensitive() {
        assert!(!KnownQuotaMessages.is_quota_message("a resource limit has delayed the operation"));
    }

    #[test]
    fn test_preemption_marker() {
        let detector = PreemptionMarker::default();

        assert!(detector.is_preemption_message(
            "14: The assigned worker has failed to complete the operation"
        ));
        assert!(!detector.is_preemption_message("worker died"));
        assert!(!PreemptionMarker::new("").is_preemption_message("anything"));
    }
}
