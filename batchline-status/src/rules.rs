//! Status classification rules
//!
//! An ordered table of guarded rules; the first rule whose predicate holds
//! decides the outcome. Preemption is only inferred from `UNAVAILABLE` or
//! from `ABORTED` with the provider's marker, never from `ABORTED` alone.

use batchline_core::domain::operation::OperationError;
use batchline_core::domain::status::{StatusCode, UnsuccessfulKind};

use crate::detector::{PreemptionDetector, QuotaDetector};

/// Everything a rule may inspect
pub struct RuleInput<'a> {
    pub code: StatusCode,
    pub message: Option<&'a str>,
    pub preemptible: bool,
    pub quota: &'a dyn QuotaDetector,
    pub preemption: &'a dyn PreemptionDetector,
}

/// A guarded classification rule
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RuleInput<'_>) -> bool,
    pub outcome: UnsuccessfulKind,
}

fn unavailable_preemptible(input: &RuleInput<'_>) -> bool {
    input.code == StatusCode::Unavailable && input.preemptible
}

fn aborted_with_preemption_marker(input: &RuleInput<'_>) -> bool {
    input.code == StatusCode::Aborted
        && input.preemptible
        && input
            .message
            .is_some_and(|message| input.preemption.is_preemption_message(message))
}

fn quota_exhausted(input: &RuleInput<'_>) -> bool {
    input.code == StatusCode::FailedPrecondition
        && input
            .message
            .is_some_and(|message| input.quota.is_quota_message(message))
}

fn cancelled(input: &RuleInput<'_>) -> bool {
    input.code == StatusCode::Cancelled
}

fn always(_: &RuleInput<'_>) -> bool {
    true
}

/// Classification rules in priority order
pub static RULES: [Rule; 4] = [
    Rule {
        name: "unavailable-preemptible",
        applies: unavailable_preemptible,
        outcome: UnsuccessfulKind::Preempted,
    },
    Rule {
        name: "aborted-preemption-marker",
        applies: aborted_with_preemption_marker,
        outcome: UnsuccessfulKind::Preempted,
    },
    Rule {
        name: "quota-exhausted",
        applies: quota_exhausted,
        outcome: UnsuccessfulKind::QuotaFailed,
    },
    Rule {
        name: "cancelled",
        applies: cancelled,
        outcome: UnsuccessfulKind::Cancelled,
    },
];

/// Applies when no rule in [`RULES`] does
pub static FALLBACK: Rule = Rule {
    name: "failed",
    applies: always,
    outcome: UnsuccessfulKind::Failed,
};

/// Status code of the terminal error; a missing error or code is `UNAVAILABLE`
pub fn resolve_code(error: Option<&OperationError>) -> StatusCode {
    error
        .and_then(|error| error.code)
        .unwrap_or(StatusCode::Unavailable)
}

/// Returns the first rule that applies
pub fn first_match(input: &RuleInput<'_>) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .unwrap_or(&FALLBACK)
}
