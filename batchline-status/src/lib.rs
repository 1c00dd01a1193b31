//! Batchline Status
//!
//! Turns the remote service's terminal error and event history into a typed
//! run outcome with human-readable diagnostics.
//!
//! Failure events are attributed to the actions that produced them through
//! the labels the builder attached. The interpreter never fails: missing or
//! malformed input degrades to omitted diagnostic segments.

pub mod detector;
pub mod diagnostics;
pub mod interpreter;
pub mod rules;
pub mod timeline;

pub use detector::{KnownQuotaMessages, PreemptionDetector, PreemptionMarker, QuotaDetector};
pub use diagnostics::failure_messages;
pub use interpreter::{RunStatusInterpreter, TaskContext};
pub use rules::{Rule, RuleInput, resolve_code};
pub use timeline::{WorkerAssignment, execution_events, worker_assignment};
