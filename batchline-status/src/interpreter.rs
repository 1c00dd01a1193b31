//! Run status interpreter
//!
//! Classifies a finished remote run and packages the diagnostics and
//! telemetry the retry layer consumes. Reads the submitted action list but
//! never modifies it; every call is a pure function of its inputs.

use batchline_core::domain::action::Action;
use batchline_core::domain::event::Event;
use batchline_core::domain::operation::{OperationError, OperationSnapshot, RemoteOperation};
use batchline_core::domain::status::{
    ExecutionEvent, RunStatus, StatusCode, SuccessDetails, UnsuccessfulDetails,
};
use tracing::{debug, info};

use crate::detector::{KnownQuotaMessages, PreemptionDetector, PreemptionMarker, QuotaDetector};
use crate::diagnostics::failure_messages;
use crate::rules::{RuleInput, first_match, resolve_code};
use crate::timeline::{execution_events, worker_assignment};

/// What the caller knows about the task independently of the events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskContext {
    pub machine_type: Option<String>,
    pub zone: Option<String>,
    pub instance_name: Option<String>,

    /// Whether the task ran on preemptible capacity
    pub preemptible: bool,

    /// Execution events already extracted for telemetry
    pub execution_events: Vec<ExecutionEvent>,
}

/// Interprets remote run results for one submitted action list
pub struct RunStatusInterpreter<'a> {
    actions: &'a [Action],
    context: TaskContext,
    operation: Option<RemoteOperation>,
    quota: Box<dyn QuotaDetector>,
    preemption: Box<dyn PreemptionDetector>,
}

impl<'a> RunStatusInterpreter<'a> {
    /// Creates an interpreter with the default detectors
    ///
    /// # Arguments
    /// * `actions` - The exact action list submitted for the task
    /// * `context` - Task metadata known to the caller
    pub fn new(actions: &'a [Action], context: TaskContext) -> Self {
        Self {
            actions,
            context,
            operation: None,
            quota: Box::new(KnownQuotaMessages),
            preemption: Box::new(PreemptionMarker::default()),
        }
    }

    /// Sets the operation identity used in log output
    pub fn with_operation(mut self, operation: RemoteOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_quota_detector<D: QuotaDetector + 'static>(mut self, detector: D) -> Self {
        self.quota = Box::new(detector);
        self
    }

    pub fn with_preemption_detector<D: PreemptionDetector + 'static>(mut self, detector: D) -> Self {
        self.preemption = Box::new(detector);
        self
    }

    /// Classifies an unsuccessful run
    ///
    /// Never fails: a missing error is treated as `UNAVAILABLE`, and lookups
    /// that cannot be resolved are left out of the diagnostics.
    pub fn interpret(&self, error: Option<&OperationError>, events: &[Event]) -> RunStatus {
        self.unsuccessful(&self.context, error, events)
    }

    /// Classifies a polled snapshot, including the running and success paths
    ///
    /// Execution events and worker placement missing from the task context
    /// are recovered from the snapshot's events.
    pub fn classify(&self, snapshot: &OperationSnapshot) -> RunStatus {
        if !snapshot.done {
            debug!("{} is still running", self.operation_label());
            return RunStatus::Running;
        }

        let context = self.enriched_context(&snapshot.events);

        match &snapshot.error {
            Some(error) if error.code != Some(StatusCode::Ok) => {
                self.unsuccessful(&context, Some(error), &snapshot.events)
            }
            _ => {
                info!("{} completed successfully", self.operation_label());
                RunStatus::Success(SuccessDetails {
                    execution_events: context.execution_events,
                    machine_type: context.machine_type,
                    zone: context.zone,
                    instance_name: context.instance_name,
                })
            }
        }
    }

    fn unsuccessful(
        &self,
        context: &TaskContext,
        error: Option<&OperationError>,
        events: &[Event],
    ) -> RunStatus {
        let code = resolve_code(error);
        let message = error.and_then(|error| error.message.as_deref());

        let input = RuleInput {
            code,
            message,
            preemptible: context.preemptible,
            quota: self.quota.as_ref(),
            preemption: self.preemption.as_ref(),
        };
        let rule = first_match(&input);

        let details = UnsuccessfulDetails {
            code,
            error_message: message.map(str::to_string),
            messages: failure_messages(events, self.actions),
            execution_events: context.execution_events.clone(),
            machine_type: context.machine_type.clone(),
            zone: context.zone.clone(),
            instance_name: context.instance_name.clone(),
            was_preemptible: context.preemptible,
        };

        info!(
            "{} finished with {} (rule '{}', {} diagnostic message(s))",
            self.operation_label(),
            code,
            rule.name,
            details.messages.len()
        );

        rule.outcome.into_status(details)
    }

    fn enriched_context(&self, events: &[Event]) -> TaskContext {
        let mut context = self.context.clone();

        if context.execution_events.is_empty() {
            context.execution_events = execution_events(events, self.actions);
        }
        if let Some(worker) = worker_assignment(events) {
            context.zone.get_or_insert(worker.zone);
            context.instance_name.get_or_insert(worker.instance);
        }

        context
    }

    fn operation_label(&self) -> String {
        self.operation
            .as_ref()
            .map(|operation| format!("Operation {}", operation))
            .unwrap_or_else(|| "Unidentified operation".to_string())
    }
}
