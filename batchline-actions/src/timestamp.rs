//! Timestamp bracketing of pipeline phases
//!
//! A phase is wrapped between two marker actions that print the time. The
//! remote service reports when each marker container starts and stops, so
//! the phase's wall-clock span can be recovered from the event timeline.

use batchline_core::domain::action::Action;
use batchline_core::domain::label::{MarkerKind, PhaseTag};

use crate::config::TransferConfig;
use crate::shell::timestamped_message;

/// Brackets `actions` with `Starting <description>.` and `Done <description>.` markers
///
/// Markers carry the phase tag and a `Logging` label. When `run_always` is
/// set the markers run even after an earlier failure, matching phases like
/// delocalization that must always execute.
pub fn annotate_timestamped_actions(
    description: &str,
    tag: PhaseTag,
    actions: Vec<Action>,
    run_always: bool,
    config: &TransferConfig,
) -> Vec<Action> {
    let marker = |message: String, kind: MarkerKind| {
        let action = timestamped_message(&message, config)
            .with_tag(tag.clone())
            .with_marker(kind);
        if run_always { action.run_always() } else { action }
    };

    let mut annotated = Vec::with_capacity(actions.len() + 2);
    annotated.push(marker(format!("Starting {}.", description), MarkerKind::Start));
    annotated.extend(actions);
    annotated.push(marker(format!("Done {}.", description), MarkerKind::End));
    annotated
}
