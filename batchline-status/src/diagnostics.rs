//! Failure diagnostics
//!
//! Builds the human-readable failure messages of a run: the cause of the
//! first run-level failure event, followed by one line per unexpected exit.
//! Unexpected-exit lines are reversed relative to the timeline so the
//! failure the remote service reported first ends up last, where it is most
//! visible when the messages are appended to a log.

use batchline_core::domain::action::{Action, action_at};
use batchline_core::domain::event::Event;
use tracing::debug;

/// Cause of the first run-level failure event
pub fn summary_failure(events: &[Event]) -> Option<&str> {
    events.iter().find_map(Event::failure_cause)
}

/// Standard error of the first container-stopped event for `action_id`
pub fn container_stderr(events: &[Event], action_id: i64) -> Option<&str> {
    events.iter().find_map(|event| event.stderr_for(action_id))
}

/// Formats one unexpected exit as `[<tag>] Input name: <name> - <description>: <stderr>`
///
/// Each segment is omitted when its source is absent.
pub fn unexpected_exit_message(
    event: &Event,
    action_id: i64,
    actions: &[Action],
    events: &[Event],
) -> String {
    let action = action_at(actions, action_id);
    if action.is_none() {
        debug!(
            "Action id {} does not resolve against {} submitted action(s)",
            action_id,
            actions.len()
        );
    }

    let tag = action
        .and_then(Action::tag)
        .map(|tag| format!("[{}] ", tag));
    let input_name = action
        .and_then(Action::input_name)
        .map(|name| format!("Input name: {} - ", name));
    let stderr = container_stderr(events, action_id).map(|stderr| format!(": {}", stderr));

    [tag, input_name, Some(event.description.clone()), stderr]
        .into_iter()
        .flatten()
        .collect()
}

/// Assembles the full diagnostic list of a run
///
/// `[summary?] ++ reverse(unexpected-exit lines in timeline order)`
pub fn failure_messages(events: &[Event], actions: &[Action]) -> Vec<String> {
    let summary = summary_failure(events).map(str::to_string);

    let unexpected_exits: Vec<String> = events
        .iter()
        .filter_map(|event| {
            event
                .unexpected_exit_action()
                .map(|action_id| unexpected_exit_message(event, action_id, actions, events))
        })
        .collect();

    summary
        .into_iter()
        .chain(unexpected_exits.into_iter().rev())
        .collect()
}
