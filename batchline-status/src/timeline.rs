//! Execution event timeline
//!
//! Recovers named spans of a run from the remote service's events. Phase
//! spans come from the timestamp marker actions bracketing each phase: the
//! phase starts when its start marker's container starts and ends when its
//! end marker's container stops.

use batchline_core::domain::action::Action;
use batchline_core::domain::event::{Event, EventDetails};
use batchline_core::domain::label::MarkerKind;
use batchline_core::domain::status::ExecutionEvent;
use chrono::{DateTime, Utc};

/// Worker the remote service ran the task on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub zone: String,
    pub instance: String,
}

/// Zone and instance from the first worker-assigned event
pub fn worker_assignment(events: &[Event]) -> Option<WorkerAssignment> {
    events.iter().find_map(|event| match &event.details {
        EventDetails::WorkerAssigned { zone, instance } => Some(WorkerAssignment {
            zone: zone.clone(),
            instance: instance.clone(),
        }),
        _ => None,
    })
}

fn started_at(events: &[Event], action_id: i64) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|event| event.started_action() == Some(action_id))
        .find_map(|event| event.timestamp)
}

fn stopped_at(events: &[Event], action_id: i64) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|event| event.stopped_action() == Some(action_id))
        .find_map(|event| event.timestamp)
}

fn phase_spans(events: &[Event], actions: &[Action]) -> Vec<ExecutionEvent> {
    let mut spans = Vec::new();

    for (index, action) in actions.iter().enumerate() {
        if action.marker() != Some(MarkerKind::Start) {
            continue;
        }
        let Some(tag) = action.tag() else {
            continue;
        };

        // Action ids are 1-based
        let Some(start) = started_at(events, index as i64 + 1) else {
            continue;
        };

        let end = actions[index + 1..]
            .iter()
            .position(|candidate| {
                candidate.marker() == Some(MarkerKind::End) && candidate.tag() == Some(tag)
            })
            .and_then(|offset| stopped_at(events, (index + 1 + offset) as i64 + 1));

        spans.push(ExecutionEvent {
            name: tag.to_string(),
            start,
            end,
        });
    }

    spans
}

fn pull_spans(events: &[Event]) -> Vec<ExecutionEvent> {
    let mut spans = Vec::new();

    for (index, event) in events.iter().enumerate() {
        let (EventDetails::PullStarted { image }, Some(start)) = (&event.details, event.timestamp)
        else {
            continue;
        };

        let end = events[index + 1..].iter().find_map(|later| match &later.details {
            EventDetails::PullStopped { image: stopped } if stopped == image => later.timestamp,
            _ => None,
        });

        spans.push(ExecutionEvent {
            name: format!("Pulling \"{}\"", image),
            start,
            end,
        });
    }

    spans
}

fn worker_instants(events: &[Event]) -> Vec<ExecutionEvent> {
    events
        .iter()
        .filter(|event| matches!(event.details, EventDetails::WorkerAssigned { .. }))
        .filter_map(|event| event.timestamp)
        .map(|at| ExecutionEvent {
            name: "Worker assigned".to_string(),
            start: at,
            end: Some(at),
        })
        .collect()
}

/// Builds the execution event timeline of a run, ordered by start time
///
/// Events without a timestamp contribute nothing.
pub fn execution_events(events: &[Event], actions: &[Action]) -> Vec<ExecutionEvent> {
    let mut timeline = phase_spans(events, actions);
    timeline.extend(pull_spans(events));
    timeline.extend(worker_instants(events));
    timeline.sort_by_key(|event| event.start);
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchline_core::domain::label::PhaseTag;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap()
    }

    fn marker(tag: PhaseTag, kind: MarkerKind) -> Action {
        Action::new("sdk", vec![]).with_tag(tag).with_marker(kind)
    }

    fn started(action_id: i64, minute: u32) -> Event {
        Event::new("Started", EventDetails::ContainerStarted { action_id }).at(at(minute))
    }

    fn stopped(action_id: i64, minute: u32) -> Event {
        Event::new(
            "Stopped",
            EventDetails::ContainerStopped {
                action_id,
                exit_status: 0,
                stderr: None,
            },
        )
        .at(at(minute))
    }

    fn actions() -> Vec<Action> {
        vec![
            marker(PhaseTag::Localization, MarkerKind::Start),
            Action::new("sdk", vec![]).with_tag(PhaseTag::Localization),
            marker(PhaseTag::Localization, MarkerKind::End),
            Action::new("ubuntu", vec![]).with_tag(PhaseTag::UserAction),
            marker(PhaseTag::Delocalization, MarkerKind::Start),
            marker(PhaseTag::Delocalization, MarkerKind::End),
        ]
    }

    #[test]
    fn test_phase_spans_from_markers() {
        let events = vec![
            started(1, 1),
            stopped(1, 2),
            started(3, 4),
            stopped(3, 5),
            started(5, 20),
        ];

        let timeline = execution_events(&events, &actions());

        assert_eq!(
            timeline,
            vec![
                ExecutionEvent {
                    name: "Localization".to_string(),
                    start: at(1),
                    end: Some(at(5)),
                },
                ExecutionEvent {
                    name: "Delocalization".to_string(),
                    start: at(20),
                    end: None,
                },
            ]
        );
        assert_eq!(timeline[0].duration(), Some(chrono::Duration::minutes(4)));
    }

    #[test]
    fn test_pulls_and_worker_assignment() {
        let events = vec![
            Event::new(
                "Worker assigned",
                EventDetails::WorkerAssigned {
                    zone: "us-central1-b".to_string(),
                    instance: "vm-1".to_string(),
                },
            )
            .at(at(0)),
            Event::new(
                "Pulling",
                EventDetails::PullStarted {
                    image: "ubuntu".to_string(),
                },
            )
            .at(at(2)),
            Event::new(
                "Pulled",
                EventDetails::PullStopped {
                    image: "ubuntu".to_string(),
                },
            )
            .at(at(3)),
        ];

        let timeline = execution_events(&events, &[]);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].name, "Worker assigned");
        assert_eq!(timeline[1].name, "Pulling \"ubuntu\"");
        assert_eq!(timeline[1].end, Some(at(3)));

        assert_eq!(
            worker_assignment(&events),
            Some(WorkerAssignment {
                zone: "us-central1-b".to_string(),
                instance: "vm-1".to_string(),
            })
        );
    }

    #[test]
    fn test_untimestamped_events_are_ignored() {
        let events = vec![Event::new("Started", EventDetails::ContainerStarted { action_id: 1 })];

        assert!(execution_events(&events, &actions()).is_empty());
        assert_eq!(worker_assignment(&events), None);
    }
}
