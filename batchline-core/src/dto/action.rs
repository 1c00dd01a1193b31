//! Action DTOs
//!
//! The remote service's step representation. Labels travel as a flat string
//! map; the timeout is a seconds string such as `"300s"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::action::{Action, ActionFlags};
use crate::domain::label::Labels;
use crate::domain::mount::Mount;

/// Step submitted to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    pub image_uri: String,

    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<MountDto>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub always_run: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub run_in_background: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore_exit_status: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Mount as the remote service expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountDto {
    pub disk: String,
    pub path: String,

    #[serde(default)]
    pub read_only: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Formats a duration the way the remote service expects (`"90s"`, `"1.5s"`)
pub fn format_timeout(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}s", timeout.as_secs_f64())
    }
}

/// Parses a seconds string; anything malformed yields `None`
pub fn parse_timeout(value: &str) -> Option<Duration> {
    value
        .trim()
        .strip_suffix('s')
        .and_then(|secs| secs.parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

impl From<&Mount> for MountDto {
    fn from(mount: &Mount) -> Self {
        Self {
            disk: mount.disk.clone(),
            path: mount.path.clone(),
            read_only: mount.read_only,
        }
    }
}

impl From<MountDto> for Mount {
    fn from(dto: MountDto) -> Self {
        Self {
            disk: dto.disk,
            path: dto.path,
            read_only: dto.read_only,
        }
    }
}

impl From<&Action> for ActionDto {
    fn from(action: &Action) -> Self {
        let flags = action.flags();
        Self {
            image_uri: action.image().to_string(),
            commands: action.commands().to_vec(),
            entrypoint: action.entrypoint().map(str::to_string),
            mounts: action.mounts().iter().map(MountDto::from).collect(),
            labels: action.labels().to_map(),
            environment: action.environment().clone(),
            always_run: flags.run_always,
            run_in_background: flags.background,
            ignore_exit_status: flags.ignore_exit_status,
            timeout: action.timeout().map(format_timeout),
        }
    }
}

impl From<ActionDto> for Action {
    fn from(dto: ActionDto) -> Self {
        let mounts: Vec<Mount> = dto.mounts.into_iter().map(Mount::from).collect();
        let flags = ActionFlags {
            run_always: dto.always_run,
            background: dto.run_in_background,
            ignore_exit_status: dto.ignore_exit_status,
        };

        let mut action = Action::new(dto.image_uri, dto.commands)
            .with_mounts(&mounts)
            .with_labels(Labels::from(dto.labels))
            .with_flags(flags);

        if let Some(entrypoint) = dto.entrypoint {
            action = action.with_entrypoint(entrypoint);
        }
        if let Some(timeout) = dto.timeout.as_deref().and_then(parse_timeout) {
            action = action.with_timeout(timeout);
        }
        for (key, value) in dto.environment {
            action = action.with_env(key, value);
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::label::PhaseTag;

    #[test]
    fn test_action_wire_shape() {
        let action = Action::new(
            "gcr.io/google.com/cloudsdktool/cloud-sdk:slim",
            vec!["/bin/sh".to_string(), "-c".to_string(), "true".to_string()],
        )
        .with_mounts(&[Mount::new("local-disk", "/cromwell_root")])
        .with_tag(PhaseTag::Localization)
        .run_always()
        .with_timeout(Duration::from_secs(300));

        let json = serde_json::to_value(ActionDto::from(&action)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "imageUri": "gcr.io/google.com/cloudsdktool/cloud-sdk:slim",
                "commands": ["/bin/sh", "-c", "true"],
                "mounts": [{ "disk": "local-disk", "path": "/cromwell_root", "readOnly": false }],
                "labels": { "Tag": "Localization" },
                "alwaysRun": true,
                "timeout": "300s"
            })
        );
    }

    #[test]
    fn test_read_only_mount_and_background_flags_on_wire() {
        let action = Action::new("ubuntu", vec!["sleep".to_string(), "60".to_string()])
            .with_mounts(&[Mount::read_only("reference-disk", "/mnt/ref")])
            .in_background()
            .ignoring_exit_status();

        let json = serde_json::to_value(ActionDto::from(&action)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "imageUri": "ubuntu",
                "commands": ["sleep", "60"],
                "mounts": [{ "disk": "reference-disk", "path": "/mnt/ref", "readOnly": true }],
                "runInBackground": true,
                "ignoreExitStatus": true
            })
        );

        let back = Action::from(serde_json::from_value::<ActionDto>(json).unwrap());
        assert!(back.mounts()[0].read_only);
        assert!(back.flags().background);
        assert!(back.flags().ignore_exit_status);
    }

    #[test]
    fn test_action_from_wire_tolerates_bad_timeout() {
        let dto: ActionDto = serde_json::from_value(serde_json::json!({
            "imageUri": "ubuntu",
            "commands": ["echo"],
            "labels": { "Tag": "UserAction", "InputName": "x" },
            "timeout": "forever"
        }))
        .unwrap();

        let action = Action::from(dto);
        assert_eq!(action.tag(), Some(&PhaseTag::UserAction));
        assert_eq!(action.input_name(), Some("x"));
        assert_eq!(action.timeout(), None);
    }

    #[test]
    fn test_timeout_formatting() {
        assert_eq!(format_timeout(Duration::from_secs(90)), "90s");
        assert_eq!(format_timeout(Duration::from_millis(1500)), "1.5s");
        assert_eq!(parse_timeout("90s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_timeout("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_timeout("-1s"), None);
        assert_eq!(parse_timeout("90"), None);
    }
}
