//! Localization actions
//!
//! Stages the transfer scripts next to the command script, runs the bulk
//! localization script, then stages the delocalization script before any
//! singleton localization runs. Pre-staging the delocalization script means
//! outputs produced so far can still be delocalized when a later singleton
//! fails.

use batchline_core::domain::action::Action;
use batchline_core::domain::label::PhaseTag;
use batchline_core::domain::mount::Mount;
use tracing::debug;

use crate::config::TransferConfig;
use crate::error::Result;
use crate::params::TaskParameters;
use crate::shell::{cloud_sdk_shell_action, localize_file, shell_escape, with_retries};
use crate::singleton::StrategyRegistry;
use crate::timestamp::annotate_timestamped_actions;

/// Shell library shared by the transfer scripts
pub const TRANSFER_LIBRARY_NAME: &str = "gcs_transfer.sh";

/// Script localizing every bulk-eligible input
pub const LOCALIZATION_SCRIPT_NAME: &str = "gcs_localization.sh";

/// Script delocalizing outputs after the command has run
pub const DELOCALIZATION_SCRIPT_NAME: &str = "gcs_delocalization.sh";

/// Copies `<call root>/<name>` to the command script's sibling path `<name>`
fn localize_script(
    params: &TaskParameters,
    name: &str,
    mounts: &[Mount],
    config: &TransferConfig,
) -> Action {
    let command = localize_file(
        &params.call_root.join(name),
        &params.command_script_container_path.sibling(name),
    );
    cloud_sdk_shell_action(with_retries(&command, config), mounts, config)
}

/// Builds the ordered localization actions of a task
///
/// The returned list is, in order: start marker, transfer library
/// localization, localization script localization, localization script run,
/// delocalization script localization, singleton localizations, end marker.
/// Every action is tagged `Localization`.
///
/// # Errors
/// Returns an error if an input needs a singleton localization that no
/// strategy supports. Nothing is returned in that case.
pub fn build_localization_actions(
    params: &TaskParameters,
    mounts: &[Mount],
    config: &TransferConfig,
    strategies: &StrategyRegistry,
) -> Result<Vec<Action>> {
    let localize_transfer_library = localize_script(params, TRANSFER_LIBRARY_NAME, mounts, config);
    let localize_localization_script =
        localize_script(params, LOCALIZATION_SCRIPT_NAME, mounts, config);
    let localize_delocalization_script =
        localize_script(params, DELOCALIZATION_SCRIPT_NAME, mounts, config);

    let localization_script_path = params
        .command_script_container_path
        .sibling(LOCALIZATION_SCRIPT_NAME);
    let run_localization_script = cloud_sdk_shell_action(
        format!("/bin/bash {}", shell_escape(localization_script_path.as_str())),
        mounts,
        config,
    );

    let singletons = strategies.singleton_actions(&params.file_inputs, mounts, config)?;

    debug!(
        "Built {} singleton localization action(s) for {} input(s)",
        singletons.len(),
        params.file_inputs.len()
    );

    let localizations: Vec<Action> = [
        localize_transfer_library,
        localize_localization_script,
        run_localization_script,
        localize_delocalization_script,
    ]
    .into_iter()
    .chain(singletons)
    .map(|action| action.with_tag(PhaseTag::Localization))
    .collect();

    Ok(annotate_timestamped_actions(
        "localization",
        PhaseTag::Localization,
        localizations,
        false,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::params::{CloudPath, ContainerPath, FileInput};
    use batchline_core::domain::label::MarkerKind;

    fn params(inputs: Vec<FileInput>) -> TaskParameters {
        TaskParameters {
            docker_image: "ubuntu:22.04".to_string(),
            command_script_container_path: ContainerPath::new("/cromwell_root/script"),
            call_root: CloudPath::new("gs://bucket/wf/call-hello"),
            file_inputs: inputs,
        }
    }

    fn input(name: &str, path: &str) -> FileInput {
        FileInput {
            name: name.to_string(),
            cloud_path: CloudPath::new(path),
            container_path: ContainerPath::new(format!("/cromwell_root/{}", name)),
        }
    }

    fn build(inputs: Vec<FileInput>) -> Result<Vec<Action>> {
        build_localization_actions(
            &params(inputs),
            &[Mount::new("local-disk", "/cromwell_root")],
            &TransferConfig::default(),
            &StrategyRegistry::default(),
        )
    }

    fn script(action: &Action) -> &str {
        &action.commands()[2]
    }

    #[test]
    fn test_fixed_prefix_order() {
        for inputs in [
            vec![],
            vec![input("a", "gs://bucket/a")],
            vec![
                input("b", "https://example.org/b"),
                input("c", "drs://host/c"),
            ],
        ] {
            let actions = build(inputs).unwrap();
            let body = &actions[1..actions.len() - 1];

            assert!(script(&body[0]).contains("gs://bucket/wf/call-hello/gcs_transfer.sh"));
            assert!(script(&body[0]).contains("'/cromwell_root/gcs_transfer.sh'"));
            assert!(script(&body[1]).contains("gs://bucket/wf/call-hello/gcs_localization.sh"));
            assert_eq!(script(&body[2]), "/bin/bash '/cromwell_root/gcs_localization.sh'");
            assert!(script(&body[3]).contains("gs://bucket/wf/call-hello/gcs_delocalization.sh"));
        }
    }

    #[test]
    fn test_script_paths_with_spaces_are_quoted() {
        let params = TaskParameters {
            command_script_container_path: ContainerPath::new("/cromwell root/script"),
            ..params(vec![])
        };

        let actions = build_localization_actions(
            &params,
            &[],
            &TransferConfig::default(),
            &StrategyRegistry::default(),
        )
        .unwrap();

        assert!(script(&actions[2]).contains("'/cromwell root/gcs_localization.sh'"));
        assert_eq!(script(&actions[3]), "/bin/bash '/cromwell root/gcs_localization.sh'");
    }

    #[test]
    fn test_every_action_tagged_localization() {
        let actions = build(vec![
            input("a", "gs://bucket/a"),
            input("b", "https://example.org/b"),
        ])
        .unwrap();

        assert!(
            actions
                .iter()
                .all(|action| action.tag() == Some(&PhaseTag::Localization))
        );
    }

    #[test]
    fn test_bracketed_by_markers() {
        let actions = build(vec![]).unwrap();

        assert_eq!(actions.len(), 6);
        assert_eq!(actions.first().unwrap().marker(), Some(MarkerKind::Start));
        assert_eq!(actions.last().unwrap().marker(), Some(MarkerKind::End));
        assert!(actions[1..5].iter().all(|action| action.marker().is_none()));
    }

    #[test]
    fn test_singletons_follow_delocalization_script() {
        let actions = build(vec![
            input("ref", "https://example.org/ref.fa"),
            input("bulk", "gs://bucket/bulk"),
            input("sample", "drs://host/sample"),
        ])
        .unwrap();

        assert_eq!(actions.len(), 8);
        assert_eq!(actions[5].input_name(), Some("ref"));
        assert_eq!(actions[6].input_name(), Some("sample"));
        assert!(actions[1..5].iter().all(|action| action.input_name().is_none()));
    }

    #[test]
    fn test_mounts_applied_to_transfer_actions() {
        let actions = build(vec![input("ref", "https://example.org/ref.fa")]).unwrap();

        assert!(actions[1..actions.len() - 1]
            .iter()
            .all(|action| action.mounts() == [Mount::new("local-disk", "/cromwell_root")]));
    }

    #[test]
    fn test_unsupported_input_aborts_build() {
        let err = build(vec![
            input("fine", "https://example.org/fine"),
            input("bad", "ftp://example.org/bad"),
        ])
        .unwrap_err();

        assert!(matches!(err, BuildError::UnsupportedScheme { .. }));
    }
}
