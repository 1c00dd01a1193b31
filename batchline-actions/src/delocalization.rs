//! Delocalization actions
//!
//! Runs the delocalization script staged during localization. All actions
//! of this phase run even when the user command failed, so partial outputs
//! and logs still reach durable storage.

use batchline_core::domain::action::Action;
use batchline_core::domain::label::PhaseTag;
use batchline_core::domain::mount::Mount;

use crate::config::TransferConfig;
use crate::localization::DELOCALIZATION_SCRIPT_NAME;
use crate::params::TaskParameters;
use crate::shell::{cloud_sdk_shell_action, shell_escape};
use crate::timestamp::annotate_timestamped_actions;

/// Builds the ordered delocalization actions of a task
pub fn build_delocalization_actions(
    params: &TaskParameters,
    mounts: &[Mount],
    config: &TransferConfig,
) -> Vec<Action> {
    let script_path = params
        .command_script_container_path
        .sibling(DELOCALIZATION_SCRIPT_NAME);

    let run_delocalization_script = cloud_sdk_shell_action(
        format!("/bin/bash {}", shell_escape(script_path.as_str())),
        mounts,
        config,
    )
    .with_tag(PhaseTag::Delocalization)
    .run_always();

    annotate_timestamped_actions(
        "delocalization",
        PhaseTag::Delocalization,
        vec![run_delocalization_script],
        true,
        config,
    )
}
