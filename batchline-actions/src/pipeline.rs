//! Full pipeline assembly
//!
//! Produces the exact action list submitted for a task. The interpreter
//! later resolves the remote service's 1-based action ids against this same
//! list, so it must be submitted unmodified.

use batchline_core::domain::action::Action;
use batchline_core::domain::label::PhaseTag;
use batchline_core::domain::mount::Mount;
use tracing::info;

use crate::config::TransferConfig;
use crate::delocalization::build_delocalization_actions;
use crate::error::Result;
use crate::localization::build_localization_actions;
use crate::params::TaskParameters;
use crate::singleton::StrategyRegistry;

/// Builds the action running the task's command script in its own image
pub fn build_user_action(params: &TaskParameters, mounts: &[Mount]) -> Action {
    Action::new(
        params.docker_image.clone(),
        vec![
            "/bin/bash".to_string(),
            params.command_script_container_path.to_string(),
        ],
    )
    .with_entrypoint("")
    .with_mounts(mounts)
    .with_tag(PhaseTag::UserAction)
}

/// Assembles action lists for tasks
///
/// Holds the transfer configuration and the singleton strategies so callers
/// build every task the same way.
pub struct PipelineBuilder {
    config: TransferConfig,
    strategies: StrategyRegistry,
}

impl PipelineBuilder {
    /// Creates a builder with the default singleton strategies
    pub fn new(config: TransferConfig) -> Self {
        Self::with_strategies(config, StrategyRegistry::default())
    }

    pub fn with_strategies(config: TransferConfig, strategies: StrategyRegistry) -> Self {
        Self { config, strategies }
    }

    pub fn localization_actions(
        &self,
        params: &TaskParameters,
        mounts: &[Mount],
    ) -> Result<Vec<Action>> {
        build_localization_actions(params, mounts, &self.config, &self.strategies)
    }

    pub fn delocalization_actions(&self, params: &TaskParameters, mounts: &[Mount]) -> Vec<Action> {
        build_delocalization_actions(params, mounts, &self.config)
    }

    /// Builds localization, the user action and delocalization, in that order
    ///
    /// # Errors
    /// Returns an error if localization cannot be built; see
    /// [`build_localization_actions`].
    pub fn pipeline(&self, params: &TaskParameters, mounts: &[Mount]) -> Result<Vec<Action>> {
        let mut actions = self.localization_actions(params, mounts)?;
        actions.push(build_user_action(params, mounts));
        actions.extend(self.delocalization_actions(params, mounts));

        info!(
            "Built pipeline of {} action(s) for {}",
            actions.len(),
            params.command_script_container_path
        );

        Ok(actions)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new(TransferConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CloudPath, ContainerPath, FileInput};

    fn params() -> TaskParameters {
        TaskParameters {
            docker_image: "ubuntu:22.04".to_string(),
            command_script_container_path: ContainerPath::new("/cromwell_root/script"),
            call_root: CloudPath::new("gs://bucket/call"),
            file_inputs: vec![FileInput {
                name: "ref".to_string(),
                cloud_path: CloudPath::new("https://example.org/ref.fa"),
                container_path: ContainerPath::new("/cromwell_root/ref.fa"),
            }],
        }
    }

    #[test]
    fn test_pipeline_phase_order() {
        let builder = PipelineBuilder::default();
        let actions = builder.pipeline(&params(), &[]).unwrap();

        let tags: Vec<&PhaseTag> = actions.iter().filter_map(Action::tag).collect();
        assert_eq!(tags.len(), actions.len());

        let user_index = actions
            .iter()
            .position(|action| action.tag() == Some(&PhaseTag::UserAction))
            .unwrap();
        assert_eq!(user_index, 7);
        assert!(actions[..user_index]
            .iter()
            .all(|action| action.tag() == Some(&PhaseTag::Localization)));
        assert!(actions[user_index + 1..]
            .iter()
            .all(|action| action.tag() == Some(&PhaseTag::Delocalization)));
    }

    #[test]
    fn test_user_action_runs_command_script() {
        let action = build_user_action(&params(), &[Mount::new("local-disk", "/cromwell_root")]);

        assert_eq!(action.image(), "ubuntu:22.04");
        assert_eq!(action.commands(), ["/bin/bash", "/cromwell_root/script"]);
        assert_eq!(action.entrypoint(), Some(""));
        assert_eq!(action.mounts().len(), 1);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let builder = PipelineBuilder::default();
        assert_eq!(
            builder.pipeline(&params(), &[]).unwrap(),
            builder.pipeline(&params(), &[]).unwrap()
        );
    }
}
