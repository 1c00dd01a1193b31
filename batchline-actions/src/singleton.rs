//! Singleton localization strategies
//!
//! Inputs whose scheme is not handled by the bulk localization script get
//! their own actions. Each scheme is served by a strategy; an input with no
//! strategy aborts pipeline construction.

use batchline_core::domain::action::Action;
use batchline_core::domain::mount::Mount;
use tracing::debug;

use crate::config::TransferConfig;
use crate::error::{BuildError, Result};
use crate::params::FileInput;
use crate::shell::{cloud_sdk_shell_action, shell_escape, with_retries};

/// Trait for per-scheme localization strategies
///
/// A strategy turns one input into the actions that stage it into the
/// container. It only builds data; it never touches storage itself.
pub trait SingletonStrategy: Send + Sync {
    /// Schemes this strategy handles, without `://`
    ///
    /// Must not overlap with schemes of other registered strategies.
    fn schemes(&self) -> &'static [&'static str];

    /// Builds the actions localizing `input`
    ///
    /// # Arguments
    /// * `input` - The input to localize
    /// * `mounts` - Mount set every action of the task receives
    /// * `config` - Transfer tooling configuration
    fn localization_actions(
        &self,
        input: &FileInput,
        mounts: &[Mount],
        config: &TransferConfig,
    ) -> Vec<Action>;
}

/// Downloads `http://` and `https://` inputs with curl
pub struct HttpStrategy;

impl SingletonStrategy for HttpStrategy {
    fn schemes(&self) -> &'static [&'static str] {
        &["http", "https"]
    }

    fn localization_actions(
        &self,
        input: &FileInput,
        mounts: &[Mount],
        config: &TransferConfig,
    ) -> Vec<Action> {
        let destination = shell_escape(input.container_path.as_str());
        let download = format!(
            "curl --silent --show-error --fail --location --create-dirs --output {} {}",
            destination,
            shell_escape(input.cloud_path.as_str())
        );

        vec![cloud_sdk_shell_action(
            with_retries(&download, config),
            mounts,
            config,
        )]
    }
}

/// Resolves and downloads `drs://` inputs with the DRS localizer image
pub struct DrsStrategy;

impl SingletonStrategy for DrsStrategy {
    fn schemes(&self) -> &'static [&'static str] {
        &["drs"]
    }

    fn localization_actions(
        &self,
        input: &FileInput,
        mounts: &[Mount],
        config: &TransferConfig,
    ) -> Vec<Action> {
        let action = Action::new(
            config.drs_localizer_image.clone(),
            vec![
                input.cloud_path.as_str().to_string(),
                input.container_path.as_str().to_string(),
            ],
        )
        .with_mounts(mounts);

        match config.action_timeout {
            Some(timeout) => vec![action.with_timeout(timeout)],
            None => vec![action],
        }
    }
}

/// Registry of singleton strategies keyed by scheme
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn SingletonStrategy>>,
}

impl StrategyRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registers a strategy
    ///
    /// # Panics
    /// Panics if one of the strategy's schemes is already registered
    pub fn register<S: SingletonStrategy + 'static>(&mut self, strategy: S) {
        for scheme in strategy.schemes() {
            if self.strategy_for(scheme).is_some() {
                panic!("Strategy for scheme '{}' is already registered", scheme);
            }
        }
        self.strategies.push(Box::new(strategy));
    }

    /// Finds the strategy handling `scheme`
    pub fn strategy_for(&self, scheme: &str) -> Option<&dyn SingletonStrategy> {
        self.strategies
            .iter()
            .find(|strategy| {
                strategy
                    .schemes()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(scheme))
            })
            .map(|strategy| strategy.as_ref())
    }

    /// Builds singleton actions for every input not localized in bulk
    ///
    /// Inputs keep their order. Each produced action carries the input's name.
    ///
    /// # Errors
    /// Returns an error for the first input whose scheme is missing or has
    /// no registered strategy; no actions are returned in that case.
    pub fn singleton_actions(
        &self,
        inputs: &[FileInput],
        mounts: &[Mount],
        config: &TransferConfig,
    ) -> Result<Vec<Action>> {
        let mut actions = Vec::new();

        for input in inputs {
            let scheme = input
                .cloud_path
                .scheme()
                .ok_or_else(|| BuildError::MissingScheme {
                    input: input.name.clone(),
                    path: input.cloud_path.to_string(),
                })?;

            if config.is_bulk_scheme(scheme) {
                continue;
            }

            let strategy =
                self.strategy_for(scheme)
                    .ok_or_else(|| BuildError::UnsupportedScheme {
                        input: input.name.clone(),
                        scheme: scheme.to_string(),
                        path: input.cloud_path.to_string(),
                    })?;

            debug!("Localizing input '{}' individually ({})", input.name, scheme);

            actions.extend(
                strategy
                    .localization_actions(input, mounts, config)
                    .into_iter()
                    .map(|action| action.with_input_name(input.name.clone())),
            );
        }

        Ok(actions)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(HttpStrategy);
        registry.register(DrsStrategy);
        registry
    }
}
