//! Action domain types
//!
//! An action is one containerized step submitted to the remote service.
//! Actions have no identifier of their own: the remote service refers to
//! them by their 1-based position in the submitted list, so a list must be
//! submitted exactly as the builder produced it.

use std::collections::BTreeMap;
use std::time::Duration;

use super::label::{Labels, MarkerKind, PhaseTag};
use super::mount::Mount;

/// Execution flags of an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFlags {
    /// Run even if an earlier action failed
    pub run_always: bool,

    /// Start the action and continue without waiting for it
    pub background: bool,

    /// A non-zero exit does not fail the pipeline
    pub ignore_exit_status: bool,
}

/// One remote execution step
///
/// Built through the consuming `with_*` methods; once handed out an action
/// is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    image: String,
    commands: Vec<String>,
    entrypoint: Option<String>,
    mounts: Vec<Mount>,
    labels: Labels,
    environment: BTreeMap<String, String>,
    flags: ActionFlags,
    timeout: Option<Duration>,
}

impl Action {
    /// Creates an action running `commands` in `image`
    pub fn new(image: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            image: image.into(),
            commands,
            entrypoint: None,
            mounts: Vec::new(),
            labels: Labels::default(),
            environment: BTreeMap::new(),
            flags: ActionFlags::default(),
            timeout: None,
        }
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }

    pub fn with_mounts(mut self, mounts: &[Mount]) -> Self {
        self.mounts = mounts.to_vec();
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_tag(mut self, tag: PhaseTag) -> Self {
        self.labels = self.labels.with_tag(tag);
        self
    }

    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.labels = self.labels.with_input_name(name);
        self
    }

    pub fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.labels = self.labels.with_marker(marker);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn run_always(mut self) -> Self {
        self.flags.run_always = true;
        self
    }

    pub fn in_background(mut self) -> Self {
        self.flags.background = true;
        self
    }

    pub fn ignoring_exit_status(mut self) -> Self {
        self.flags.ignore_exit_status = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn entrypoint(&self) -> Option<&str> {
        self.entrypoint.as_deref()
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn flags(&self) -> ActionFlags {
        self.flags
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn tag(&self) -> Option<&PhaseTag> {
        self.labels.tag.as_ref()
    }

    pub fn input_name(&self) -> Option<&str> {
        self.labels.input_name.as_deref()
    }

    pub fn marker(&self) -> Option<MarkerKind> {
        self.labels.logging
    }
}

/// Resolves an action id reported by the remote service
///
/// Ids are 1-based positions in the submitted list. Zero, negative and
/// out-of-range ids resolve to `None`.
pub fn action_at(actions: &[Action], action_id: i64) -> Option<&Action> {
    usize::try_from(action_id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|index| actions.get(index))
}
