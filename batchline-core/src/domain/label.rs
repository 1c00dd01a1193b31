//! Label vocabulary
//!
//! Labels are attached to every action the builder emits so that failure
//! events reported by the remote service can be attributed back to a phase
//! and, for singleton localizations, to a named input.
//!
//! On the wire labels are a flat string map. In the domain they are a closed
//! record; keys outside the vocabulary are kept so they survive a round trip,
//! but nothing reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label key holding the pipeline phase of an action
pub const TAG_KEY: &str = "Tag";

/// Label key holding the logical input a singleton localization services
pub const INPUT_NAME_KEY: &str = "InputName";

/// Label key marking the timestamp actions that bracket a phase
pub const LOGGING_KEY: &str = "Logging";

/// Pipeline phase an action belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhaseTag {
    ContainerSetup,
    Localization,
    UserAction,
    Delocalization,
    Background,
    Logging,
    /// A phase value outside the known vocabulary
    Other(String),
}

impl PhaseTag {
    pub fn as_str(&self) -> &str {
        match self {
            PhaseTag::ContainerSetup => "ContainerSetup",
            PhaseTag::Localization => "Localization",
            PhaseTag::UserAction => "UserAction",
            PhaseTag::Delocalization => "Delocalization",
            PhaseTag::Background => "Background",
            PhaseTag::Logging => "Logging",
            PhaseTag::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "ContainerSetup" => PhaseTag::ContainerSetup,
            "Localization" => PhaseTag::Localization,
            "UserAction" => PhaseTag::UserAction,
            "Delocalization" => PhaseTag::Delocalization,
            "Background" => PhaseTag::Background,
            "Logging" => PhaseTag::Logging,
            other => PhaseTag::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which end of a phase a timestamp marker action sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Start => "Start",
            MarkerKind::End => "End",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Start" => Some(MarkerKind::Start),
            "End" => Some(MarkerKind::End),
            _ => None,
        }
    }
}

/// Typed label set of an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Labels {
    pub tag: Option<PhaseTag>,
    pub input_name: Option<String>,
    pub logging: Option<MarkerKind>,

    /// Keys outside the vocabulary, retained verbatim
    pub extra: BTreeMap<String, String>,
}

impl Labels {
    /// Creates a label set carrying only a phase tag
    pub fn tagged(tag: PhaseTag) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: PhaseTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    pub fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.logging = Some(marker);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.input_name.is_none()
            && self.logging.is_none()
            && self.extra.is_empty()
    }

    /// Flattens the label set into the wire map
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = self.extra.clone();
        if let Some(tag) = &self.tag {
            map.insert(TAG_KEY.to_string(), tag.to_string());
        }
        if let Some(name) = &self.input_name {
            map.insert(INPUT_NAME_KEY.to_string(), name.clone());
        }
        if let Some(marker) = self.logging {
            map.insert(LOGGING_KEY.to_string(), marker.as_str().to_string());
        }
        map
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(mut map: BTreeMap<String, String>) -> Self {
        let tag = map.remove(TAG_KEY).map(|value| PhaseTag::parse(&value));
        let input_name = map.remove(INPUT_NAME_KEY);

        // An unrecognised marker value stays in `extra` rather than being lost
        let logging = match map.get(LOGGING_KEY).and_then(|v| MarkerKind::parse(v)) {
            Some(marker) => {
                map.remove(LOGGING_KEY);
                Some(marker)
            }
            None => None,
        };

        Self {
            tag,
            input_name,
            logging,
            extra: map,
        }
    }
}

impl From<Labels> for BTreeMap<String, String> {
    fn from(labels: Labels) -> Self {
        labels.to_map()
    }
}
