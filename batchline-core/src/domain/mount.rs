//! Mount domain types

use serde::{Deserialize, Serialize};

/// Binding between a durable storage disk and a path inside the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Name of the disk attached to the worker
    pub disk: String,

    /// Absolute path the disk is mounted at inside the container
    pub path: String,

    #[serde(default)]
    pub read_only: bool,
}

impl Mount {
    pub fn new(disk: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            disk: disk.into(),
            path: path.into(),
            read_only: false,
        }
    }

    pub fn read_only(disk: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            read_only: true,
            ..Self::new(disk, path)
        }
    }
}
