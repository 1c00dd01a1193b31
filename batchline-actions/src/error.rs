//! Error types for pipeline construction

use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that abort construction of a task's action list
#[derive(Debug, Error)]
pub enum BuildError {
    /// No localization strategy handles the input's scheme
    #[error("Unsupported scheme '{scheme}' for input '{input}' ({path})")]
    UnsupportedScheme {
        /// Logical input name
        input: String,
        /// Scheme that could not be handled
        scheme: String,
        /// Full source path of the input
        path: String,
    },

    /// The input's source path has no scheme at all
    #[error("Input '{input}' has no scheme in its source path '{path}'")]
    MissingScheme {
        /// Logical input name
        input: String,
        /// Source path as given
        path: String,
    },
}

impl BuildError {
    /// Name of the input that caused the failure
    pub fn input_name(&self) -> &str {
        match self {
            Self::UnsupportedScheme { input, .. } | Self::MissingScheme { input, .. } => input,
        }
    }
}
