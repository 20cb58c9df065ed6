//! Error types for dotpath operations.

use thiserror::Error;

/// Errors that can occur during dotpath operations.
///
/// Missing paths, non-container entries, empty inputs and key collisions are
/// never errors: they resolve to `null`, a default, or a dropped entry.
#[derive(Error, Debug)]
pub enum DotPathError {
    /// A caller-supplied enum-like parameter (match type, removal action) was
    /// not recognized, or a value could not be cast to a sequence.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input string was not valid JSON (convenience entry points only).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DotPathError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DotPathError::InvalidArgument(message.into())
    }
}

/// Convenience alias used throughout dotpath-core.
pub type Result<T> = std::result::Result<T, DotPathError>;
