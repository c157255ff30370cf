//! Error types for archive normalization.

use thiserror::Error;

/// Errors that can occur while reading or normalizing an archive.
#[derive(Error, Debug)]
pub enum HarError {
    /// The archive is structurally invalid (bad JSON shape, URL or timestamp).
    #[error("malformed archive (entry {index:?}): {reason}")]
    MalformedArchive {
        /// Index of the offending entry, if the failure is entry-specific.
        index: Option<usize>,
        reason: String,
    },

    /// Response content declares an encoding other than base64.
    #[error("unsupported content encoding '{encoding}' in entry {index}")]
    UnsupportedEncoding { index: usize, encoding: String },

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        HarError::MalformedArchive {
            index: Some(index),
            reason: reason.into(),
        }
    }
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, HarError>;
