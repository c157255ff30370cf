//! Error types for findings aggregation.

use thiserror::Error;

/// Errors that can occur while building the registry or aggregating findings.
#[derive(Error, Debug)]
pub enum FindingsError {
    /// An annotation names an adapter the registry does not know.
    #[error("unknown adapter: {0}")]
    UnknownAdapter(String),

    /// More annotation slots than archive entries.
    #[error("annotation slot count mismatch: {slots} slots for {entries} entries")]
    SlotCountMismatch { entries: usize, slots: usize },

    /// Two registry descriptors share a composite key.
    #[error("duplicate adapter in registry: {0}")]
    DuplicateAdapter(String),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for findings operations.
pub type Result<T> = std::result::Result<T, FindingsError>;
