//! Error types for report generation.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur during report generation.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A translation key resolved in neither the active nor the fallback locale.
    #[error("translation not found: {0}")]
    TranslationNotFound(String),

    /// Language tag with no bundled locale.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Document kind name not recognized.
    #[error("unknown document kind: {0}")]
    UnknownDocumentKind(String),

    /// The external compiler rejected the generated markup.
    #[error("compilation failed: {0}")]
    CompilationFailure(String),

    /// A registered source path escapes the compilation root.
    #[error("invalid source path: {0}")]
    InvalidSourcePath(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
