//! Exit codes for the har-report CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (fixable by changing arguments or inputs)
//! - 20-29: Internal errors (bugs, should be reported)

use crate::pipeline::PipelineError;
use hr_findings::FindingsError;
use hr_har::HarError;
use hr_report::ReportError;

/// Exit codes for har-report operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Document written.
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments (unknown language, document kind, ...)
    ArgsError = 10,

    /// An input file could not be read or parsed
    InputError = 11,

    /// Archive rejected (malformed or unsupported content encoding)
    ArchiveError = 12,

    /// Annotations do not match the archive or the adapter registry
    AnnotationError = 13,

    /// Config file missing or invalid
    ConfigError = 14,

    /// The compiler was missing or rejected the document
    CompileError = 15,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug, please report)
    InternalError = 20,

    /// I/O error while writing output
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ArchiveError => "ERR_ARCHIVE",
            ExitCode::AnnotationError => "ERR_ANNOTATION",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::CompileError => "ERR_COMPILE",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&PipelineError> for ExitCode {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Har(HarError::Json(_)) => ExitCode::InputError,
            PipelineError::Har(_) => ExitCode::ArchiveError,
            PipelineError::Findings(FindingsError::Json(_)) => ExitCode::InputError,
            PipelineError::Findings(_) => ExitCode::AnnotationError,
            PipelineError::Report(e) => match e {
                ReportError::UnsupportedLanguage(_) | ReportError::UnknownDocumentKind(_) => {
                    ExitCode::ArgsError
                }
                ReportError::CompilationFailure(_) => ExitCode::CompileError,
                ReportError::JsonError(_) => ExitCode::InputError,
                ReportError::IoError(_) => ExitCode::IoError,
                // missing translation or bad source path is our own defect
                ReportError::TranslationNotFound(_) | ReportError::InvalidSourcePath(_) => {
                    ExitCode::InternalError
                }
            },
            PipelineError::Config(_) => ExitCode::ConfigError,
            PipelineError::Input { .. } | PipelineError::MissingMetadata(_) => ExitCode::InputError,
            PipelineError::Io(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
