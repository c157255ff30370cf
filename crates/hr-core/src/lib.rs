//! har-report core library.
//!
//! Wires the archive normalizer, the findings aggregator and the Typst
//! generator into one pipeline, plus the ambient pieces the CLI needs:
//! configuration, logging and exit codes.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;

pub use config::{AppConfig, ConfigError, ConfigSource};
pub use exit_codes::ExitCode;
pub use pipeline::{Pipeline, PipelineError, ReportInputs};
