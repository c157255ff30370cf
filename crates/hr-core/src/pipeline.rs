//! End-to-end report pipeline.
//!
//! archive bytes → normalize → aggregate → generate → compiler → bytes.
//!
//! Everything up to the compiler hand-off is synchronous and pure; the
//! compile step is the only `await`. Any failure aborts the whole run.

use crate::logging::Stage;
use hr_findings::{aggregate, AdapterRegistry, AnnotationSlot, FindingsError};
use hr_har::{archive_checksum, normalize, parse_har_bytes, HarError};
use hr_report::{
    Compiler, Document, DocumentGenerator, DocumentKind, OutputFormat, RenderOptions, ReportError,
    ReportMetadata, Translations,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ConfigError;

/// Any failure of a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Har(#[from] HarError),

    #[error(transparent)]
    Findings(#[from] FindingsError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An input file could not be read or parsed.
    #[error("failed to load {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Report and notice documents need analysis metadata.
    #[error("{0} documents require report metadata")]
    MissingMetadata(DocumentKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn input(path: &Path, message: impl ToString) -> Self {
        PipelineError::Input {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything one document is generated from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    /// Raw archive JSON; also hashed for the metadata checksum.
    pub archive: &'a [u8],
    /// One slot per archive entry (may be shorter than the archive).
    pub annotations: &'a [AnnotationSlot],
    pub metadata: Option<&'a ReportMetadata>,
    pub kind: DocumentKind,
}

/// Shared, read-only state for any number of pipeline runs.
pub struct Pipeline<'a> {
    translations: &'a Translations,
    registry: &'a AdapterRegistry,
    options: RenderOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        translations: &'a Translations,
        registry: &'a AdapterRegistry,
        options: RenderOptions,
    ) -> Self {
        Self {
            translations,
            registry,
            options,
        }
    }

    /// Produce the Typst sources without compiling them.
    pub fn render_markup(&self, inputs: &ReportInputs<'_>) -> Result<Document> {
        let har = parse_har_bytes(inputs.archive)?;
        let entries = normalize(&har)?;
        debug!(stage = %Stage::Normalize, entries = entries.len(), "Entries ready");

        let generator = DocumentGenerator::new(self.translations, self.options.clone());

        let document = if inputs.kind == DocumentKind::Traffic {
            generator.generate_traffic(&entries)?
        } else {
            let metadata = inputs
                .metadata
                .ok_or(PipelineError::MissingMetadata(inputs.kind))?
                .clone()
                .with_default_checksum(archive_checksum(inputs.archive));

            let findings = aggregate(&entries, inputs.annotations, self.registry)?;
            debug!(stage = %Stage::Aggregate, findings = findings.len(), "Findings ready");

            generator.generate(&entries, &findings, &metadata, inputs.kind)?
        };

        info!(
            stage = %Stage::Render,
            kind = %inputs.kind,
            sources = document.sources.len(),
            bytes = document.len(),
            "Markup rendered"
        );
        Ok(document)
    }

    /// Generate the document and compile it to PDF.
    pub async fn generate<C: Compiler>(
        &self,
        compiler: &mut C,
        inputs: &ReportInputs<'_>,
    ) -> Result<Vec<u8>> {
        let document = self.render_markup(inputs)?;
        compiler.add_document(&document)?;
        let pdf = compiler
            .compile(&document.main_path, OutputFormat::Pdf)
            .await?;
        info!(stage = %Stage::Compile, bytes = pdf.len(), "Document compiled");
        Ok(pdf)
    }
}

/// Write every source of `document` below `dir`, creating it if needed.
pub fn write_sources(document: &Document, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(document.sources.len());
    for source in &document.sources {
        let path = dir.join(hr_report::compiler::relative_source_path(&source.path)?);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &source.text)?;
        debug!(stage = %Stage::Write, path = %path.display(), "Source written");
        written.push(path);
    }
    Ok(written)
}
