//! Typst document generator for annotated HAR captures.
//!
//! Renders normalized archive entries and tracker findings into Typst
//! sources, then hands them to an external compiler for PDF output.
//!
//! # Safety of generated markup
//!
//! Archive and annotation strings are attacker-controlled. They only reach
//! the document through [`markup::Inline::Untrusted`], which always renders
//! through [`markup::quote`]. Translations, registry names and report
//! metadata are trusted and inserted as-is.
//!
//! # Documents
//!
//! - Report: analysis metadata, findings per tracker, appendix with the
//!   requests the findings refer to
//! - Notice: short text naming each tracker and what it received, with the
//!   complete traffic attached (requests only)
//! - Traffic: the traffic listing of a bare archive
//!
//! # Example
//!
//! ```no_run
//! use hr_report::{DocumentGenerator, DocumentKind, RenderOptions, ReportMetadata, Translations};
//!
//! # fn run(entries: &[hr_har::NormalizedEntry], findings: &hr_findings::Findings<'_>, meta: &ReportMetadata) -> hr_report::Result<()> {
//! let translations = Translations::bundled()?;
//! let generator = DocumentGenerator::new(&translations, RenderOptions::default());
//! let document = generator.generate(entries, findings, meta, DocumentKind::Report)?;
//! println!("{}", document.main());
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod generator;
pub mod i18n;
pub mod markup;
pub mod metadata;
pub mod sections;

pub use compiler::{Compiler, OutputFormat, TypstCli};
pub use config::RenderOptions;
pub use content::ContentRenderer;
pub use error::{ReportError, Result};
pub use generator::{Document, DocumentGenerator, DocumentKind, SourceFile};
pub use i18n::{Language, Translations, Translator};
pub use markup::{quote, unquote};
pub use metadata::{Platform, ReportMetadata};
