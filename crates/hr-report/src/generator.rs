//! Document generator implementation.
//!
//! Binds normalized entries, findings and report metadata into a set of
//! Typst sources. Generation is pure: the same inputs always produce the
//! same bytes, and nothing touches the filesystem or network.

use crate::config::RenderOptions;
use crate::error::{ReportError, Result};
use crate::i18n::{Translations, Translator};
use crate::markup::{Inline, Label, MarkupBuilder};
use crate::metadata::ReportMetadata;
use crate::sections::{render_findings, render_notice, render_overview, TrafficSection};

use hr_findings::Findings;
use hr_har::NormalizedEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Style asset imported by every main file.
pub const STYLE: &str = include_str!("../assets/style.typ");

pub const MAIN_PATH: &str = "/main.typ";
pub const STYLE_PATH: &str = "/style.typ";
pub const HAR_PATH: &str = "/har.typ";

/// Shape of the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Full technical report: metadata, findings, appendix of the
    /// requests the findings refer to.
    Report,
    /// Short notice naming trackers and their data, with the whole
    /// traffic attached.
    Notice,
    /// Only the traffic listing of an archive.
    Traffic,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Report => "report",
            DocumentKind::Notice => "notice",
            DocumentKind::Traffic => "traffic",
        }
    }

    /// Whether response sections may appear in this kind of document.
    pub fn allows_responses(&self) -> bool {
        !matches!(self, DocumentKind::Notice)
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "report" => Ok(DocumentKind::Report),
            "notice" => Ok(DocumentKind::Notice),
            "traffic" => Ok(DocumentKind::Traffic),
            _ => Err(ReportError::UnknownDocumentKind(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named Typst source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path inside the compilation root, e.g. `/main.typ`.
    pub path: String,
    pub text: String,
}

/// Generated sources ready to hand to a compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub main_path: String,
    pub sources: Vec<SourceFile>,
}

impl Document {
    fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            main_path: MAIN_PATH.to_string(),
            sources: vec![SourceFile {
                path: STYLE_PATH.to_string(),
                text: STYLE.to_string(),
            }],
        }
    }

    fn add(&mut self, path: &str, text: String) {
        self.sources.push(SourceFile {
            path: path.to_string(),
            text,
        });
    }

    /// Text of the source at `path`.
    pub fn source(&self, path: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.text.as_str())
    }

    /// Text of the main file.
    pub fn main(&self) -> &str {
        self.source(&self.main_path).unwrap_or_default()
    }

    /// Total size of all sources.
    pub fn len(&self) -> usize {
        self.sources.iter().map(|s| s.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typst document generator.
pub struct DocumentGenerator<'a> {
    translations: &'a Translations,
    options: RenderOptions,
}

impl<'a> DocumentGenerator<'a> {
    /// Create a generator over loaded translation tables.
    pub fn new(translations: &'a Translations, options: RenderOptions) -> Self {
        Self {
            translations,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Generate a report or notice.
    ///
    /// `DocumentKind::Traffic` ignores `findings` and `meta`.
    pub fn generate(
        &self,
        entries: &[NormalizedEntry],
        findings: &Findings<'_>,
        meta: &ReportMetadata,
        kind: DocumentKind,
    ) -> Result<Document> {
        let t = self.translations.translator(self.options.language)?;

        let document = match kind {
            DocumentKind::Traffic => return self.generate_traffic(entries),
            DocumentKind::Report => self.report(&t, entries, findings, meta)?,
            DocumentKind::Notice => self.notice(&t, entries, findings, meta)?,
        };

        info!(
            kind = %kind,
            language = %self.options.language,
            entries = entries.len(),
            findings = findings.len(),
            bytes = document.len(),
            "Document generated"
        );

        Ok(document)
    }

    /// Render every entry of an archive as a standalone document.
    pub fn generate_traffic(&self, entries: &[NormalizedEntry]) -> Result<Document> {
        let t = self.translations.translator(self.options.language)?;
        let kind = DocumentKind::Traffic;

        let mut main = self.main_header(t.translate("traffic.title")?);
        main.fragment(&self.traffic(&t, kind, entries.iter().enumerate())?);

        let mut document = Document::new(kind);
        document.add(MAIN_PATH, main.finish());

        info!(
            kind = %kind,
            language = %self.options.language,
            entries = entries.len(),
            bytes = document.len(),
            "Document generated"
        );

        Ok(document)
    }

    fn report(
        &self,
        t: &Translator<'_>,
        entries: &[NormalizedEntry],
        findings: &Findings<'_>,
        meta: &ReportMetadata,
    ) -> Result<Document> {
        let kind = DocumentKind::Report;
        let title = t.translate_with("report.title", &[("app", meta.app_name.as_str())])?;

        let mut main = self.main_header(title);
        main.fragment(&render_overview(meta, t)?);
        main.fragment(&render_findings(findings, t)?);
        self.appendix(t, &mut main, Some("report.appendix-intro"))?;

        let included: Vec<usize> = findings
            .har_indices()
            .into_iter()
            .filter(|&i| i < entries.len())
            .collect();
        debug!(included = included.len(), total = entries.len(), "Selected entries for appendix");

        let har = self.traffic(t, kind, included.iter().map(|&i| (i, &entries[i])))?;

        let mut document = Document::new(kind);
        document.add(MAIN_PATH, main.finish());
        document.add(HAR_PATH, har);
        Ok(document)
    }

    fn notice(
        &self,
        t: &Translator<'_>,
        entries: &[NormalizedEntry],
        findings: &Findings<'_>,
        meta: &ReportMetadata,
    ) -> Result<Document> {
        let kind = DocumentKind::Notice;
        let title = t.translate_with("notice.title", &[("app", meta.app_name.as_str())])?;

        let mut main = self.main_header(title);
        main.fragment(&render_notice(findings, meta, t)?);
        self.appendix(t, &mut main, None)?;

        let har = self.traffic(t, kind, entries.iter().enumerate())?;

        let mut document = Document::new(kind);
        document.add(MAIN_PATH, main.finish());
        document.add(HAR_PATH, har);
        Ok(document)
    }

    /// Style import, language and title.
    fn main_header(&self, title: String) -> MarkupBuilder {
        let mut b = MarkupBuilder::new();
        b.directive(&format!("#import \"{STYLE_PATH}\": report-style, doc-title"))
            .directive("#show: report-style")
            .directive(&format!("#set text(lang: \"{}\")", self.options.language))
            .blank()
            .directive(&format!("#doc-title[{title}]"))
            .blank();
        b
    }

    fn appendix(
        &self,
        t: &Translator<'_>,
        main: &mut MarkupBuilder,
        intro_key: Option<&str>,
    ) -> Result<()> {
        main.directive("#pagebreak()").blank();
        main.heading(
            1,
            Inline::markup(t.translate("report.appendix")?),
            Some(&Label::new("appendix")),
        );
        if let Some(key) = intro_key {
            main.paragraph(Inline::markup(t.translate(key)?));
        }
        main.directive(&format!("#include \"{HAR_PATH}\""));
        Ok(())
    }

    fn traffic<'e>(
        &self,
        t: &Translator<'_>,
        kind: DocumentKind,
        entries: impl IntoIterator<Item = (usize, &'e NormalizedEntry)>,
    ) -> Result<String> {
        let include_responses = self.options.include_responses && kind.allows_responses();
        TrafficSection::new(t, self.options.truncate_content, include_responses).render(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Report".parse::<DocumentKind>().unwrap(), DocumentKind::Report);
        assert_eq!("notice".parse::<DocumentKind>().unwrap(), DocumentKind::Notice);
        assert!(matches!(
            "memo".parse::<DocumentKind>(),
            Err(ReportError::UnknownDocumentKind(_))
        ));
    }

    #[test]
    fn test_kind_allows_responses() {
        assert!(DocumentKind::Report.allows_responses());
        assert!(DocumentKind::Traffic.allows_responses());
        assert!(!DocumentKind::Notice.allows_responses());
    }

    #[test]
    fn test_style_lets_raw_text_break() {
        // both inline and block raw go through the zero-width-space helper
        assert!(STYLE.contains("it.text.clusters().join(\"\\u{200b}\")"));
        assert!(STYLE.contains("show raw.where(block: false): it => highlight("));
        assert!(STYLE.contains("show raw.where(block: true): it => block("));
        assert_eq!(STYLE.matches("breakable-raw(it)").count(), 2);
        assert!(!STYLE.contains("box.with"));
    }

    #[test]
    fn test_traffic_document_shape() {
        let translations = Translations::bundled().unwrap();
        let generator = DocumentGenerator::new(
            &translations,
            RenderOptions::new().with_language(Language::Fr),
        );
        let document = generator.generate_traffic(&[]).unwrap();

        assert_eq!(document.kind, DocumentKind::Traffic);
        assert_eq!(document.main_path, MAIN_PATH);
        assert_eq!(document.source(STYLE_PATH), Some(STYLE));
        assert_eq!(document.source(HAR_PATH), None);
        assert!(document.main().starts_with("#import \"/style.typ\": report-style, doc-title\n"));
        assert!(document.main().contains("#set text(lang: \"fr\")"));
        assert!(document.main().contains("#doc-title[Trafic enregistré]"));
    }
}
