//! Analysis overview: the report metadata as a term list.

use crate::error::Result;
use crate::format::long_date;
use crate::i18n::Translator;
use crate::markup::{Inline, Label, MarkupBuilder};
use crate::metadata::ReportMetadata;

/// Render the analysis section at heading level 1.
///
/// Metadata values are producer-controlled and go in unquoted.
pub fn render_overview(meta: &ReportMetadata, t: &Translator<'_>) -> Result<String> {
    let tr = |key: &str| -> Result<Inline> { Ok(Inline::markup(t.translate(key)?)) };

    let mut b = MarkupBuilder::new();
    b.heading(1, tr("report.analysis")?, Some(&Label::new("analysis")));

    b.term(tr("report.platform")?, Inline::markup(meta.platform.to_string()))
        .term(tr("report.app-name")?, Inline::markup(&meta.app_name))
        .term(tr("report.app-version")?, Inline::markup(&meta.app_version));
    if let Some(url) = &meta.app_url {
        b.term(tr("report.app-url")?, Inline::markup(url));
    }
    b.term(
        tr("report.analysis-date")?,
        Inline::markup(long_date(&meta.analysis_date, t)?),
    )
    .term(
        tr("report.analysis-platform-version")?,
        Inline::markup(&meta.analysis_platform_version),
    );
    if let Some(checksum) = &meta.har_checksum {
        b.term(tr("report.har-checksum")?, Inline::markup(format!("`{checksum}`")));
    }
    b.blank();

    Ok(b.finish())
}
