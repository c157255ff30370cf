//! Short notice text: which tracker received which data.

use super::findings::{finding_title, request_references};
use crate::error::Result;
use crate::format::long_date;
use crate::i18n::Translator;
use crate::markup::{Inline, MarkupBuilder};
use crate::metadata::ReportMetadata;
use hr_findings::Findings;

/// Render the notice body (everything between the title and the appendix).
pub fn render_notice(
    findings: &Findings<'_>,
    meta: &ReportMetadata,
    t: &Translator<'_>,
) -> Result<String> {
    let mut b = MarkupBuilder::new();

    let date = long_date(&meta.analysis_date, t)?;
    let platform = meta.platform.to_string();
    b.paragraph(Inline::markup(t.translate_with(
        "notice.intro",
        &[
            ("platform", platform.as_str()),
            ("app", meta.app_name.as_str()),
            ("version", meta.app_version.as_str()),
            ("date", date.as_str()),
        ],
    )?));

    let received = t.translate("notice.received")?;
    let see = t.translate("notice.see")?;

    let items = findings.iter().map(|finding| {
        let data = Inline::join(
            finding.received_data.iter().map(|(property, values)| {
                Inline::seq([
                    Inline::untrusted(property),
                    Inline::markup(" ("),
                    Inline::join(values.iter().map(Inline::untrusted), ", "),
                    Inline::markup(")"),
                ])
            }),
            ", ",
        );
        Inline::seq([
            Inline::strong(finding_title(finding)),
            Inline::markup(format!(" {received}: ")),
            data,
            Inline::markup(format!(" ({see} ")),
            request_references(finding),
            Inline::markup(")"),
        ])
    });
    b.bullet_list(items);

    b.paragraph(Inline::markup(t.translate("notice.outro")?));
    Ok(b.finish())
}
