//! Findings section: what each tracker received and in which requests.

use crate::error::Result;
use crate::i18n::Translator;
use crate::markup::{Inline, Label, MarkupBuilder};
use hr_findings::{Finding, Findings};

/// Label of the `n`-th finding (1-based).
pub fn finding_label(n: usize) -> Label {
    Label::new(&format!("finding-{n}"))
}

/// `Tracker (Adapter)` heading text. Registry names are trusted.
pub fn finding_title(finding: &Finding<'_>) -> Inline {
    Inline::markup(format!(
        "{} ({})",
        finding.adapter.tracker.name, finding.adapter.name
    ))
}

/// Cross-references to every request of a finding, in archive order of
/// first sighting.
pub fn request_references(finding: &Finding<'_>) -> Inline {
    Inline::join(
        finding
            .requests
            .iter()
            .map(|r| Label::entry(r.har_index).reference()),
        ", ",
    )
}

/// Render the findings section at heading level 1.
pub fn render_findings(findings: &Findings<'_>, t: &Translator<'_>) -> Result<String> {
    let tr = |key: &str| -> Result<Inline> { Ok(Inline::markup(t.translate(key)?)) };

    let mut b = MarkupBuilder::new();
    b.heading(1, tr("report.findings")?, Some(&Label::new("findings")));

    if findings.is_empty() {
        b.paragraph(tr("report.no-findings")?);
        return Ok(b.finish());
    }
    b.paragraph(tr("report.findings-intro")?);

    for (n, finding) in findings.iter().enumerate() {
        b.heading(2, finding_title(finding), Some(&finding_label(n + 1)));

        b.heading(3, tr("report.received-data")?, None);
        let rows = finding
            .received_data
            .iter()
            .map(|(property, values)| {
                vec![
                    Inline::untrusted(property),
                    Inline::join(values.iter().map(Inline::untrusted), ", "),
                ]
            })
            .collect();
        b.table(vec![tr("har.name")?, tr("har.value")?], rows);

        b.heading(3, tr("report.requests")?, None);
        b.paragraph(request_references(finding));
    }

    Ok(b.finish())
}
