//! Per-entry request and response sections.
//!
//! Every entry gets a heading labelled `<e{i}>` with `i` its index in the
//! original archive, so other parts of the document can reference it without
//! knowing which entries were selected.

use crate::content::ContentRenderer;
use crate::error::Result;
use crate::format::{cookie_expiry, timestamp};
use crate::i18n::Translator;
use crate::markup::{Inline, Label, MarkupBuilder};
use hr_har::{Cookie, Header, NormalizedEntry, NormalizedRequest, NormalizedResponse};

/// Show rules for the traffic listing.
pub const PREAMBLE: &str = "#show raw: set text(size: 8pt)\n\
                            #show heading.where(level: 4): set text(size: 10pt)";

/// Renders archive entries at heading level 2 and below.
pub struct TrafficSection<'a> {
    t: &'a Translator<'a>,
    content: ContentRenderer<'a>,
    include_responses: bool,
}

impl<'a> TrafficSection<'a> {
    pub fn new(t: &'a Translator<'a>, truncate: Option<usize>, include_responses: bool) -> Self {
        Self {
            t,
            content: ContentRenderer::new(t, truncate),
            include_responses,
        }
    }

    /// Render `(archive index, entry)` pairs in the order given.
    pub fn render<'e>(
        &self,
        entries: impl IntoIterator<Item = (usize, &'e NormalizedEntry)>,
    ) -> Result<String> {
        let mut b = MarkupBuilder::new();
        b.directive(PREAMBLE).blank();
        for (har_index, entry) in entries {
            self.entry(&mut b, har_index, entry)?;
        }
        Ok(b.finish())
    }

    fn entry(&self, b: &mut MarkupBuilder, har_index: usize, entry: &NormalizedEntry) -> Result<()> {
        let label = Label::entry(har_index);
        let req = &entry.request;

        b.heading(
            2,
            Inline::seq([
                Inline::untrusted(format!("{} {}", req.method, req.host)),
                Inline::markup(format!(" ({})", timestamp(&entry.start_time))),
            ]),
            Some(&label),
        );

        self.request(b, &label.child("req"), req)?;
        if self.include_responses {
            self.response(b, &label.child("res"), &entry.response)?;
        }
        Ok(())
    }

    fn request(&self, b: &mut MarkupBuilder, label: &Label, req: &NormalizedRequest) -> Result<()> {
        b.heading(3, self.tr("har.request")?, Some(label));

        let mut general = vec![
            ("har.method", Inline::untrusted(&req.method)),
            ("har.http-version", Inline::untrusted(&req.http_version)),
            ("har.scheme", Inline::markup(req.scheme.as_str())),
            ("har.host", Inline::untrusted(&req.host)),
            ("har.path", Inline::untrusted(&req.path_without_query)),
        ];
        if let Some(port) = req.port {
            general.push(("har.port", Inline::markup(port.to_string())));
        }
        self.general(b, label, general)?;

        b.heading(4, self.tr("har.query-params")?, Some(&label.child("query-params")));
        self.name_value_table(
            b,
            req.query_params
                .iter()
                .map(|q| (q.name.as_str(), q.value.as_str())),
        )?;

        self.headers(b, label, &req.headers)?;
        self.cookies(b, label, &req.cookies)?;

        b.heading(4, self.tr("har.content")?, Some(&label.child("content")));
        b.fragment(&self.content.render(req.content.as_ref())?);
        Ok(())
    }

    fn response(&self, b: &mut MarkupBuilder, label: &Label, res: &NormalizedResponse) -> Result<()> {
        b.heading(3, self.tr("har.response")?, Some(label));

        let status = format!("{} {}", res.status, res.status_text);
        self.general(
            b,
            label,
            vec![
                ("har.status", Inline::untrusted(status.trim_end())),
                ("har.http-version", Inline::untrusted(&res.http_version)),
            ],
        )?;

        self.headers(b, label, &res.headers)?;
        self.cookies(b, label, &res.cookies)?;

        b.heading(4, self.tr("har.content")?, Some(&label.child("content")));
        b.fragment(&self.content.render_text(res.content.as_deref())?);
        Ok(())
    }

    fn general(
        &self,
        b: &mut MarkupBuilder,
        label: &Label,
        fields: Vec<(&str, Inline)>,
    ) -> Result<()> {
        b.heading(4, self.tr("har.general")?, Some(&label.child("general")));
        for (key, value) in fields {
            b.term(self.tr(key)?, value);
        }
        b.blank();
        Ok(())
    }

    fn headers(&self, b: &mut MarkupBuilder, label: &Label, headers: &[Header]) -> Result<()> {
        b.heading(4, self.tr("har.headers")?, Some(&label.child("headers")));
        self.name_value_table(
            b,
            headers.iter().map(|h| (h.name.as_str(), h.value.as_str())),
        )
    }

    fn cookies(&self, b: &mut MarkupBuilder, label: &Label, cookies: &[Cookie]) -> Result<()> {
        b.heading(4, self.tr("har.cookies")?, Some(&label.child("cookies")));
        if cookies.is_empty() {
            b.paragraph(self.content.none_inline()?);
            return Ok(());
        }

        let header = [
            "har.name",
            "har.value",
            "har.path",
            "har.domain",
            "har.expires",
            "har.http-only",
            "har.secure",
        ]
        .iter()
        .map(|key| self.tr(key))
        .collect::<Result<Vec<_>>>()?;

        let flag = |v: Option<bool>| match v {
            Some(true) => Inline::markup("✓"),
            Some(false) => Inline::markup("✗"),
            None => Inline::empty(),
        };

        let rows = cookies
            .iter()
            .map(|c| {
                vec![
                    Inline::untrusted(&c.name),
                    Inline::untrusted(&c.value),
                    Inline::untrusted_opt(c.path.as_deref()),
                    Inline::untrusted_opt(c.domain.as_deref()),
                    Inline::untrusted_opt(c.expires.as_deref().map(cookie_expiry).as_deref()),
                    flag(c.http_only),
                    flag(c.secure),
                ]
            })
            .collect();

        b.table(header, rows);
        Ok(())
    }

    fn name_value_table<'p>(
        &self,
        b: &mut MarkupBuilder,
        pairs: impl ExactSizeIterator<Item = (&'p str, &'p str)>,
    ) -> Result<()> {
        if pairs.len() == 0 {
            b.paragraph(self.content.none_inline()?);
            return Ok(());
        }
        let rows = pairs
            .map(|(name, value)| vec![Inline::untrusted(name), Inline::untrusted(value)])
            .collect();
        b.table(vec![self.tr("har.name")?, self.tr("har.value")?], rows);
        Ok(())
    }

    fn tr(&self, key: &str) -> Result<Inline> {
        Ok(Inline::markup(self.t.translate(key)?))
    }
}
