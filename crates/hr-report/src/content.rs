//! Rendering of request and response bodies.
//!
//! Bodies are untrusted and possibly binary or very large. Text is cut to
//! the configured length, binary text becomes a hex dump, and everything is
//! quoted before it reaches the document.

use crate::error::Result;
use crate::i18n::Translator;
use crate::markup::{Inline, MarkupBuilder};
use hr_har::{Content, Param};
use once_cell::sync::Lazy;
use regex::Regex;

// Any Unicode "Other" code point: controls, format chars, unassigned, ...
static RE_NON_PRINTABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{C}").unwrap());

const HEXDUMP_WIDTH: usize = 16;

/// Renders bodies with a bound translator and truncation limit.
#[derive(Debug, Clone, Copy)]
pub struct ContentRenderer<'a> {
    t: &'a Translator<'a>,
    truncate: Option<usize>,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(t: &'a Translator<'a>, truncate: Option<usize>) -> Self {
        Self { t, truncate }
    }

    /// Render a request body.
    pub fn render(&self, content: Option<&Content>) -> Result<String> {
        match content {
            None => self.none(),
            Some(Content::Text(text)) => self.render_text(Some(text)),
            Some(Content::Params(params)) if params.is_empty() => self.none(),
            Some(Content::Params(params)) => self.render_params(params),
        }
    }

    /// Render a text body (response bodies are always text).
    pub fn render_text(&self, text: Option<&str>) -> Result<String> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return self.none();
        };

        let (truncated, was_truncated) = truncate(text, self.truncate);

        let body = if is_binary(truncated) {
            hexdump(&text_bytes(truncated))
        } else {
            truncated.to_string()
        };

        let mut b = MarkupBuilder::new();
        b.paragraph(Inline::untrusted(body));

        if was_truncated {
            // `was_truncated` implies a limit was set.
            let limit = self.truncate.unwrap_or_default();
            b.paragraph(Inline::emph(Inline::markup(format!(
                "({} {} {})",
                self.t.translate("har.truncated-after")?,
                limit,
                self.t.translate("har.bytes")?
            ))));
        }

        Ok(b.finish())
    }

    fn render_params(&self, params: &[Param]) -> Result<String> {
        let name = self.t.translate("har.name")?;
        let value = self.t.translate("har.value")?;
        let file_name = self.t.translate("har.file-name")?;
        let content_type = self.t.translate("har.content-type")?;

        let field = |label: &str, v: &str| {
            Inline::seq([Inline::markup(format!("{label}: ")), Inline::untrusted(v)])
        };

        let items = params.iter().map(|p| {
            let mut fields = vec![field(&name, &p.name)];
            if let Some(v) = p.value.as_deref().filter(|v| !v.is_empty()) {
                fields.push(field(&value, v));
            }
            if let Some(v) = p.file_name.as_deref().filter(|v| !v.is_empty()) {
                fields.push(field(&file_name, v));
            }
            if let Some(v) = p.content_type.as_deref().filter(|v| !v.is_empty()) {
                fields.push(field(&content_type, v));
            }
            Inline::join(fields, " \\\n  ")
        });

        let mut b = MarkupBuilder::new();
        b.bullet_list(items);
        Ok(b.finish())
    }

    fn none(&self) -> Result<String> {
        Ok(format!("{}\n", self.none_inline()?.render()))
    }

    /// `_none_` placeholder, also used for empty header and cookie lists.
    pub fn none_inline(&self) -> Result<Inline> {
        Ok(Inline::emph(Inline::markup(self.t.translate("har.none")?)))
    }
}

/// Prefix-cut `text` to `limit` chars; reports whether anything was cut.
pub fn truncate(text: &str, limit: Option<usize>) -> (&str, bool) {
    match limit.and_then(|n| text.char_indices().nth(n)) {
        Some((offset, _)) => (&text[..offset], true),
        None => (text, false),
    }
}

/// Whether `text` contains any non-printable code point.
pub fn is_binary(text: &str) -> bool {
    RE_NON_PRINTABLE.is_match(text)
}

/// Bytes of a decoded body: chars up to U+00FF are single bytes (base64
/// bodies are decoded byte-for-char), anything else is UTF-8 encoded.
pub fn text_bytes(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(b) => bytes.push(b),
            Err(_) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    bytes
}

/// Classic 16-bytes-per-line hex dump:
/// `00000000: 6865 6c6c 6f0a                           hello.`
pub fn hexdump(bytes: &[u8]) -> String {
    let groups_width = HEXDUMP_WIDTH / 2 * 5 - 1;

    bytes
        .chunks(HEXDUMP_WIDTH)
        .enumerate()
        .map(|(line, chunk)| {
            let groups = chunk
                .chunks(2)
                .map(hex::encode)
                .collect::<Vec<_>>()
                .join(" ");
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        char::from(b)
                    } else {
                        '.'
                    }
                })
                .collect();
            format!(
                "{:08x}: {:<width$} {}",
                line * HEXDUMP_WIDTH,
                groups,
                ascii,
                width = groups_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
