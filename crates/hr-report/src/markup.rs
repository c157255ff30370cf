//! Typed Typst markup fragments.
//!
//! Untrusted strings (anything parsed from the archive or the detector
//! output) can only enter the document through [`Inline::Untrusted`], which
//! always renders through [`quote`]. Trusted markup is our own directives,
//! translations and producer-supplied metadata.

use std::fmt;

/// Raw block delimiter.
pub const RAW_DELIMITER: &str = "```";

/// Inserted before every backtick inside a raw block.
pub const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// Wrap untrusted text in a raw block that it cannot close early.
///
/// A zero-width space is inserted immediately before every backtick, so the
/// content never contains two adjacent backticks and cannot form a closing
/// delimiter.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2 * RAW_DELIMITER.len() + 2);
    out.push_str(RAW_DELIMITER);
    out.push(' ');
    for c in s.chars() {
        if c == '`' {
            out.push(ZERO_WIDTH_SPACE);
        }
        out.push(c);
    }
    out.push(' ');
    out.push_str(RAW_DELIMITER);
    out
}

/// Invert [`quote`]. Returns `None` if `fragment` is not a quoted block.
pub fn unquote(fragment: &str) -> Option<String> {
    let inner = fragment
        .strip_prefix(RAW_DELIMITER)?
        .strip_prefix(' ')?
        .strip_suffix(RAW_DELIMITER)?
        .strip_suffix(' ')?;
    Some(inner.replace("\u{200b}`", "`"))
}

/// Inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Emitted verbatim.
    Markup(String),
    /// Emitted through [`quote`].
    Untrusted(String),
    /// `_..._`
    Emph(Box<Inline>),
    /// `*...*`
    Strong(Box<Inline>),
    Seq(Vec<Inline>),
}

impl Inline {
    pub fn markup(s: impl Into<String>) -> Self {
        Inline::Markup(s.into())
    }

    pub fn untrusted(s: impl Into<String>) -> Self {
        Inline::Untrusted(s.into())
    }

    /// Absent values render as nothing.
    pub fn untrusted_opt(s: Option<&str>) -> Self {
        match s {
            Some(s) => Inline::untrusted(s),
            None => Inline::empty(),
        }
    }

    pub fn emph(inner: Inline) -> Self {
        Inline::Emph(Box::new(inner))
    }

    pub fn strong(inner: Inline) -> Self {
        Inline::Strong(Box::new(inner))
    }

    pub fn seq(parts: impl IntoIterator<Item = Inline>) -> Self {
        Inline::Seq(parts.into_iter().collect())
    }

    pub fn empty() -> Self {
        Inline::Seq(Vec::new())
    }

    /// `parts` joined by the trusted separator `sep`.
    pub fn join(parts: impl IntoIterator<Item = Inline>, sep: &str) -> Self {
        let mut out = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push(Inline::markup(sep));
            }
            out.push(part);
        }
        Inline::Seq(out)
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Inline::Markup(s) => out.push_str(s),
            Inline::Untrusted(s) => out.push_str(&quote(s)),
            Inline::Emph(inner) => {
                out.push('_');
                inner.render_into(out);
                out.push('_');
            }
            Inline::Strong(inner) => {
                out.push('*');
                inner.render_into(out);
                out.push('*');
            }
            Inline::Seq(parts) => parts.iter().for_each(|p| p.render_into(out)),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

/// A document label such as `<e3-req-headers>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    /// Characters outside `[A-Za-z0-9_.:-]` are replaced by `-`.
    pub fn new(name: &str) -> Self {
        Label(
            name.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                        c
                    } else {
                        '-'
                    }
                })
                .collect(),
        )
    }

    /// Anchor of the archive entry at `har_index`.
    pub fn entry(har_index: usize) -> Self {
        Label(format!("e{har_index}"))
    }

    pub fn child(&self, suffix: &str) -> Self {
        Label::new(&format!("{}-{}", self.0, suffix))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// `@label` cross-reference.
    pub fn reference(&self) -> Inline {
        Inline::markup(format!("@{}", self.0))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Line-oriented builder for Typst block markup.
#[derive(Debug, Default)]
pub struct MarkupBuilder {
    out: String,
}

impl MarkupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted directive or markup line, e.g. `#set heading(numbering: "1.")`.
    pub fn directive(&mut self, line: &str) -> &mut Self {
        self.out.push_str(line);
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Heading at `level` (1 = `=`), optionally labelled.
    pub fn heading(&mut self, level: usize, text: Inline, label: Option<&Label>) -> &mut Self {
        self.out.push_str(&"=".repeat(level.max(1)));
        self.out.push(' ');
        self.out.push_str(&text.render());
        if let Some(label) = label {
            self.out.push(' ');
            self.out.push_str(&label.to_string());
        }
        self.out.push_str("\n\n");
        self
    }

    /// Term list item: `/ term: value`.
    pub fn term(&mut self, term: Inline, value: Inline) -> &mut Self {
        self.out.push_str("/ ");
        self.out.push_str(&term.render());
        self.out.push_str(": ");
        self.out.push_str(&value.render());
        self.out.push('\n');
        self
    }

    pub fn paragraph(&mut self, text: Inline) -> &mut Self {
        self.out.push_str(&text.render());
        self.out.push_str("\n\n");
        self
    }

    pub fn bullet_list(&mut self, items: impl IntoIterator<Item = Inline>) -> &mut Self {
        for item in items {
            self.out.push_str("- ");
            self.out.push_str(&item.render());
            self.out.push('\n');
        }
        self.out.push('\n');
        self
    }

    /// `#table(...)` with one header row.
    pub fn table(&mut self, header: Vec<Inline>, rows: Vec<Vec<Inline>>) -> &mut Self {
        let cell = |c: &Inline| format!("[{}]", c.render());

        self.out.push_str("#table(\n");
        self.out.push_str(&format!(
            "  columns: ({}),\n",
            vec!["auto"; header.len()].join(", ")
        ));
        self.out.push_str("  ");
        self.out
            .push_str(&header.iter().map(cell).collect::<Vec<_>>().join(", "));
        self.out.push_str(",\n");
        for row in &rows {
            self.out.push_str("  ");
            self.out
                .push_str(&row.iter().map(cell).collect::<Vec<_>>().join(", "));
            self.out.push_str(",\n");
        }
        self.out.push_str(")\n\n");
        self
    }

    /// Already-rendered block markup.
    pub fn fragment(&mut self, markup: &str) -> &mut Self {
        self.out.push_str(markup);
        if !markup.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}
