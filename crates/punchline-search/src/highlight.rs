//! Marking compared terms inside a display line.
//!
//! Terms are applied longest first and each match is recorded as a byte
//! range of the original text. A later, shorter term can never match
//! inside a range that is already marked, so "ice" is not re-wrapped
//! inside an already wrapped "ice cream". Marked text keeps the casing of
//! the line, not of the term.

use std::ops::Range;

use punchline_core::text::normalize_key;

use crate::error::SearchResult;
use crate::matcher::TermPattern;

/// A run of the display text, either untouched or highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Marked(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Plain(s) | Self::Marked(s) => s,
        }
    }

    pub fn is_marked(&self) -> bool {
        matches!(self, Self::Marked(_))
    }
}

/// Normalize, dedupe and order terms for highlighting.
///
/// Terms of one character or less are dropped. The rest are sorted by
/// descending length, ties alphabetically.
pub fn prepare_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut prepared: Vec<String> = Vec::new();
    for term in terms {
        let term = normalize_key(term.as_ref());
        if term.chars().count() > 1 && !prepared.contains(&term) {
            prepared.push(term);
        }
    }
    prepared.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    prepared
}

/// Split `text` into plain and marked segments.
///
/// # Errors
/// Returns an error if a term's pattern cannot be compiled.
pub fn segments<'a, I, S>(text: &'a str, terms: I) -> SearchResult<Vec<Segment<'a>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut marked: Vec<Range<usize>> = Vec::new();
    for term in prepare_terms(terms) {
        let pattern = TermPattern::compile(&term)?;
        for range in pattern.ranges(text) {
            let overlaps = marked
                .iter()
                .any(|m| m.start < range.end && range.start < m.end);
            if !range.is_empty() && !overlaps {
                marked.push(range);
            }
        }
    }
    marked.sort_by_key(|m| m.start);

    let mut out = Vec::with_capacity(marked.len() * 2 + 1);
    let mut pos = 0;
    for range in marked {
        if range.start > pos {
            out.push(Segment::Plain(&text[pos..range.start]));
        }
        pos = range.end;
        out.push(Segment::Marked(&text[range]));
    }
    if pos < text.len() {
        out.push(Segment::Plain(&text[pos..]));
    }
    Ok(out)
}

/// How marked segments are wrapped when rendered to a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    open: String,
    close: String,
    escape_html: bool,
}

impl Markup {
    /// `<mark>` tags, with all text HTML-escaped.
    pub fn html() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
            escape_html: true,
        }
    }

    /// Bold yellow terminal escapes.
    pub fn ansi() -> Self {
        Self::custom("\x1b[1;33m", "\x1b[0m")
    }

    pub fn custom(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            escape_html: false,
        }
    }

    pub fn render(&self, segments: &[Segment<'_>]) -> String {
        let mut out = String::new();
        for segment in segments {
            if segment.is_marked() {
                out.push_str(&self.open);
            }
            if self.escape_html {
                push_escaped(&mut out, segment.text());
            } else {
                out.push_str(segment.text());
            }
            if segment.is_marked() {
                out.push_str(&self.close);
            }
        }
        out
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Highlight `terms` inside `text` and render with `markup`.
///
/// # Errors
/// Returns an error if a term's pattern cannot be compiled.
pub fn highlight<I, S>(text: &str, terms: I, markup: &Markup) -> SearchResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(markup.render(&segments(text, terms)?))
}
