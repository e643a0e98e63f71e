//! Message text markup: links and search highlights.
//!
//! Highlighting must never break a link or the escaping around it, so the order is fixed:
//! URLs are split out first, the search term is matched only in the plain text between
//! them, and escaping happens per segment when HTML is produced. Concatenating the segment
//! texts always gives back the original text.

use std::sync::OnceLock;

use regex::Regex;

use crate::search::TermMatcher;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Link,
    Match,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

impl Segment {
    fn new(text: &str, style: SegmentStyle) -> Self {
        Self { text: text.to_string(), style }
    }
}

fn push_plain(out: &mut Vec<Segment>, text: &str, matcher: Option<&TermMatcher>) {
    if text.is_empty() {
        return;
    }
    let Some(matcher) = matcher else {
        out.push(Segment::new(text, SegmentStyle::Plain));
        return;
    };

    let mut cursor = 0;
    for range in matcher.find_ranges(text) {
        if range.start > cursor {
            out.push(Segment::new(&text[cursor..range.start], SegmentStyle::Plain));
        }
        out.push(Segment::new(&text[range.clone()], SegmentStyle::Match));
        cursor = range.end;
    }
    if cursor < text.len() {
        out.push(Segment::new(&text[cursor..], SegmentStyle::Plain));
    }
}

/// Split message text into plain, link and highlighted segments
pub fn segments(text: &str, matcher: Option<&TermMatcher>) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for url in url_re().find_iter(text) {
        push_plain(&mut out, &text[cursor..url.start()], matcher);
        out.push(Segment::new(url.as_str(), SegmentStyle::Link));
        cursor = url.end();
    }
    push_plain(&mut out, &text[cursor..], matcher);

    out
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_with_breaks(s: &str) -> String {
    escape_html(s).replace('\n', "<br>")
}

pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment.style {
            SegmentStyle::Plain => html.push_str(&escape_with_breaks(&segment.text)),
            SegmentStyle::Link => {
                let url = escape_html(&segment.text);
                html.push_str(&format!(
                    r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{url}</a>"#
                ));
            }
            SegmentStyle::Match => {
                html.push_str("<mark>");
                html.push_str(&escape_with_breaks(&segment.text));
                html.push_str("</mark>");
            }
        }
    }
    html
}

/// Format message text as HTML with links and optional highlights
///
/// # Examples
///
/// ```
/// use chat_export_explorer::render::markup::format_html;
/// use chat_export_explorer::search::TermMatcher;
///
/// let matcher = TermMatcher::new("docs");
/// let html = format_html("<b> docs: https://x.io/docs", matcher.as_ref());
/// assert_eq!(
///     html,
///     "&lt;b&gt; <mark>docs</mark>: <a href=\"https://x.io/docs\" target=\"_blank\" \
///      rel=\"noopener noreferrer\">https://x.io/docs</a>"
/// );
/// ```
pub fn format_html(text: &str, matcher: Option<&TermMatcher>) -> String {
    to_html(&segments(text, matcher))
}
