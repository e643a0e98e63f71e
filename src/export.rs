//! Whole-transcript export.
//!
//! JSON keeps the parsed messages as they are. HTML produces one standalone page, styled
//! inline so it works offline, with links clickable and an optional term highlighted.
//! Attachments become relative links, so the page works when saved next to the export.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::archive::ArchiveIndex;
use crate::models::{AttachmentKind, Message, MessageKind, Transcript};
use crate::render::attachment::{detect_attachment, is_omitted_media};
use crate::render::markup::{escape_html, format_html};
use crate::search::TermMatcher;

const PAGE_CSS: &str = "\
body { font-family: system-ui, sans-serif; background: #f4f4f5; margin: 0; }
main { max-width: 48rem; margin: 0 auto; padding: 1rem; display: flex; flex-direction: column; }
.message { margin: 0.25rem 0; padding: 0.5rem 0.75rem; border-radius: 0.5rem; max-width: 75%; }
.incoming { background: #fff; align-self: flex-start; }
.outgoing, .unassigned { background: #d1fae5; align-self: flex-end; }
.system { background: #e4e4e7; align-self: center; font-size: 0.85em; }
.sender { font-weight: 600; color: #0369a1; display: block; }
.time { font-size: 0.75em; color: #71717a; float: right; margin-left: 0.5rem; }
mark { background: #fde68a; }
";

/// JSON shape of an exported chat
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub file: &'a str,
    pub principal: Option<&'a str>,
    pub participants: &'a [String],
    pub messages: &'a [Message],
}

impl<'a> ExportDocument<'a> {
    pub fn new(file: &'a str, transcript: &'a Transcript) -> Self {
        Self {
            file,
            principal: transcript.principal(),
            participants: transcript.participants().as_slice(),
            messages: transcript.messages(),
        }
    }
}

pub fn to_json(file: &str, transcript: &Transcript) -> Result<String> {
    serde_json::to_string_pretty(&ExportDocument::new(file, transcript))
        .context("Failed to serialize transcript")
}

fn kind_class(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Unassigned => "unassigned",
        MessageKind::Outgoing => "outgoing",
        MessageKind::Incoming => "incoming",
        MessageKind::System => "system",
    }
}

fn message_body_html(
    message: &Message,
    archive: &ArchiveIndex,
    matcher: Option<&TermMatcher>,
) -> String {
    let Some(attachment) = detect_attachment(&message.content, archive) else {
        return format_html(&message.content, matcher);
    };
    if !archive.contains(&attachment.file_name) {
        return format_html(&message.content, matcher);
    }

    let kind = AttachmentKind::from_file_name(&attachment.file_name);
    let name = escape_html(&attachment.file_name);
    let mut html =
        format!("<a class=\"attachment\" href=\"{}\">[{}] {}</a>", name, kind.label(), name);
    if let Some(caption) = &attachment.caption {
        html.push_str("<br>");
        html.push_str(&format_html(caption, matcher));
    }
    html
}

/// Render the whole transcript as one HTML page
pub fn to_html(
    file: &str,
    transcript: &Transcript,
    archive: &ArchiveIndex,
    highlight: Option<&TermMatcher>,
) -> String {
    let title = escape_html(file);
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n<main>\n",
        title, PAGE_CSS
    );

    let mut written = 0usize;
    for message in transcript.messages() {
        if is_omitted_media(&message.content) {
            continue;
        }

        let _ = write!(html, "<article class=\"message {}\">", kind_class(message.kind));
        if message.kind == MessageKind::Incoming
            && let Some(name) = message.sender.name()
        {
            let _ = write!(html, "<span class=\"sender\">{}</span>", escape_html(name));
        }
        if !message.time.is_empty() {
            let _ = write!(html, "<span class=\"time\">{}</span>", escape_html(&message.time));
        }
        html.push_str(&message_body_html(message, archive, highlight));
        html.push_str("</article>\n");
        written += 1;
    }

    html.push_str("</main>\n</body>\n</html>\n");
    debug!(messages = written, "rendered html export");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::parse_transcript;

    const RAW: &str = "1/2/2023, 10:00 - Alice: Hello <world>\n\
                       1/2/2023, 10:01 - Bob: see https://example.com\n\
                       1/2/2023, 10:02 - Bob: <Media omitted>\n\
                       1/2/2023, 10:03 - Bob: IMG-1.jpg (file attached)\nsunset\n\
                       1/2/2023, 10:04 - Alice joined";

    fn transcript() -> Transcript {
        parse_transcript(RAW).assign_principal(Some("Alice"))
    }

    fn archive() -> ArchiveIndex {
        let source =
            MemoryArchive::new().with_text("_chat.txt", RAW).with_binary("IMG-1.jpg", vec![1]);
        ArchiveIndex::build(Box::new(source)).unwrap()
    }

    #[test]
    fn test_json_export_shape() {
        let transcript = transcript();
        let json = to_json("_chat.txt", &transcript).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["file"], "_chat.txt");
        assert_eq!(value["principal"], "Alice");
        assert_eq!(value["participants"], serde_json::json!(["Alice", "Bob"]));
        assert_eq!(value["messages"].as_array().unwrap().len(), 5);
        assert_eq!(value["messages"][0]["kind"], "outgoing");
        assert_eq!(value["messages"][1]["sender"]["name"], "Bob");
    }

    #[test]
    fn test_html_escapes_and_links() {
        let html = to_html("_chat.txt", &transcript(), &archive(), None);

        assert!(html.contains("Hello &lt;world&gt;"));
        assert!(html.contains("<a href=\"https://example.com\""));
        assert!(html.contains("<span class=\"sender\">Bob</span>"));
        assert!(!html.contains("<span class=\"sender\">Alice</span>"));
    }

    #[test]
    fn test_html_skips_omitted_media_and_links_attachments() {
        let html = to_html("_chat.txt", &transcript(), &archive(), None);

        assert!(!html.contains("Media omitted"));
        assert!(html.contains("<a class=\"attachment\" href=\"IMG-1.jpg\">[image] IMG-1.jpg</a>"));
        assert!(html.contains("<br>sunset"));
        assert_eq!(html.matches("<article").count(), 4);
    }

    #[test]
    fn test_html_highlight() {
        let matcher = TermMatcher::new("hello");
        let html = to_html("_chat.txt", &transcript(), &archive(), matcher.as_ref());
        assert!(html.contains("<mark>Hello</mark>"));
    }

    #[test]
    fn test_html_title_is_escaped() {
        let html = to_html("<chat>.txt", &transcript(), &archive(), None);
        assert!(html.contains("<title>&lt;chat&gt;.txt</title>"));
    }
}
