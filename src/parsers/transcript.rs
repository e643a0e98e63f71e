use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::{Message, ParsedTranscript};

/// How many leading lines [`looks_like_transcript`] inspects
const SNIFF_LINES: usize = 10;

/// Separator between the date/time prefix and the message body
const PREFIX_SEPARATOR: &str = " - ";

/// Directional and zero-width marks that exports sprinkle around names and timestamps
fn is_control_mark(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{FEFF}')
}

fn message_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4},\s*.*?-\s*").expect("valid regex"))
}

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4},").expect("valid regex"))
}

fn sender_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^:]+):\s").expect("valid regex"))
}

fn clean_line(line: &str) -> String {
    let stripped: String = line.chars().filter(|c| !is_control_mark(*c)).collect();
    stripped.trim().to_string()
}

/// Split a start line into a fresh message. Returns `None` when the line only looks like a
/// start line (date prefix without the ` - ` separator), in which case it is continuation text.
fn start_message(line: &str) -> Option<(Message, Option<&str>)> {
    let (prefix, body) = line.split_once(PREFIX_SEPARATOR)?;
    let (date, time) = match prefix.split_once(',') {
        Some((date, time)) => (date.trim(), time.trim()),
        None => (prefix.trim(), ""),
    };

    if let Some(caps) = sender_re().captures(body) {
        let sender = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let content = &body[caps.get(0).map(|m| m.end()).unwrap_or_default()..];
        Some((Message::from_participant(sender, content, date, time), Some(sender)))
    } else {
        Some((Message::system(body, date), None))
    }
}

/// Parse a raw chat export into messages and participants
///
/// Scans the text line by line. A line that begins with `d/m/yyyy, time - ` starts a new
/// message; any other non-blank line continues the message in progress. Blank lines are
/// ignored. Lines before the first start line have nothing to continue and are dropped.
///
/// Parsing never fails: text with no start lines yields an empty transcript, and malformed
/// start lines are kept as continuation text.
///
/// # Examples
///
/// ```
/// use chat_export_explorer::parse_transcript;
///
/// let raw = "1/2/2023, 10:00 - Alice: Hello\nworld\n1/2/2023, 10:01 - Bob: Hi";
/// let parsed = parse_transcript(raw);
/// assert_eq!(parsed.len(), 2);
/// assert_eq!(parsed.messages()[0].content, "Hello\nworld");
/// assert_eq!(parsed.participants().as_slice(), ["Alice", "Bob"]);
/// ```
pub fn parse_transcript(raw: &str) -> ParsedTranscript {
    let mut parsed = ParsedTranscript::default();
    let mut current: Option<Message> = None;
    let mut orphaned_lines = 0usize;

    for line in raw.lines() {
        let line = clean_line(line);
        if line.is_empty() {
            continue;
        }

        let started =
            if message_start_re().is_match(&line) { start_message(&line) } else { None };

        match started {
            Some((message, sender)) => {
                if let Some(done) = current.take() {
                    parsed.messages.push(done);
                }
                if let Some(sender) = sender {
                    parsed.participants.insert(sender);
                }
                current = Some(message);
            }
            None => match current.as_mut() {
                Some(message) => {
                    message.content.push('\n');
                    message.content.push_str(&line);
                }
                None => orphaned_lines += 1,
            },
        }
    }

    if let Some(done) = current {
        parsed.messages.push(done);
    }

    debug!(
        messages = parsed.messages.len(),
        participants = parsed.participants.len(),
        orphaned_lines,
        "parsed transcript"
    );

    parsed
}

/// Cheap shape check used when choosing between several candidate text files
pub fn looks_like_transcript(text: &str) -> bool {
    text.lines().take(SNIFF_LINES).any(|line| date_prefix_re().is_match(&clean_line(line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageKind, Sender};

    #[test]
    fn test_parse_two_messages_with_continuation() {
        let parsed =
            parse_transcript("1/2/2023, 10:00 - Alice: Hello\nworld\n1/2/2023, 10:01 - Bob: Hi");

        assert_eq!(parsed.len(), 2);
        let first = &parsed.messages()[0];
        assert_eq!(first.sender, Sender::Participant("Alice".to_string()));
        assert_eq!(first.content, "Hello\nworld");
        assert_eq!(first.time, "10:00");
        assert_eq!(first.date, "1/2/2023");
        assert_eq!(first.kind, MessageKind::Unassigned);

        let second = &parsed.messages()[1];
        assert_eq!(second.sender, Sender::Participant("Bob".to_string()));
        assert_eq!(second.content, "Hi");
        assert_eq!(second.time, "10:01");

        assert_eq!(parsed.participants().as_slice(), ["Alice", "Bob"]);
    }

    #[test]
    fn test_parse_system_message() {
        let parsed = parse_transcript(
            "12/31/2022, 9:15 pm - Messages and calls are end-to-end encrypted.\n\
             12/31/2022, 9:16 pm - Alice: ok",
        );

        assert_eq!(parsed.len(), 2);
        let system = &parsed.messages()[0];
        assert_eq!(system.sender, Sender::System);
        assert_eq!(system.kind, MessageKind::System);
        assert_eq!(system.content, "Messages and calls are end-to-end encrypted.");
        assert_eq!(system.time, "");
        assert_eq!(parsed.participants().as_slice(), ["Alice"]);
    }

    #[test]
    fn test_parse_strips_control_marks() {
        let raw = "\u{200E}1/2/2023, 10:00 - \u{202A}Alice\u{202C}: \u{200F}hi there";
        let parsed = parse_transcript(raw);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.messages()[0].sender.name(), Some("Alice"));
        assert_eq!(parsed.messages()[0].content, "hi there");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let parsed = parse_transcript("1/2/2023, 10:00 - Alice: one\n\n   \ntwo\r\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.messages()[0].content, "one\ntwo");
    }

    #[test]
    fn test_parse_without_start_lines_is_empty() {
        let parsed = parse_transcript("just some notes\nnothing chat-like here");
        assert!(parsed.is_empty());
        assert!(parsed.participants().is_empty());
    }

    #[test]
    fn test_parse_empty_input() {
        let parsed = parse_transcript("");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_date_prefix_without_separator_is_continuation() {
        let parsed = parse_transcript("1/2/2023, 10:00 - Alice: see\n3/4/2023,- not a start");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.messages()[0].content, "see\n3/4/2023,- not a start");
    }

    #[test]
    fn test_sender_requires_space_after_colon() {
        let parsed = parse_transcript("1/2/2023, 10:00 - https://example.com/x");
        assert_eq!(parsed.messages()[0].sender, Sender::System);
        assert!(parsed.participants().is_empty());
    }

    #[test]
    fn test_content_keeps_later_colons() {
        let parsed = parse_transcript("1/2/2023, 10:00 - Alice: note: bring snacks");
        assert_eq!(parsed.messages()[0].content, "note: bring snacks");
    }

    #[test]
    fn test_start_line_round_trip() {
        let line = "1/2/2023, 10:00 - Alice: Hello";
        let parsed = parse_transcript(line);
        assert_eq!(parsed.messages()[0].start_line(), line);
    }

    #[test]
    fn test_participants_deduplicated_in_first_seen_order() {
        let parsed = parse_transcript(
            "1/2/2023, 10:00 - Bob: a\n1/2/2023, 10:01 - Alice: b\n1/2/2023, 10:02 - Bob: c",
        );
        assert_eq!(parsed.participants().as_slice(), ["Bob", "Alice"]);
    }

    #[test]
    fn test_looks_like_transcript() {
        assert!(looks_like_transcript("header\n1/2/2023, 10:00 - Alice: hi"));
        assert!(!looks_like_transcript("shopping list\neggs\nmilk"));

        let late = format!("{}1/2/2023, 10:00 - Alice: hi", "filler\n".repeat(10));
        assert!(!looks_like_transcript(&late));
    }
}
