//! Choosing which text entry of an export is the chat transcript.
//!
//! Exports normally contain exactly one transcript, but renamed or merged exports can hold
//! several `.txt` files. The heuristic, in order:
//!
//! 1. an entry named exactly `_chat.txt`
//! 2. an entry named after the archive itself (`Chat with Bob.zip` → `Chat with Bob.txt`)
//! 3. the only `.txt` file, if there is exactly one
//! 4. the only `.txt` file whose name contains `chat`
//! 5. among the chat-named files (or all text files if none are chat-named), those whose
//!    first lines look like a transcript; if several qualify the caller must ask

use tracing::{debug, warn};

use super::{ArchiveEntry, ArchiveSource};
use crate::error::{Result, ViewerError};
use crate::parsers::looks_like_transcript;

const DEFAULT_CHAT_FILE: &str = "_chat.txt";

/// Outcome of transcript selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFileChoice {
    Resolved(String),
    /// Several files qualify; the user has to pick one
    Ambiguous(Vec<String>),
}

/// Name the transcript would have if it was named after the archive
fn archive_derived_name(archive_name: &str) -> String {
    let split = archive_name.len().saturating_sub(4);
    let (stem, ext) = match (archive_name.get(..split), archive_name.get(split..)) {
        (Some(stem), Some(ext)) => (stem, ext),
        _ => (archive_name, ""),
    };

    if ext.eq_ignore_ascii_case(".zip") {
        format!("{}.txt", stem)
    } else if ext.eq_ignore_ascii_case(".txt") {
        archive_name.to_string()
    } else {
        format!("{}.txt", archive_name)
    }
}

/// Pick the transcript entry of an archive
///
/// # Errors
///
/// `ViewerError::Format` if the archive has no `.txt` entries, or if none of the candidates
/// look like a transcript.
pub fn find_chat_file(source: &dyn ArchiveSource, archive_name: &str) -> Result<ChatFileChoice> {
    let entries = source.list_entries()?;
    let files: Vec<&ArchiveEntry> = entries.iter().filter(|e| !e.is_directory).collect();

    if files.iter().any(|e| e.name == DEFAULT_CHAT_FILE) {
        return Ok(ChatFileChoice::Resolved(DEFAULT_CHAT_FILE.to_string()));
    }

    let derived = archive_derived_name(archive_name);
    if files.iter().any(|e| e.name == derived) {
        return Ok(ChatFileChoice::Resolved(derived));
    }

    let text_files: Vec<&ArchiveEntry> = files.into_iter().filter(|e| e.is_text_file()).collect();
    match text_files.as_slice() {
        [] => return Err(ViewerError::Format("No .txt files found in the archive".to_string())),
        [only] => return Ok(ChatFileChoice::Resolved(only.name.clone())),
        _ => {}
    }

    let chat_named: Vec<&ArchiveEntry> =
        text_files.iter().copied().filter(|e| e.name.to_lowercase().contains("chat")).collect();
    if let [only] = chat_named.as_slice() {
        return Ok(ChatFileChoice::Resolved(only.name.clone()));
    }

    let to_validate = if chat_named.is_empty() { &text_files } else { &chat_named };
    let valid: Vec<String> = to_validate
        .iter()
        .filter(|entry| match source.read_entry_text(&entry.name) {
            Ok(text) => looks_like_transcript(&text),
            Err(e) => {
                warn!(entry = %entry.name, error = %e, "could not read candidate transcript");
                false
            }
        })
        .map(|entry| entry.name.clone())
        .collect();

    debug!(candidates = to_validate.len(), valid = valid.len(), "validated transcript candidates");

    match valid.len() {
        0 => Err(ViewerError::Format("Could not find a valid chat transcript".to_string())),
        1 => Ok(ChatFileChoice::Resolved(valid.into_iter().next().unwrap_or_default())),
        _ => Ok(ChatFileChoice::Ambiguous(valid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;

    const CHAT: &str = "1/2/2023, 10:00 - Alice: hi";

    #[test]
    fn test_default_chat_file_wins() {
        let archive =
            MemoryArchive::new().with_text("_chat.txt", CHAT).with_text("other.txt", CHAT);
        let choice = find_chat_file(&archive, "export.zip").unwrap();
        assert_eq!(choice, ChatFileChoice::Resolved("_chat.txt".into()));
    }

    #[test]
    fn test_archive_derived_name() {
        let archive = MemoryArchive::new()
            .with_text("WhatsApp Chat with Bob.txt", CHAT)
            .with_text("chat notes.txt", CHAT);
        let choice = find_chat_file(&archive, "WhatsApp Chat with Bob.ZIP").unwrap();
        assert_eq!(choice, ChatFileChoice::Resolved("WhatsApp Chat with Bob.txt".into()));
    }

    #[test]
    fn test_single_text_file() {
        let archive =
            MemoryArchive::new().with_text("export.txt", "anything").with_binary("a.jpg", vec![1]);
        let choice = find_chat_file(&archive, "x.zip").unwrap();
        assert_eq!(choice, ChatFileChoice::Resolved("export.txt".into()));
    }

    #[test]
    fn test_no_text_files_is_format_error() {
        let archive = MemoryArchive::new().with_binary("a.jpg", vec![1]);
        let err = find_chat_file(&archive, "x.zip").unwrap_err();
        assert!(matches!(err, ViewerError::Format(_)));
        assert!(err.to_string().contains("No .txt files"));
    }

    #[test]
    fn test_single_chat_named_file() {
        let archive = MemoryArchive::new()
            .with_text("readme.txt", "hello")
            .with_text("My Chat.txt", "not validated");
        let choice = find_chat_file(&archive, "x.zip").unwrap();
        assert_eq!(choice, ChatFileChoice::Resolved("My Chat.txt".into()));
    }

    #[test]
    fn test_content_validation_picks_transcript() {
        let archive = MemoryArchive::new()
            .with_text("notes.txt", "groceries\nmilk")
            .with_text("log.txt", CHAT);
        let choice = find_chat_file(&archive, "x.zip").unwrap();
        assert_eq!(choice, ChatFileChoice::Resolved("log.txt".into()));
    }

    #[test]
    fn test_multiple_valid_transcripts_are_ambiguous() {
        let archive = MemoryArchive::new()
            .with_text("chat a.txt", CHAT)
            .with_text("chat b.txt", CHAT)
            .with_text("chat c.txt", "not a transcript");
        let choice = find_chat_file(&archive, "x.zip").unwrap();
        let expected = vec!["chat a.txt".to_string(), "chat b.txt".to_string()];
        assert_eq!(choice, ChatFileChoice::Ambiguous(expected));
    }

    #[test]
    fn test_no_valid_transcript_is_format_error() {
        let archive =
            MemoryArchive::new().with_text("a.txt", "nothing").with_text("b.txt", "here");
        let err = find_chat_file(&archive, "x.zip").unwrap_err();
        assert!(err.to_string().contains("Could not find a valid chat transcript"));
    }
}
