use std::sync::OnceLock;

use regex::Regex;

use crate::archive::ArchiveIndex;

/// Placeholders exports write instead of media that was left out of the archive
pub const OMITTED_MEDIA_MARKERS: &[&str] = &["<Multimedia omitido>", "<Media omitted>"];

fn attached_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([^\n]*?)\s+\((?:archivo adjunto|file attached)\)(?:\n([\s\S]*))?$")
            .expect("valid regex")
    })
}

/// A message that refers to an archive file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub file_name: String,
    pub caption: Option<String>,
}

/// Find the attachment a message refers to, if any
///
/// Two shapes are recognised: `<file name> (file attached)` optionally followed by a caption
/// on the next lines, and a message whose whole (trimmed) text is the name of a file in the
/// archive. The returned name still has to be resolved against the index; it may be missing.
pub fn detect_attachment(content: &str, index: &ArchiveIndex) -> Option<AttachmentRef> {
    if let Some(caps) = attached_file_re().captures(content) {
        let file_name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if !file_name.is_empty() {
            let caption = caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .filter(|caption| !caption.is_empty());
            return Some(AttachmentRef { file_name: file_name.to_string(), caption });
        }
    }

    let trimmed = content.trim();
    if !trimmed.is_empty() && index.contains(trimmed) {
        return Some(AttachmentRef { file_name: trimmed.to_string(), caption: None });
    }

    None
}

pub fn is_omitted_media(content: &str) -> bool {
    OMITTED_MEDIA_MARKERS.iter().any(|marker| content.contains(marker))
}
