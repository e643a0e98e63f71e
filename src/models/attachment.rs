use serde::Serialize;

/// Media category of an attached file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Audio,
    Video,
    Generic,
}

const EXTENSION_TABLE: &[(&str, AttachmentKind)] = &[
    ("jpg", AttachmentKind::Image),
    ("jpeg", AttachmentKind::Image),
    ("png", AttachmentKind::Image),
    ("gif", AttachmentKind::Image),
    ("webp", AttachmentKind::Image),
    ("opus", AttachmentKind::Audio),
    ("ogg", AttachmentKind::Audio),
    ("mp3", AttachmentKind::Audio),
    ("m4a", AttachmentKind::Audio),
    ("aac", AttachmentKind::Audio),
    ("mp4", AttachmentKind::Video),
    ("mov", AttachmentKind::Video),
    ("webm", AttachmentKind::Video),
];

impl AttachmentKind {
    pub fn from_file_name(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return AttachmentKind::Generic;
        };
        let ext = ext.to_ascii_lowercase();
        EXTENSION_TABLE
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, kind)| *kind)
            .unwrap_or(AttachmentKind::Generic)
    }

    /// Short tag used by the terminal view and HTML export
    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Video => "video",
            AttachmentKind::Generic => "file",
        }
    }
}
