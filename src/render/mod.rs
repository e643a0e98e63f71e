//! Turning transcript messages into presentation-ready records.
//!
//! Rendering is where attachments are resolved: a message that names an archive file gets
//! that file extracted through the [`MediaStore`], and the resulting [`ResourceHandle`] is
//! handed back so the batch that rendered it can release it later. A name the archive
//! cannot resolve is not an error for the load; the message is shown as plain text.

pub mod attachment;
pub mod markup;

pub use attachment::{AttachmentRef, detect_attachment, is_omitted_media};
pub use markup::{Segment, SegmentStyle, format_html, segments};
use tracing::warn;

use crate::archive::ArchiveIndex;
use crate::error::ViewerError;
use crate::media::{MediaStore, ResourceHandle};
use crate::models::{AttachmentKind, Message, MessageKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Attachment {
        kind: AttachmentKind,
        /// Archive entry name
        name: String,
        /// Where the extracted copy can be reached (see [`ResourceHandle::location`])
        location: String,
        caption: Option<String>,
    },
}

impl MessageBody {
    /// Text a search hit or clipboard copy refers to
    pub fn searchable_text(&self) -> &str {
        match self {
            MessageBody::Text(text) => text,
            MessageBody::Attachment { caption: Some(caption), .. } => caption,
            MessageBody::Attachment { name, .. } => name,
        }
    }
}

/// One message ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Position in the transcript
    pub message_index: usize,
    pub kind: MessageKind,
    /// Sender label, only shown for incoming messages
    pub sender: Option<String>,
    pub body: MessageBody,
    pub time: String,
}

/// Rendered messages of one batch, in transcript order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBatch {
    pub index: usize,
    pub messages: Vec<RenderedMessage>,
}

impl RenderedBatch {
    pub fn first_message(&self) -> Option<usize> {
        self.messages.first().map(|m| m.message_index)
    }

    pub fn contains_message(&self, message_index: usize) -> bool {
        self.messages.iter().any(|m| m.message_index == message_index)
    }
}

fn extract_attachment(
    attachment: &AttachmentRef,
    archive: &ArchiveIndex,
    media: &mut dyn MediaStore,
) -> crate::error::Result<ResourceHandle> {
    if !archive.contains(&attachment.file_name) {
        return Err(ViewerError::Resource { name: attachment.file_name.clone() });
    }
    let bytes = archive.read_binary(&attachment.file_name)?;
    media.materialize(&attachment.file_name, &bytes)
}

/// Render one message
///
/// Returns `None` for messages that only hold an omitted-media placeholder; those have
/// nothing to show. When an attachment is extracted its handle is returned alongside the
/// rendered message and the caller takes ownership of it.
pub fn render_message(
    index: usize,
    message: &Message,
    archive: &ArchiveIndex,
    media: &mut dyn MediaStore,
) -> Option<(RenderedMessage, Option<ResourceHandle>)> {
    if is_omitted_media(&message.content) {
        return None;
    }

    let sender = match message.kind {
        MessageKind::Incoming => message.sender.name().map(str::to_string),
        _ => None,
    };

    let mut handle = None;
    let body = match detect_attachment(&message.content, archive) {
        Some(attachment) => match extract_attachment(&attachment, archive, media) {
            Ok(resource) => {
                let body = MessageBody::Attachment {
                    kind: AttachmentKind::from_file_name(&attachment.file_name),
                    name: attachment.file_name,
                    location: resource.location().to_string(),
                    caption: attachment.caption,
                };
                handle = Some(resource);
                body
            }
            Err(e) => {
                warn!(message = index, error = %e, "attachment unavailable, showing text");
                MessageBody::Text(message.content.clone())
            }
        },
        None => MessageBody::Text(message.content.clone()),
    };

    let time = message.time.clone();
    Some((RenderedMessage { message_index: index, kind: message.kind, sender, body, time }, handle))
}
