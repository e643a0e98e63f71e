//! Copying the current search hit to the system clipboard.
//!
//! Text messages copy their text; attachments copy the `file://` URL of the extracted file,
//! so the attachment can be opened from another program while the viewer is running.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

use crate::render::{MessageBody, RenderedMessage};

/// Maximum clipboard payload (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Destination of a copy (lets the viewer run against a fake clipboard in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard, opened on first use
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().context("Failed to initialize clipboard")?);
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            bail!("Clipboard unavailable");
        };
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("Cannot copy empty text to clipboard");
    }
    if text.len() > MAX_CLIPBOARD_SIZE {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }
    Ok(())
}

/// What copying a rendered message puts on the clipboard
pub fn clip_text(message: &RenderedMessage) -> &str {
    match &message.body {
        MessageBody::Text(text) => text,
        MessageBody::Attachment { location, .. } => location,
    }
}

/// Validate and copy `text` through `provider`
///
/// # Errors
///
/// Fails for empty text, text over 10MB, or when the provider itself fails (no clipboard in
/// a headless session, clipboard locked by another process).
pub fn copy_with(provider: &mut dyn ClipboardProvider, text: &str) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    copy_with(&mut SystemClipboard::new(), text)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Clipboard that remembers the last copy
    #[derive(Default)]
    pub(crate) struct MockClipboard {
        pub(crate) text: Option<String>,
        pub(crate) fail: bool,
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    /// Shared handle, so a test can inspect the clipboard after handing it to the app
    impl<C: ClipboardProvider> ClipboardProvider for Rc<RefCell<C>> {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.borrow_mut().set_text(text)
        }
    }
}
