//! From an opened archive to an interactive chat session.
//!
//! Loading is split into steps because two decisions may need the user: which text file is
//! the transcript, and which participant is "me". Instead of blocking on a prompt, the
//! loader returns a request object ([`FileRequest`], [`PrincipalRequest`]) and the caller
//! answers it whenever it can, from a command-line flag or an interactive prompt.
//!
//! A [`ChatSession`] owns everything a running viewer needs: the transcript, the archive
//! index, the window manager and the search state. Closing (or dropping) it releases every
//! attachment resource it created.

pub mod loader;
pub mod principal;

pub use loader::{ChatLoader, FileRequest, LoadStep};
pub use principal::PrincipalRequest;
use tracing::info;

use crate::archive::{ArchiveIndex, ArchiveSource};
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::media::MediaStore;
use crate::models::Transcript;
use crate::search::SearchNavigator;
use crate::window::{Presentation, ScrollScheduler, WindowManager};

/// A fully parsed chat with its principal resolved, not yet shown anywhere
#[derive(Debug)]
pub struct LoadedChat {
    source: Box<dyn ArchiveSource>,
    file_name: String,
    transcript: Transcript,
}

impl LoadedChat {
    /// Name of the archive entry the transcript was read from
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_parts(self) -> (Transcript, Box<dyn ArchiveSource>) {
        (self.transcript, self.source)
    }

    /// Start a viewing session and render the most recent messages into `view`
    pub fn open<P: Presentation>(
        self,
        view: P,
        media: Box<dyn MediaStore>,
        config: ViewerConfig,
    ) -> Result<ChatSession<P>> {
        let archive = ArchiveIndex::build(self.source)?;
        let mut window =
            WindowManager::new(view, media, archive, self.transcript.shared_messages(), config)?;
        window.initialize();

        info!(file = %self.file_name, messages = self.transcript.len(), "opened chat session");
        Ok(ChatSession {
            file_name: self.file_name,
            transcript: self.transcript,
            window,
            search: SearchNavigator::new(),
            scroll: ScrollScheduler::new(),
        })
    }
}

/// A chat being viewed
pub struct ChatSession<P: Presentation> {
    file_name: String,
    transcript: Transcript,
    window: WindowManager<P>,
    search: SearchNavigator,
    scroll: ScrollScheduler,
}

impl<P: Presentation> ChatSession<P> {
    /// Scroll by `delta` rows (negative is up) and schedule a window check
    pub fn scroll_by(&mut self, delta: isize) {
        let offset = self.window.scroll_metrics().offset.saturating_add_signed(delta);
        self.window.view_mut().set_scroll_offset(offset);
        self.scroll.request();
    }

    /// Run the window check scheduled by scrolling, if any
    ///
    /// Called once per frame. Returns the number of batches loaded.
    pub fn frame(&mut self) -> usize {
        if self.scroll.take() { self.window.check_and_maybe_load() } else { 0 }
    }

    /// Re-window around the first message
    pub fn jump_to_start(&mut self) {
        if self.window.jump_to(0) {
            self.window.view_mut().set_scroll_offset(0);
        }
    }

    /// Re-window around the most recent messages, as when the chat was opened
    pub fn jump_to_end(&mut self) {
        self.window.reset();
        self.window.initialize();
    }

    /// Bring a message into view, re-windowing if its batch is not resident
    ///
    /// Returns false if the index is out of range or the message renders nothing.
    pub fn jump_to_message(&mut self, message_index: usize) -> bool {
        if message_index >= self.transcript.len() {
            return false;
        }
        let batch = self.window.batch_of(message_index);
        if !self.window.is_resident(batch) {
            self.window.jump_to(batch);
        }
        self.window.view_mut().scroll_message_into_view(message_index)
    }

    /// Search the whole transcript; returns the number of hits
    pub fn search(&mut self, term: &str) -> usize {
        self.search.search(term, &mut self.window)
    }

    pub fn next_match(&mut self) -> bool {
        self.search.next(&mut self.window)
    }

    pub fn previous_match(&mut self) -> bool {
        self.search.previous(&mut self.window)
    }

    pub fn clear_search(&mut self) {
        self.search.clear(&mut self.window);
    }

    pub fn search_state(&self) -> &SearchNavigator {
        &self.search
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn window(&self) -> &WindowManager<P> {
        &self.window
    }

    pub fn view(&self) -> &P {
        self.window.view()
    }

    pub fn view_mut(&mut self) -> &mut P {
        self.window.view_mut()
    }

    /// Tear the session down, releasing every resource it holds
    pub fn close(mut self) {
        self.search.invalidate();
        self.window.reset();
        info!(file = %self.file_name, "closed chat session");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::archive::MemoryArchive;
    use crate::media::MemoryMediaStore;
    use crate::window::test_support::FixedHeightView;

    fn transcript(count: usize) -> String {
        (0..count)
            .map(|i| {
                let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
                let body = if i % 10 == 0 {
                    format!("IMG-{}.jpg (file attached)", i)
                } else {
                    format!("line {}", i)
                };
                format!("1/2/2023, 10:{:02} - {}: {}", i % 60, sender, body)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn open(count: usize, media: Rc<RefCell<MemoryMediaStore>>) -> ChatSession<FixedHeightView> {
        let mut archive = MemoryArchive::new().with_text("_chat.txt", &transcript(count));
        for i in (0..count).step_by(10) {
            archive.insert(&format!("IMG-{}.jpg", i), vec![0xff]);
        }
        let step = ChatLoader::new(Box::new(archive), "export.zip").start().unwrap();
        let LoadStep::ChoosePrincipal(request) = step else {
            panic!("expected principal request");
        };
        let chat = request.resolve("Alice").unwrap();
        let config = ViewerConfig { batch_size: 10, ..Default::default() };
        chat.open(FixedHeightView::new(1, 5), Box::new(media), config).unwrap()
    }

    #[test]
    fn test_open_renders_tail() {
        let media = Rc::new(RefCell::new(MemoryMediaStore::new()));
        let session = open(100, Rc::clone(&media));

        assert_eq!(session.window().resident_indices(), vec![7, 8, 9]);
        assert_eq!(session.file_name(), "_chat.txt");
        assert_eq!(media.borrow().live_count(), 3);
    }

    #[test]
    fn test_scroll_checks_are_coalesced_per_frame() {
        let media = Rc::new(RefCell::new(MemoryMediaStore::new()));
        let mut session = open(100, media);

        session.scroll_by(-1000);
        session.scroll_by(-1000);
        assert_eq!(session.frame(), 1);
        assert_eq!(session.frame(), 0);
        assert_eq!(session.window().resident_indices(), vec![6, 7, 8, 9]);
    }

    #[test]
    fn test_search_and_navigation() {
        let media = Rc::new(RefCell::new(MemoryMediaStore::new()));
        let mut session = open(100, media);

        // "line 1" and "line 11" to "line 19"
        assert_eq!(session.search("line 1"), 10);
        assert_eq!(session.search_state().current_message(), Some(19));
        assert!(session.previous_match());
        assert_eq!(session.search_state().current_message(), Some(18));

        session.clear_search();
        assert_eq!(session.view().highlight, None);
        assert_eq!(session.search_state().cursor(), None);
    }

    #[test]
    fn test_jump_to_message_and_edges() {
        let media = Rc::new(RefCell::new(MemoryMediaStore::new()));
        let mut session = open(100, media);

        assert!(session.jump_to_message(42));
        assert_eq!(session.window().resident_indices(), vec![3, 4, 5]);
        assert!(!session.jump_to_message(100));

        session.jump_to_start();
        assert_eq!(session.window().resident_indices(), vec![0, 1]);
        assert_eq!(session.window().scroll_metrics().offset, 0);

        session.jump_to_end();
        assert_eq!(session.window().resident_indices(), vec![7, 8, 9]);
    }

    #[test]
    fn test_close_releases_every_resource() {
        let media = Rc::new(RefCell::new(MemoryMediaStore::new()));
        let mut session = open(100, Rc::clone(&media));
        session.jump_to_message(5);
        session.search("line");
        session.close();

        let media = media.borrow();
        assert_eq!(media.live_count(), 0);
        assert_eq!(media.released_count(), media.materialized_count());
    }
}
