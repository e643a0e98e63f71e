//! Viewer application state and event handling.
//!
//! The `App` owns a [`ChatSession`] rendered into a [`TranscriptView`] and drives it from
//! key presses:
//!
//! - **Scrolling**: line and page moves schedule a window check that runs once per frame
//! - **Search**: `/` opens the search prompt; Enter runs it, `n`/`N` step through matches
//! - **Clipboard**: Ctrl+Y copies the message under the search marker
//! - **Status messages**: transient feedback with expiry
//! - **Dirty state tracking**: redraw only when something changed

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use tracing::debug;

use super::events::{Action, InputMode, poll_event};
use super::layout::AppLayout;
use super::rendering::{RenderState, render_ui};
use super::view::TranscriptView;
use crate::clipboard::{ClipboardProvider, SystemClipboard, clip_text, copy_with};
use crate::session::ChatSession;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Longest accepted search term, in characters
const MAX_SEARCH_INPUT: usize = 256;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, message_type: MessageType, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct App {
    session: ChatSession<TranscriptView>,
    mode: InputMode,
    search_input: String,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    clipboard: Box<dyn ClipboardProvider>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(session: ChatSession<TranscriptView>) -> Self {
        Self::with_clipboard(session, Box::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(
        session: ChatSession<TranscriptView>,
        clipboard: Box<dyn ClipboardProvider>,
    ) -> Self {
        Self {
            session,
            mode: InputMode::Normal,
            search_input: String::new(),
            should_quit: false,
            status_message: None,
            clipboard,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn session(&self) -> &ChatSession<TranscriptView> {
        &self.session
    }

    /// Hand the session back, e.g. to close it explicitly
    pub fn into_session(self) -> ChatSession<TranscriptView> {
        self.session
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage::new(text, message_type, duration_ms));
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        if self.status_message.as_ref().is_some_and(StatusMessage::is_expired) {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Fit the view to the transcript pane of a terminal area
    fn fit_to(&mut self, area: Rect) {
        let (width, height) = AppLayout::new(area).transcript_inner();
        let view = self.session.view();
        if view.width() != usize::from(width) || view.viewport_height() != usize::from(height) {
            self.session.view_mut().resize(width, height);
            // A taller pane may expose an edge that needs another batch
            self.session.scroll_by(0);
            self.needs_redraw = true;
        }
    }

    fn page_rows(&self) -> isize {
        let rows = self.session.view().viewport_height().saturating_sub(1).max(1);
        isize::try_from(rows).unwrap_or(isize::MAX)
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();

            let size = terminal.size()?;
            self.fit_to(Rect::new(0, 0, size.width, size.height));

            let loaded = self.session.frame();
            if loaded > 0 {
                debug!(loaded, "window check loaded batches");
                self.needs_redraw = true;
            }

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| render_ui(f, self.render_state()))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.mode)?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn render_state(&self) -> RenderState<'_> {
        let search = self.session.search_state();
        let resident = self.session.window().resident_indices();
        RenderState {
            title: self.session.file_name(),
            lines: self.session.view().visible_lines(),
            mode: self.mode,
            search_input: &self.search_input,
            search: search.term().zip(search.status()),
            message_count: self.session.transcript().len(),
            window: resident
                .first()
                .zip(resident.last())
                .map(|(&first, &last)| (first, last, self.session.window().batch_count())),
            status_message: self.status_message.as_ref(),
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Back => self.back(),
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-self.page_rows()),
            Action::PageDown => self.scroll(self.page_rows()),
            Action::Home => {
                self.session.jump_to_start();
                self.needs_redraw = true;
            }
            Action::End => {
                self.session.jump_to_end();
                self.needs_redraw = true;
            }
            Action::StartSearch => {
                self.mode = InputMode::Search;
                self.search_input = self.session.search_state().term().unwrap_or("").to_string();
                self.needs_redraw = true;
            }
            Action::SearchInput(c) => {
                if self.search_input.chars().count() < MAX_SEARCH_INPUT {
                    self.search_input.push(c);
                    self.needs_redraw = true;
                }
            }
            Action::DeleteChar => {
                if self.search_input.pop().is_some() {
                    self.needs_redraw = true;
                }
            }
            Action::Submit => {
                if self.mode == InputMode::Search {
                    self.submit_search();
                }
            }
            Action::NextMatch => self.step_match(true),
            Action::PreviousMatch => self.step_match(false),
            Action::CopyToClipboard => self.copy_current(),
            Action::None => {}
        }
    }

    fn scroll(&mut self, delta: isize) {
        self.session.scroll_by(delta);
        self.needs_redraw = true;
    }

    /// Esc: leave the prompt, then drop the active search, then quit
    fn back(&mut self) {
        if self.mode == InputMode::Search {
            self.mode = InputMode::Normal;
            self.search_input.clear();
        } else if self.session.search_state().is_active() {
            self.session.clear_search();
        } else {
            self.should_quit = true;
        }
        self.needs_redraw = true;
    }

    fn submit_search(&mut self) {
        self.mode = InputMode::Normal;
        let term = std::mem::take(&mut self.search_input);
        let hits = self.session.search(&term);
        self.needs_redraw = true;

        if term.is_empty() {
            return;
        }
        if hits == 0 {
            self.set_status(
                format!("✗ No matches for \"{}\"", term),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            );
        }
    }

    fn step_match(&mut self, forward: bool) {
        if !self.session.search_state().is_active() {
            return;
        }
        let moved =
            if forward { self.session.next_match() } else { self.session.previous_match() };
        if moved {
            self.needs_redraw = true;
        } else if !self.session.search_state().matches().is_empty() {
            let edge = if forward { "Last match" } else { "First match" };
            self.set_status(edge, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
        }
    }

    fn copy_current(&mut self) {
        let text = match self.session.search_state().current_message() {
            None => Err("✗ No message selected"),
            Some(index) => match self.session.view().rendered_message(index) {
                Some(message) => Ok(clip_text(message).to_string()),
                None => Err("✗ Message not loaded"),
            },
        };
        let text = match text {
            Ok(text) => text,
            Err(reason) => {
                self.set_status(reason, MessageType::Error, STATUS_ERROR_DURATION_MS);
                return;
            }
        };

        match copy_with(self.clipboard.as_mut(), &text) {
            Ok(()) => self.set_status(
                "✓ Copied to clipboard",
                MessageType::Success,
                STATUS_SUCCESS_DURATION_MS,
            ),
            Err(e) => self.set_status(
                format!("✗ Clipboard error: {}", e),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            ),
        }
    }
}
