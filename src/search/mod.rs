//! Search over the whole transcript, not just the rendered window.
//!
//! The scan runs over every message's content in parallel (rayon) and keeps the matching
//! message indices in transcript order. Moving to a hit outside the resident window asks
//! the [`WindowManager`] to re-window around the hit's batch first.

pub mod matcher;

pub use matcher::TermMatcher;
use rayon::prelude::*;
use tracing::debug;

use crate::models::Message;
use crate::render::is_omitted_media;
use crate::window::{Presentation, WindowManager};

/// Indices of messages whose content matches, in transcript order
///
/// Messages that only hold an omitted-media placeholder are never rendered and so never
/// match.
pub fn find_matches(messages: &[Message], matcher: &TermMatcher) -> Vec<usize> {
    messages
        .par_iter()
        .enumerate()
        .filter(|(_, message)| {
            matcher.is_match(&message.content) && !is_omitted_media(&message.content)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Active search term, its hits and the current hit
#[derive(Debug, Default)]
pub struct SearchNavigator {
    matcher: Option<TermMatcher>,
    matches: Vec<usize>,
    cursor: Option<usize>,
}

impl SearchNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search for `term` and move to the most recent hit
    ///
    /// An empty term clears the search. Returns the number of hits. Hits are the messages
    /// whose content matches, minus omitted-media placeholders: those render no element, so
    /// there is nothing to scroll to or mark.
    pub fn search<P: Presentation>(
        &mut self,
        term: &str,
        window: &mut WindowManager<P>,
    ) -> usize {
        let Some(matcher) = TermMatcher::new(term) else {
            self.clear(window);
            return 0;
        };

        self.matches = find_matches(window.messages(), &matcher);
        self.cursor = self.matches.len().checked_sub(1);
        self.matcher = Some(matcher);
        debug!(term, hits = self.matches.len(), "search");

        window.view_mut().set_highlight(Some(term));
        match self.cursor {
            Some(last) => {
                self.navigate_to(last, window);
            }
            None => window.view_mut().set_current_hit(None),
        }

        self.matches.len()
    }

    /// Move to the next (more recent) hit; false at the last one
    pub fn next<P: Presentation>(&mut self, window: &mut WindowManager<P>) -> bool {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.matches.len() => {
                self.navigate_to(cursor + 1, window)
            }
            _ => false,
        }
    }

    /// Move to the previous (older) hit; false at the first one
    pub fn previous<P: Presentation>(&mut self, window: &mut WindowManager<P>) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => self.navigate_to(cursor - 1, window),
            _ => false,
        }
    }

    /// Drop the term and hits, and remove highlights and the hit marker from the view
    pub fn clear<P: Presentation>(&mut self, window: &mut WindowManager<P>) {
        self.invalidate();
        let view = window.view_mut();
        view.set_highlight(None);
        view.set_current_hit(None);
    }

    /// Make hit `position` current, re-windowing if its batch is not resident
    ///
    /// Returns false if `position` is out of range.
    pub fn navigate_to<P: Presentation>(
        &mut self,
        position: usize,
        window: &mut WindowManager<P>,
    ) -> bool {
        let Some(&message_index) = self.matches.get(position) else {
            return false;
        };
        self.cursor = Some(position);

        let batch = window.batch_of(message_index);
        if !window.is_resident(batch) {
            window.jump_to(batch);
        }

        let view = window.view_mut();
        if !view.scroll_message_into_view(message_index) {
            debug!(message = message_index, "search hit is not rendered");
        }
        view.set_current_hit(Some(message_index));
        true
    }

    /// Forget everything, e.g. because the transcript changed
    pub fn invalidate(&mut self) {
        self.matcher = None;
        self.matches.clear();
        self.cursor = None;
    }

    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn term(&self) -> Option<&str> {
        self.matcher.as_ref().map(TermMatcher::term)
    }

    pub fn matcher(&self) -> Option<&TermMatcher> {
        self.matcher.as_ref()
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Message index of the current hit
    pub fn current_message(&self) -> Option<usize> {
        self.cursor.and_then(|cursor| self.matches.get(cursor).copied())
    }

    /// Position among the hits, e.g. `3/7`; `0/0` for a term without hits
    pub fn status(&self) -> Option<String> {
        self.matcher.as_ref()?;
        Some(match self.cursor {
            Some(cursor) => format!("{}/{}", cursor + 1, self.matches.len()),
            None => "0/0".to_string(),
        })
    }
}
