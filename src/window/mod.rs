//! Windowed rendering of a long transcript.
//!
//! The transcript is split into fixed-size batches (`message_index / batch_size`). Only a
//! bounded number of batches is rendered at any time; the [`WindowManager`] loads the
//! neighbour of the edge the reader is scrolling towards and evicts the batch at the far
//! edge once the window is full. Evicted batches release their attachment resources.
//!
//! The manager does not draw anything itself. It talks to a [`Presentation`], which owns
//! the rendered content and the scroll position.

pub mod manager;
pub mod scheduler;

use std::ops::Range;

pub use manager::WindowManager;
pub use scheduler::ScrollScheduler;

use crate::media::ResourceHandle;
use crate::render::RenderedBatch;

/// Which edge of the rendered content a batch is inserted at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPosition {
    /// Older messages, above everything rendered so far
    Prepend,
    /// Newer messages, below everything rendered so far
    Append,
}

/// Scroll state of the presentation, in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Rows scrolled past at the top
    pub offset: usize,
    /// Total height of everything rendered
    pub content_height: usize,
    pub viewport_height: usize,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Rows of content below the bottom of the viewport
    pub fn remaining_below(&self) -> usize {
        self.max_offset().saturating_sub(self.offset)
    }
}

/// Display surface the window manager renders into
///
/// Implementations own the rendered batches and the scroll offset. The manager only
/// observes heights through [`Presentation::scroll_metrics`]; it never assumes how tall a
/// message is.
pub trait Presentation {
    /// Token identifying one inserted batch
    type Handle;

    fn insert_at_top(&mut self, batch: &RenderedBatch) -> Self::Handle;

    fn insert_at_bottom(&mut self, batch: &RenderedBatch) -> Self::Handle;

    fn remove(&mut self, handle: Self::Handle);

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Implementations clamp the offset to the scrollable range
    fn set_scroll_offset(&mut self, offset: usize);

    /// Row at which an inserted batch starts, if it is still present
    fn top_of(&self, handle: &Self::Handle) -> Option<usize>;

    /// Scroll so the message is visible; false if it is not rendered
    fn scroll_message_into_view(&mut self, message_index: usize) -> bool;

    /// Mark a single message as the current search hit (or clear the marker)
    fn set_current_hit(&mut self, message_index: Option<usize>);

    /// Highlight a search term in all rendered text (or clear it)
    fn set_highlight(&mut self, term: Option<&str>);
}

/// A resident batch
#[derive(Debug)]
pub struct Batch<H> {
    pub index: usize,
    /// Messages covered by the batch
    pub range: Range<usize>,
    pub(crate) handle: H,
    pub(crate) resources: Vec<ResourceHandle>,
}

impl<H> Batch<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

/// Message range of batch `index`, clamped to the transcript length
pub fn batch_range(index: usize, batch_size: usize, total: usize) -> Range<usize> {
    let start = index.saturating_mul(batch_size).min(total);
    let end = start.saturating_add(batch_size).min(total);
    start..end
}
