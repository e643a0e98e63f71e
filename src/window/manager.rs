use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info};

use super::{Batch, LoadPosition, Presentation, ScrollMetrics, batch_range};
use crate::archive::ArchiveIndex;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::media::MediaStore;
use crate::models::Message;
use crate::render::{RenderedBatch, render_message};

/// Keeps a bounded, scroll-driven window of rendered batches
///
/// Invariants held after every public call:
///
/// - at most `max_batches` batches are resident
/// - a batch is either fully rendered and tracked, or absent
/// - every resource handle created for a batch is released exactly once, when the batch
///   leaves the window (or when the manager is dropped)
pub struct WindowManager<P: Presentation> {
    view: P,
    media: Box<dyn MediaStore>,
    archive: ArchiveIndex,
    messages: Arc<[Message]>,
    config: ViewerConfig,
    resident: BTreeMap<usize, Batch<P::Handle>>,
}

impl<P: Presentation> WindowManager<P> {
    pub fn new(
        view: P,
        media: Box<dyn MediaStore>,
        archive: ArchiveIndex,
        messages: Arc<[Message]>,
        config: ViewerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { view, media, archive, messages, config, resident: BTreeMap::new() })
    }

    /// Render the most recent batches and scroll to the bottom
    ///
    /// Returns the number of batches loaded.
    pub fn initialize(&mut self) -> usize {
        let total = self.batch_count();
        let preload = total.min(self.config.preload_batches);

        let mut loaded = 0;
        for back in 1..=preload {
            if self.load_batch(total - back, LoadPosition::Prepend) {
                loaded += 1;
            }
        }

        let metrics = self.view.scroll_metrics();
        self.view.set_scroll_offset(metrics.max_offset());

        info!(
            messages = self.messages.len(),
            batches = total,
            preloaded = loaded,
            "initialized transcript window"
        );
        loaded
    }

    /// Render batch `index` at one edge of the window
    ///
    /// Returns false without doing anything if the batch does not exist or is already
    /// resident. Prepending keeps the visible content in place by moving the scroll offset
    /// down by the inserted height. If the window is over capacity afterwards, one batch is
    /// evicted from the opposite edge; the batch just loaded is never the one evicted.
    pub fn load_batch(&mut self, index: usize, position: LoadPosition) -> bool {
        if index >= self.batch_count() || self.resident.contains_key(&index) {
            return false;
        }

        let range = self.batch_range(index);
        let mut rendered = RenderedBatch { index, messages: Vec::with_capacity(range.len()) };
        let mut resources = Vec::new();
        for message_index in range.clone() {
            let message = &self.messages[message_index];
            if let Some((message, resource)) =
                render_message(message_index, message, &self.archive, self.media.as_mut())
            {
                rendered.messages.push(message);
                resources.extend(resource);
            }
        }

        let handle = match position {
            LoadPosition::Prepend => {
                let before = self.view.scroll_metrics();
                let handle = self.view.insert_at_top(&rendered);
                let after = self.view.scroll_metrics();
                let inserted = after.content_height.saturating_sub(before.content_height);
                self.view.set_scroll_offset(before.offset + inserted);
                handle
            }
            LoadPosition::Append => self.view.insert_at_bottom(&rendered),
        };

        debug!(
            batch = index,
            ?position,
            messages = rendered.messages.len(),
            resources = resources.len(),
            "loaded batch"
        );
        self.resident.insert(index, Batch { index, range, handle, resources });

        if self.resident.len() > self.config.max_batches {
            let victim = match position {
                LoadPosition::Prepend => self.resident.keys().rev().find(|&&k| k != index),
                LoadPosition::Append => self.resident.keys().find(|&&k| k != index),
            };
            if let Some(&victim) = victim {
                debug!(batch = victim, loaded = index, "evicting batch");
                self.unload_batch(victim);
            }
        }

        true
    }

    /// Remove batch `index` from the window and release its resources
    ///
    /// Returns false if the batch was not resident. Removing the topmost of several batches
    /// moves the scroll offset up by the removed height so the visible content stays put.
    pub fn unload_batch(&mut self, index: usize) -> bool {
        let Some(batch) = self.resident.remove(&index) else {
            return false;
        };
        let at_top = self.resident.keys().next().is_some_and(|&first| first > index);

        let before = self.view.scroll_metrics();
        self.release(batch);

        if at_top {
            let after = self.view.scroll_metrics();
            let removed = before.content_height.saturating_sub(after.content_height);
            self.view.set_scroll_offset(before.offset.saturating_sub(removed));
        }

        debug!(batch = index, resident = self.resident.len(), "unloaded batch");
        true
    }

    fn release(&mut self, batch: Batch<P::Handle>) {
        let Batch { handle, resources, .. } = batch;
        self.view.remove(handle);
        for resource in resources {
            self.media.release(resource);
        }
    }

    /// Load the neighbouring batch at whichever edge the reader is close to
    ///
    /// Both edges are checked in turn, re-reading the scroll metrics in between because the
    /// first load moves the offset. When the top load fills the window, the bottom edge is
    /// left alone: appending would evict the batch that was just prepended. Returns the
    /// number of batches loaded.
    pub fn check_and_maybe_load(&mut self) -> usize {
        let Some(&first) = self.resident.keys().next() else {
            return 0;
        };

        let mut loaded = 0;
        let metrics = self.view.scroll_metrics();
        let margin = self.config.trigger_distance(metrics.viewport_height);

        if (metrics.offset as f64) < margin
            && first > 0
            && self.load_batch(first - 1, LoadPosition::Prepend)
        {
            loaded += 1;
        }

        let metrics = self.view.scroll_metrics();
        let Some(&last) = self.resident.keys().next_back() else {
            return loaded;
        };
        let window_full = self.resident.len() >= self.config.max_batches;
        if !(loaded > 0 && window_full)
            && (metrics.remaining_below() as f64) < margin
            && last + 1 < self.batch_count()
            && self.load_batch(last + 1, LoadPosition::Append)
        {
            loaded += 1;
        }

        if loaded > 0 {
            debug!(
                loaded,
                offset = metrics.offset,
                content = metrics.content_height,
                "scroll check loaded batches"
            );
        }
        loaded
    }

    /// Unload every resident batch
    pub fn reset(&mut self) {
        let batches = std::mem::take(&mut self.resident);
        let count = batches.len();
        for batch in batches.into_values() {
            self.release(batch);
        }
        if count > 0 {
            debug!(unloaded = count, "reset transcript window");
        }
    }

    /// Re-window around batch `index`: the batch and its immediate neighbours
    ///
    /// Scrolls to the top of the target batch. Returns false if the batch does not exist.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.batch_count() {
            return false;
        }

        self.reset();
        self.load_batch(index, LoadPosition::Append);
        if let Some(previous) = index.checked_sub(1) {
            self.load_batch(previous, LoadPosition::Prepend);
        }
        self.load_batch(index + 1, LoadPosition::Append);

        if let Some(top) = self.resident.get(&index).and_then(|b| self.view.top_of(&b.handle)) {
            self.view.set_scroll_offset(top);
        }

        debug!(batch = index, resident = ?self.resident_indices(), "jumped to batch");
        true
    }

    pub fn batch_count(&self) -> usize {
        self.messages.len().div_ceil(self.config.batch_size)
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn batch_of(&self, message_index: usize) -> usize {
        message_index / self.config.batch_size
    }

    pub fn batch_range(&self, index: usize) -> Range<usize> {
        batch_range(index, self.config.batch_size, self.messages.len())
    }

    pub fn is_resident(&self, index: usize) -> bool {
        self.resident.contains_key(&index)
    }

    /// Resident batch indices in ascending order
    pub fn resident_indices(&self) -> Vec<usize> {
        self.resident.keys().copied().collect()
    }

    pub fn batch(&self, index: usize) -> Option<&Batch<P::Handle>> {
        self.resident.get(&index)
    }

    /// Resources currently held by resident batches
    pub fn live_resources(&self) -> usize {
        self.resident.values().map(Batch::resource_count).sum()
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        self.view.scroll_metrics()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn shared_messages(&self) -> Arc<[Message]> {
        Arc::clone(&self.messages)
    }

    pub fn archive(&self) -> &ArchiveIndex {
        &self.archive
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn view(&self) -> &P {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut P {
        &mut self.view
    }
}

impl<P: Presentation> Drop for WindowManager<P> {
    fn drop(&mut self) {
        self.reset();
    }
}
