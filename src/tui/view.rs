//! Terminal presentation of the transcript window.
//!
//! Each resident batch becomes a block of pre-measured rows. Heights are computed once per
//! batch (and again on resize) so the window manager always sees exact scroll metrics;
//! only the rows inside the viewport are turned into styled lines when drawing.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::MessageKind;
use crate::render::{MessageBody, RenderedBatch, RenderedMessage, SegmentStyle, segments};
use crate::search::TermMatcher;
use crate::utils::sanitize_for_terminal;
use crate::window::{Presentation, ScrollMetrics};

/// Columns reserved left of the message body for the hit marker
const GUTTER: usize = 2;
const TAB_WIDTH: usize = 4;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const SKY: Color = Color::Rgb(56, 189, 248);
const LINK: Color = Color::Rgb(96, 165, 250);
const MARK_BG: Color = Color::Rgb(250, 204, 21);
const MARK_FG: Color = Color::Rgb(24, 24, 27);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u64);

struct ViewBlock {
    id: BlockId,
    batch: RenderedBatch,
    heights: Vec<usize>,
}

impl ViewBlock {
    fn height(&self) -> usize {
        self.heights.iter().sum()
    }
}

/// Scrollable transcript pane backed by the window manager's batches
pub struct TranscriptView {
    width: usize,
    viewport_height: usize,
    blocks: Vec<ViewBlock>,
    offset: usize,
    next_id: u64,
    current_hit: Option<usize>,
    highlight: Option<TermMatcher>,
}

/// Text shown for a message body, safe to print
fn display_text(message: &RenderedMessage) -> String {
    let text = match &message.body {
        MessageBody::Text(text) => text.clone(),
        MessageBody::Attachment { kind, name, caption, .. } => match caption {
            Some(caption) => format!("[{}] {}\n{}", kind.label(), name, caption),
            None => format!("[{}] {}", kind.label(), name),
        },
    };
    sanitize_for_terminal(&text).replace('\t', &" ".repeat(TAB_WIDTH))
}

fn body_width(width: usize) -> usize {
    width.saturating_sub(GUTTER).max(1)
}

fn has_header(message: &RenderedMessage) -> bool {
    message.kind != MessageKind::System
}

/// Rows a message occupies: header, wrapped body, blank separator
fn message_height(message: &RenderedMessage, width: usize) -> usize {
    let body_width = body_width(width);
    let body: usize = display_text(message)
        .split('\n')
        .map(|line| line.chars().count().div_ceil(body_width).max(1))
        .sum();
    usize::from(has_header(message)) + body + 1
}

fn segment_style(style: SegmentStyle, base: Style) -> Style {
    match style {
        SegmentStyle::Plain => base,
        SegmentStyle::Link => base.fg(LINK).add_modifier(Modifier::UNDERLINED),
        SegmentStyle::Match => Style::default().fg(MARK_FG).bg(MARK_BG),
    }
}

fn header_line(message: &RenderedMessage) -> Line<'static> {
    let time = Span::styled(format!(" {}", message.time), Style::default().fg(MUTED));
    let who = match (&message.sender, message.kind) {
        (Some(sender), _) => Span::styled(
            sanitize_for_terminal(sender),
            Style::default().fg(SKY).add_modifier(Modifier::BOLD),
        ),
        (None, MessageKind::Outgoing) => {
            Span::styled("you", Style::default().fg(EMERALD).add_modifier(Modifier::BOLD))
        }
        (None, _) => Span::raw(""),
    };
    Line::from(vec![Span::raw(" ".repeat(GUTTER)), who, time])
}

/// Styled rows of one message; always exactly `message_height` rows
fn message_lines(
    message: &RenderedMessage,
    width: usize,
    matcher: Option<&TermMatcher>,
    is_hit: bool,
) -> Vec<Line<'static>> {
    let body_width = body_width(width);
    let base = match message.kind {
        MessageKind::System => Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        _ => Style::default().fg(BRIGHT),
    };
    let gutter = if is_hit {
        Span::styled("▌ ", Style::default().fg(MARK_BG))
    } else {
        Span::raw(" ".repeat(GUTTER))
    };

    let mut lines = Vec::new();
    if has_header(message) {
        lines.push(header_line(message));
    }

    // Styled characters, split into physical rows at newlines and at the body width
    let mut row: Vec<(char, SegmentStyle)> = Vec::new();
    let mut rows: Vec<Vec<(char, SegmentStyle)>> = Vec::new();
    for segment in segments(&display_text(message), matcher) {
        for c in segment.text.chars() {
            if c == '\n' {
                rows.push(std::mem::take(&mut row));
                continue;
            }
            if row.len() == body_width {
                rows.push(std::mem::take(&mut row));
            }
            row.push((c, segment.style));
        }
    }
    rows.push(row);

    for row in rows {
        let mut spans = vec![gutter.clone()];
        let mut run = String::new();
        let mut run_style = None;
        for (c, style) in row {
            if run_style.is_some_and(|s| s != style) {
                let s = run_style.unwrap_or(SegmentStyle::Plain);
                spans.push(Span::styled(std::mem::take(&mut run), segment_style(s, base)));
            }
            run_style = Some(style);
            run.push(c);
        }
        if let Some(style) = run_style {
            spans.push(Span::styled(run, segment_style(style, base)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines
}

impl TranscriptView {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: usize::from(width),
            viewport_height: usize::from(height),
            blocks: Vec::new(),
            offset: 0,
            next_id: 0,
            current_hit: None,
            highlight: None,
        }
    }

    /// Adapt to a new pane size, keeping the message at the top of the viewport in place
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = (usize::from(width), usize::from(height));
        if width == self.width && height == self.viewport_height {
            return;
        }

        let anchor = self.message_at_row(self.offset);
        self.width = width;
        self.viewport_height = height;
        for block in &mut self.blocks {
            block.heights = block.batch.messages.iter().map(|m| message_height(m, width)).collect();
        }

        match anchor.and_then(|(message, _)| self.message_top(message)) {
            Some(top) => self.set_scroll_offset(top),
            None => self.set_scroll_offset(self.offset),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn current_hit(&self) -> Option<usize> {
        self.current_hit
    }

    pub fn highlight_term(&self) -> Option<&str> {
        self.highlight.as_ref().map(TermMatcher::term)
    }

    /// Number of messages currently rendered
    pub fn rendered_count(&self) -> usize {
        self.blocks.iter().map(|b| b.batch.messages.len()).sum()
    }

    pub fn rendered_message(&self, message_index: usize) -> Option<&RenderedMessage> {
        self.blocks
            .iter()
            .flat_map(|b| b.batch.messages.iter())
            .find(|m| m.message_index == message_index)
    }

    fn make_block(&mut self, batch: &RenderedBatch) -> ViewBlock {
        self.next_id += 1;
        let heights = batch.messages.iter().map(|m| message_height(m, self.width)).collect();
        ViewBlock { id: BlockId(self.next_id), batch: batch.clone(), heights }
    }

    /// Message covering `row`, with the row of its top edge
    fn message_at_row(&self, row: usize) -> Option<(usize, usize)> {
        let mut top = 0;
        for block in &self.blocks {
            for (message, height) in block.batch.messages.iter().zip(&block.heights) {
                if row < top + height {
                    return Some((message.message_index, top));
                }
                top += height;
            }
        }
        None
    }

    fn message_top(&self, message_index: usize) -> Option<usize> {
        let mut top = 0;
        for block in &self.blocks {
            for (message, height) in block.batch.messages.iter().zip(&block.heights) {
                if message.message_index == message_index {
                    return Some(top);
                }
                top += height;
            }
        }
        None
    }

    /// Styled rows inside the viewport
    pub fn visible_lines(&self) -> Vec<Line<'static>> {
        let end = self.offset + self.viewport_height;
        let mut lines = Vec::with_capacity(self.viewport_height);
        let mut top = 0;

        for block in &self.blocks {
            if top + block.height() <= self.offset {
                top += block.height();
                continue;
            }
            for (message, &height) in block.batch.messages.iter().zip(&block.heights) {
                if top >= end {
                    return lines;
                }
                if top + height > self.offset {
                    let is_hit = self.current_hit == Some(message.message_index);
                    let rows = message_lines(message, self.width, self.highlight.as_ref(), is_hit);
                    let skip = self.offset.saturating_sub(top);
                    let take = end - top.max(self.offset);
                    lines.extend(rows.into_iter().skip(skip).take(take));
                }
                top += height;
            }
        }

        lines
    }
}

impl Presentation for TranscriptView {
    type Handle = BlockId;

    fn insert_at_top(&mut self, batch: &RenderedBatch) -> BlockId {
        let block = self.make_block(batch);
        let id = block.id;
        self.blocks.insert(0, block);
        id
    }

    fn insert_at_bottom(&mut self, batch: &RenderedBatch) -> BlockId {
        let block = self.make_block(batch);
        let id = block.id;
        self.blocks.push(block);
        id
    }

    fn remove(&mut self, handle: BlockId) {
        self.blocks.retain(|b| b.id != handle);
        self.offset = self.offset.min(self.scroll_metrics().max_offset());
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.offset,
            content_height: self.blocks.iter().map(ViewBlock::height).sum(),
            viewport_height: self.viewport_height,
        }
    }

    fn set_scroll_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.scroll_metrics().max_offset());
    }

    fn top_of(&self, handle: &BlockId) -> Option<usize> {
        let mut top = 0;
        for block in &self.blocks {
            if block.id == *handle {
                return Some(top);
            }
            top += block.height();
        }
        None
    }

    fn scroll_message_into_view(&mut self, message_index: usize) -> bool {
        let Some(top) = self.message_top(message_index) else {
            return false;
        };
        // a third of the way down, so older context stays visible above the hit
        self.set_scroll_offset(top.saturating_sub(self.viewport_height / 3));
        true
    }

    fn set_current_hit(&mut self, message_index: Option<usize>) {
        self.current_hit = message_index;
    }

    fn set_highlight(&mut self, term: Option<&str>) {
        self.highlight = term.and_then(TermMatcher::new);
    }
}
