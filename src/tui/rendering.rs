use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::app::{MessageType, StatusMessage};
use super::events::InputMode;
use super::layout::AppLayout;
use crate::utils::sanitize_for_terminal;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const RED: Color = Color::Rgb(239, 68, 68);
const STATUS_BG: Color = Color::Rgb(24, 24, 27);

/// Everything the viewer screen shows, gathered by the app before drawing
pub struct RenderState<'a> {
    pub title: &'a str,
    pub lines: Vec<Line<'static>>,
    pub mode: InputMode,
    pub search_input: &'a str,
    /// Active term with its position, e.g. (`"hello"`, `"3/7"`)
    pub search: Option<(&'a str, String)>,
    pub message_count: usize,
    /// Lowest and highest resident batch, and the batch count
    pub window: Option<(usize, usize, usize)>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the viewer screen
pub fn render_ui(frame: &mut Frame, state: RenderState) {
    let layout = AppLayout::new(frame.area());
    let title = format!(" {} ", sanitize_for_terminal(state.title));

    let transcript = Paragraph::new(state.lines.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(title),
    );
    frame.render_widget(transcript, layout.transcript_area);

    render_status_bar(frame, layout.status_area, &state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let base = Style::default().fg(BRIGHT).bg(STATUS_BG);

    if state.mode == InputMode::Search {
        let line = Line::from(vec![
            Span::styled(" /", Style::default().fg(EMERALD).bg(STATUS_BG)),
            Span::styled(format!("{}█", state.search_input), base),
            Span::styled(
                "  Enter: search | Esc: cancel ",
                Style::default().fg(MUTED).bg(STATUS_BG),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).style(base), area);
        return;
    }

    if let Some(message) = state.status_message {
        let style = match message.message_type {
            MessageType::Success => Style::default().fg(EMERALD).bg(STATUS_BG),
            MessageType::Error => Style::default().fg(RED).bg(STATUS_BG),
        };
        frame.render_widget(Paragraph::new(format!(" {} ", message.text)).style(style), area);
        return;
    }

    let mut parts = vec![format!("{} messages", state.message_count)];
    if let Some((first, last, total)) = state.window {
        parts.push(format!("batches {}-{} of {}", first + 1, last + 1, total));
    }
    match &state.search {
        Some((term, position)) => {
            parts.push(format!("\"{}\" {}", sanitize_for_terminal(term), position));
            parts.push("n/N: next/prev | Ctrl+Y: copy | Esc: clear".to_string());
        }
        None => parts.push("/: search | Esc: quit".to_string()),
    }

    frame.render_widget(Paragraph::new(format!(" {} ", parts.join(" | "))).style(base), area);
}

/// Render a list prompt (transcript or principal choice)
pub fn render_prompt(frame: &mut Frame, title: &str, options: &[String], selected: usize) {
    let layout = AppLayout::new(frame.area());

    let items: Vec<ListItem> = options
        .iter()
        .map(|option| ListItem::new(format!("  {}", sanitize_for_terminal(option))))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(format!(" {} ", title)),
        )
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, layout.transcript_area, &mut list_state);

    let hint = Paragraph::new(" Up/Down: move | Enter: choose | Esc: cancel ")
        .style(Style::default().fg(BRIGHT).bg(STATUS_BG));
    frame.render_widget(hint, layout.status_area);
}
