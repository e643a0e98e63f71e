use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas of the viewer
pub struct AppLayout {
    /// Transcript pane, including its border
    pub transcript_area: Rect,
    /// Bottom row: search prompt or status bar
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        Self { transcript_area: chunks[0], status_area: chunks[1] }
    }

    /// Inner size of the transcript pane once the border is drawn
    pub fn transcript_inner(&self) -> (u16, u16) {
        (
            self.transcript_area.width.saturating_sub(2),
            self.transcript_area.height.saturating_sub(2),
        )
    }
}
