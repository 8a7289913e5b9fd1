use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Stacked chat layout
pub struct AppLayout {
    pub chat_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the chat layout:
    /// - Chat pane: everything left over (top)
    /// - Input box: 3 rows including its border
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Chat pane (at least 3 rows)
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Status bar (1 row)
            ])
            .split(area);

        Self { chat_area: chunks[0], input_area: chunks[1], status_area: chunks[2] }
    }
}
