use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub list_area: Rect,
    pub form_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Height: list needs borders + one row, the form needs borders + three fields, plus the status line
    pub const MIN_WIDTH: u16 = 36;
    pub const MIN_HEIGHT: u16 = 9;

    /// Form height: 2 borders + name, date and done rows
    pub const FORM_HEIGHT: u16 = 5;

    pub fn calculate(size: Rect, form_visible: bool) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let form_height = if form_visible { Self::FORM_HEIGHT } else { 0 };

        // List above, add/edit form below it (when open), status line at the bottom
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(form_height),
                Constraint::Length(1),
            ])
            .split(inner_area);

        Self {
            inner_area,
            list_area: vertical[0],
            form_area: vertical[1],
            status_area: vertical[2],
        }
    }
}
