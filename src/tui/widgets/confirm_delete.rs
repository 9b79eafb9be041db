use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::Todo;
use crate::tui::app::DeleteChoice;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::Config;

pub fn confirm_message(todo: &Todo) -> String {
    format!("are you sure you want to delete task {}?", todo.name)
}

pub fn render_confirm_delete(f: &mut Frame, area: Rect, todo: &Todo, choice: DeleteChoice, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup_area = popup_area(area, 50, 35);

    // Keep the list from showing through
    f.render_widget(Clear, popup_area);

    let normal = Style::default().fg(fg_color).bg(bg_color);
    let mut lines = vec![
        Line::from(Span::styled(confirm_message(todo), normal)),
        Line::from(""),
    ];

    for option in [DeleteChoice::Delete, DeleteChoice::Cancel] {
        let label = match option {
            DeleteChoice::Delete => "Delete",
            DeleteChoice::Cancel => "Cancel",
        };
        let (text, style) = if option == choice {
            (format!("> {}", label), Style::default().fg(highlight_fg).bg(highlight_bg))
        } else {
            (format!("  {}", label), normal)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Use ↑↓ to choose, Enter to confirm, Esc to cancel",
        normal,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Delete Todo")
                .title_alignment(Alignment::Center)
                .style(normal),
        )
        .style(normal)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
