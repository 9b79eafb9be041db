use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState,
    StatefulWidget,
};
use ratatui::Frame;

use crate::models::{Todo, TodoList};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

/// Checkbox, name and the date pushed to the right edge of `width` columns.
/// Long names are truncated with "..." so the date always stays visible.
pub fn format_todo_line(todo: &Todo, width: usize) -> (String, String) {
    let checkbox = if todo.checked { "[x] " } else { "[ ] " };
    let date = format!(" {}", todo.date);
    let name_width = width
        .saturating_sub(checkbox.chars().count())
        .saturating_sub(date.chars().count());

    let name = if todo.name.chars().count() > name_width {
        let keep = name_width.saturating_sub(3);
        todo.name.chars().take(keep).collect::<String>() + "..."
    } else {
        todo.name.clone()
    };

    let padding = name_width.saturating_sub(name.chars().count());
    let left = format!("{}{}{}", checkbox, name, " ".repeat(padding));
    (left, date)
}

pub fn render_todo_list(f: &mut Frame, area: Rect, todos: &TodoList, list_state: &mut ListState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let checked_fg = parse_color(&active_theme.checked_fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    // Split off one column for the scrollbar
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = horizontal[0];
    let scrollbar_area = horizontal[1];

    // 2 for borders, 2 for the highlight symbol
    let max_width = list_area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if todos.is_empty() {
        let hint = format!(
            "Nothing to do. Press {} to add a todo.",
            crate::utils::format_key_binding_for_display(&config.key_bindings.new)
        );
        vec![ListItem::new(hint).style(Style::default().fg(checked_fg))]
    } else {
        todos
            .iter()
            .map(|todo| {
                let (left, date) = format_todo_line(todo, max_width);
                let name_style = if todo.checked {
                    Style::default().fg(checked_fg).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(fg_color)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(left, name_style),
                    Span::styled(date, Style::default().fg(checked_fg)),
                ]))
            })
            .collect()
    };

    let title = format!("TODO LIST ({} of {} left)", todos.remaining(), todos.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let total_items = todos.len();
    let visible_items = list_area.height.saturating_sub(2) as usize;

    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = selected_index.saturating_sub(visible_items.saturating_sub(1));

        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoId;

    fn todo(name: &str, checked: bool) -> Todo {
        Todo {
            id: TodoId::from("id"),
            name: name.to_string(),
            date: "2024-09-05".to_string(),
            checked,
        }
    }

    #[test]
    fn line_pads_name_and_keeps_date_right() {
        let (left, date) = format_todo_line(&todo("Call the bank", true), 30);
        assert!(left.starts_with("[x] Call the bank"));
        assert_eq!(date, " 2024-09-05");
        assert_eq!(left.chars().count() + date.chars().count(), 30);
    }

    #[test]
    fn long_name_is_truncated() {
        let (left, date) = format_todo_line(&todo("Schedule doctor appointment", false), 25);
        assert_eq!(left, "[ ] Schedul...");
        assert_eq!(left.chars().count() + date.chars().count(), 25);
    }
}
