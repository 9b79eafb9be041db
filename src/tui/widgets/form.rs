use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::{FormField, TodoForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;
use crate::Config;

/// Labels share one width so the inputs line up
const LABEL_WIDTH: u16 = 6;

fn label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Name: ",
        FormField::Date => "Date: ",
        FormField::Checked => "Done: ",
    }
}

pub fn form_title(form: &TodoForm) -> &'static str {
    if form.editing_item_id.is_some() {
        "Edit Todo"
    } else {
        "New Todo"
    }
}

fn editor_line(editor: &Editor, width: usize, style: Style) -> Line<'static> {
    let mut text = editor.visible_text(width);
    // Pad so the highlight covers the whole input
    let padding = width.saturating_sub(text.chars().count());
    text.push_str(&" ".repeat(padding));
    Line::from(Span::styled(text, style))
}

pub fn render_todo_form(f: &mut Frame, area: Rect, form: &mut TodoForm, config: &Config) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    let highlight_style = Style::default().bg(highlight_bg).fg(highlight_fg);
    let inactive_field_style = Style::default().fg(fg_color).add_modifier(Modifier::DIM);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(form_title(form))
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let fields = form.fields();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(1)))
        .split(inner);

    let input_width = inner.width.saturating_sub(LABEL_WIDTH) as usize;
    let mut cursor = None;

    for (row, field) in rows.iter().zip(fields.iter().copied()) {
        let is_active = form.current_field == field;
        let style = if is_active { highlight_style } else { inactive_field_style };

        let input = match field {
            FormField::Name | FormField::Date => {
                let editor = if field == FormField::Name {
                    &mut form.name
                } else {
                    &mut form.date
                };
                editor.update_horizontal_scroll(input_width);
                if is_active {
                    let x = row.x + LABEL_WIDTH + editor.cursor_offset() as u16;
                    cursor = Some((x.min(row.x + row.width.saturating_sub(1)), row.y));
                }
                editor_line(editor, input_width, style)
            }
            FormField::Checked => {
                let checkbox = if form.checked { "[x]" } else { "[ ]" };
                Line::from(Span::styled(checkbox, style))
            }
        };

        let mut spans = vec![Span::styled(label(field), Style::default().fg(fg_color))];
        spans.extend(input.spans);
        f.render_widget(Paragraph::new(Line::from(spans)), *row);
    }

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}
