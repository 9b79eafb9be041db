use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::storage::KeyValueStore;
use crate::tui::app::Mode;
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    form::render_todo_form,
    help::render_help,
    status_bar::render_status_bar,
    todo_list::render_todo_list,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as display;

pub fn render<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("TDL")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_todo_list(
        f,
        layout.list_area,
        app.store.todos(),
        &mut app.ui.list_state,
        &app.config,
    );

    if let Some(ref mut form) = app.form {
        render_todo_form(f, layout.form_area, form, &app.config);
    }

    // Overlays go after the normal content
    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if let Some(ref todo) = app.modals.delete_confirmation {
        render_confirm_delete(f, f.area(), todo, app.modals.delete_choice, &app.config);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_deref(),
        &key_hints,
        &app.config,
    );
}

pub fn get_key_hints<S: KeyValueStore>(app: &App<S>) -> Vec<String> {
    let keys = &app.config.key_bindings;

    if app.modals.delete_confirmation.is_some() {
        return vec![
            "↑/↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ];
    }

    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", display(&keys.help))],
        Mode::Form => vec![
            format!("{}/Enter: Next field", display(&keys.next_field)),
            "Shift+Tab: Previous field".to_string(),
            format!("{}: Save", display(&keys.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::View => vec![
            format!("{}: Quit", display(&keys.quit)),
            format!("{}: New", display(&keys.new)),
            format!("{}: Edit", display(&keys.edit)),
            format!("{}: Done", display(&keys.toggle_checked)),
            format!("{}: Delete", display(&keys.delete)),
            format!("{}: Help", display(&keys.help)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::TodoStore;
    use crate::Config;

    fn app() -> App<MemoryStorage> {
        App::new(Config::default(), TodoStore::open(MemoryStorage::new(), "todos"))
    }

    #[test]
    fn view_hints_follow_key_bindings() {
        let mut app = app();
        app.config.key_bindings.quit = "x".to_string();
        let hints = get_key_hints(&app);
        assert_eq!(hints[0], "x: Quit");
    }

    #[test]
    fn modal_hints_take_precedence() {
        let mut app = app();
        app.request_delete();
        assert_eq!(get_key_hints(&app).last().map(String::as_str), Some("Esc: Cancel"));
    }
}
