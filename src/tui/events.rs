use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;

use crate::storage::KeyValueStore;
use crate::store::StoreError;
use crate::tui::app::{FormField, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{parse_key_binding, ParsedKeyBinding};

/// Restores the terminal when dropped, including on panic.
/// A terminal left in raw mode or the alternate screen is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the drop afterwards does nothing
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop<S: KeyValueStore>(mut app: App<S>) -> Result<(), TuiError> {
    // Checked before the alternate screen so the message lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::TooSmall {
            width,
            height,
            min_width: min_width_with_border,
            min_height: min_height_with_border,
        });
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    log::info!("event=tui_start module=tui todos={}", app.store.todos().len());

    loop {
        app.check_status_message_timeout();

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, app.ui.mode == Mode::Form);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            // Only Press events; Windows also reports releases
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    log::info!("event=tui_stop module=tui");

    Ok(())
}

/// Returns `Ok(true)` when the user asked to quit
pub fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.modals.delete_confirmation.is_some() {
        return handle_delete_confirmation_modal(app, key_event);
    }

    match app.ui.mode {
        Mode::Form => handle_form_mode(app, key_event),
        Mode::Help => handle_help_mode(app, key_event),
        Mode::View => handle_view_mode(app, key_event),
    }
}

/// Store failures keep the in-memory list; the user sees them in the status bar
fn report<S: KeyValueStore>(app: &mut App<S>, result: Result<(), StoreError>) {
    if let Err(e) = result {
        log::error!("event=save_failed module=tui error={}", e);
        app.set_status_message(format!("Failed to save todos: {}", e));
    }
}

fn handle_delete_confirmation_modal<S: KeyValueStore>(
    app: &mut App<S>,
    key_event: KeyEvent,
) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.toggle_delete_choice();
        }
        KeyCode::Enter => {
            let result = app.confirm_delete();
            report(app, result);
        }
        KeyCode::Esc => app.cancel_delete(),
        KeyCode::Char('y') => {
            app.modals.delete_choice = crate::tui::app::DeleteChoice::Delete;
            let result = app.confirm_delete();
            report(app, result);
        }
        KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_help_mode<S: KeyValueStore>(app: &mut App<S>, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || matches_key_event(key_event, &binding(&app.config.key_bindings.help)?) {
        app.exit_help_mode();
    }
    // Everything else is ignored while help is open
    Ok(false)
}

fn handle_form_mode<S: KeyValueStore>(app: &mut App<S>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let keys = &app.config.key_bindings;
    let save_binding = binding(&keys.save)?;
    let next_field_binding = binding(&keys.next_field)?;

    if matches_key_event(key_event, &save_binding) {
        let result = app.save_form();
        report(app, result);
        return Ok(false);
    }

    if matches_key_event(key_event, &next_field_binding) {
        app.navigate_form_field(true);
        return Ok(false);
    }

    let Some(current_field) = app.form.as_ref().map(|form| form.current_field) else {
        app.exit_form_mode();
        return Ok(false);
    };

    match key_event.code {
        KeyCode::Esc => app.exit_form_mode(),
        KeyCode::BackTab => app.navigate_form_field(false),
        KeyCode::Tab => app.navigate_form_field(true),
        KeyCode::Enter => {
            let is_last = app
                .form
                .as_ref()
                .and_then(|form| form.fields().last().copied())
                .is_some_and(|last| last == current_field);
            if is_last {
                let result = app.save_form();
                report(app, result);
            } else {
                app.navigate_form_field(true);
            }
        }
        KeyCode::Up => app.navigate_form_field(false),
        KeyCode::Down => app.navigate_form_field(true),
        KeyCode::Char(' ') if current_field == FormField::Checked => app.toggle_form_checked(),
        _ => {
            if let Some(editor) = app.form.as_mut().and_then(|form| form.current_editor()) {
                let word = crate::utils::has_primary_modifier(key_event.modifiers);
                match key_event.code {
                    KeyCode::Char(c)
                        if !key_event.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        editor.insert_char(c);
                    }
                    KeyCode::Backspace => editor.delete_char(),
                    KeyCode::Delete => editor.delete_char_forward(),
                    KeyCode::Left if word => editor.move_cursor_word_left(),
                    KeyCode::Right if word => editor.move_cursor_word_right(),
                    KeyCode::Left => editor.move_cursor_left(),
                    KeyCode::Right => editor.move_cursor_right(),
                    KeyCode::Home => editor.move_cursor_home(),
                    KeyCode::End => editor.move_cursor_end(),
                    _ => {}
                }
            }
        }
    }

    Ok(false)
}

fn handle_view_mode<S: KeyValueStore>(app: &mut App<S>, key_event: KeyEvent) -> Result<bool, TuiError> {
    let keys = &app.config.key_bindings;
    let quit = binding(&keys.quit)?;
    let help = binding(&keys.help)?;
    let new = binding(&keys.new)?;
    let edit = binding(&keys.edit)?;
    let delete = binding(&keys.delete)?;
    let toggle_checked = binding(&keys.toggle_checked)?;
    let list_up = binding(&keys.list_up)?;
    let list_down = binding(&keys.list_down)?;

    if matches_key_event(key_event, &quit) {
        return Ok(true);
    }

    if matches_key_event(key_event, &help) {
        app.enter_help_mode();
    } else if matches_key_event(key_event, &new) {
        app.enter_create_mode();
    } else if matches_key_event(key_event, &edit) || key_event.code == KeyCode::Enter {
        app.enter_edit_mode();
    } else if matches_key_event(key_event, &delete) || key_event.code == KeyCode::Delete {
        app.request_delete();
    } else if matches_key_event(key_event, &toggle_checked) {
        let result = app.toggle_selected();
        report(app, result);
    } else if matches_key_event(key_event, &list_up) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if matches_key_event(key_event, &list_down) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if key_event.code == KeyCode::Home {
        app.move_selection_to(0);
    } else if key_event.code == KeyCode::End {
        app.move_selection_to(usize::MAX);
    } else if key_event.code == KeyCode::Esc {
        app.clear_status_message();
    }

    Ok(false)
}

fn binding(key: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key).map_err(TuiError::KeyBinding)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Ctrl on Windows/Linux, Option/Alt on macOS
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }
    binding.key_code == key_event.code
}
