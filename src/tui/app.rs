use crate::models::{Todo, TodoFields, TodoId};
use crate::storage::KeyValueStore;
use crate::store::{Action, StoreError, TodoStore};
use crate::tui::widgets::editor::Editor;
use crate::utils::{get_current_date_string, validate_todo_input};
use crate::Config;
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Form,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Date,
    Checked,
}

#[derive(Debug, Clone)]
pub struct TodoForm {
    pub current_field: FormField,
    pub name: Editor,
    pub date: Editor,
    pub checked: bool,
    pub editing_item_id: Option<TodoId>, // None for new items, Some(id) for editing
}

impl TodoForm {
    /// Fields the user can move between; `checked` only exists when editing
    pub fn fields(&self) -> &'static [FormField] {
        if self.editing_item_id.is_some() {
            &[FormField::Name, FormField::Date, FormField::Checked]
        } else {
            &[FormField::Name, FormField::Date]
        }
    }

    pub fn current_editor(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            FormField::Name => Some(&mut self.name),
            FormField::Date => Some(&mut self.date),
            FormField::Checked => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Delete,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct ModalState {
    pub delete_confirmation: Option<Todo>,
    pub delete_choice: DeleteChoice,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            delete_confirmation: None,
            delete_choice: DeleteChoice::Delete,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App<S: KeyValueStore> {
    pub config: Config,
    pub store: TodoStore<S>,

    pub ui: UiState,
    pub form: Option<TodoForm>,
    pub modals: ModalState,
    pub status: StatusState,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(config: Config, store: TodoStore<S>) -> Self {
        let mut app = Self {
            config,
            store,
            ui: UiState::default(),
            form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
        };
        app.adjust_selected_index();
        app
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.store.todos().as_slice().get(self.ui.selected_index)
    }

    /// Keep the selection inside the list after it shrinks or grows
    pub fn adjust_selected_index(&mut self) {
        let len = self.store.todos().len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            if self.ui.selected_index >= len {
                self.ui.selected_index = len - 1;
            }
            self.sync_list_state();
        }
    }

    pub fn sync_list_state(&mut self) {
        self.ui.list_state.select(Some(self.ui.selected_index));
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.store.todos().len() {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_to(&mut self, index: usize) {
        self.ui.selected_index = index;
        self.adjust_selected_index();
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn enter_create_mode(&mut self) {
        self.form = Some(TodoForm {
            current_field: FormField::Name,
            name: Editor::new(),
            date: Editor::from_string(get_current_date_string()),
            checked: false,
            editing_item_id: None,
        });
        self.ui.mode = Mode::Form;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(todo) = self.selected_todo().cloned() else {
            self.set_status_message("No todo selected".to_string());
            return;
        };
        self.form = Some(TodoForm {
            current_field: FormField::Name,
            name: Editor::from_string(todo.name),
            date: Editor::from_string(todo.date),
            checked: todo.checked,
            editing_item_id: Some(todo.id),
        });
        self.ui.mode = Mode::Form;
    }

    pub fn exit_form_mode(&mut self) {
        self.form = None;
        self.ui.mode = Mode::View;
    }

    pub fn navigate_form_field(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form {
            let fields = form.fields();
            let current = fields
                .iter()
                .position(|field| *field == form.current_field)
                .unwrap_or(0);
            let next = if forward {
                (current + 1) % fields.len()
            } else {
                (current + fields.len() - 1) % fields.len()
            };
            form.current_field = fields[next];
        }
    }

    pub fn toggle_form_checked(&mut self) {
        if let Some(ref mut form) = self.form {
            if form.current_field == FormField::Checked {
                form.checked = !form.checked;
            }
        }
    }

    /// Validate the open form and dispatch it as an add or an edit.
    /// Validation problems are shown in the status bar and keep the form open.
    pub fn save_form(&mut self) -> Result<(), StoreError> {
        let Some(form) = self.form.clone() else {
            return Ok(());
        };

        let (name, date) = match validate_todo_input(&form.name.value(), &form.date.value()) {
            Ok(values) => values,
            Err(err) => {
                self.set_status_message(format!("Validation error: {}", err));
                return Ok(());
            }
        };

        self.exit_form_mode();

        match form.editing_item_id {
            Some(id) => {
                let fields = TodoFields {
                    name,
                    date,
                    checked: form.checked,
                };
                let changed = self.store.dispatch(Action::Edit { id: id.clone(), fields })?;
                if let Some(index) = self.store.todos().position(&id) {
                    self.move_selection_to(index);
                }
                let message = if changed { "Todo updated" } else { "Nothing to change" };
                self.set_status_message(message.to_string());
            }
            None => {
                self.store.dispatch(Action::Add { name, date })?;
                let last = self.store.todos().len().saturating_sub(1);
                self.move_selection_to(last);
                self.set_status_message("Todo created".to_string());
            }
        }
        Ok(())
    }

    /// Flip the checkbox of the selected todo
    pub fn toggle_selected(&mut self) -> Result<(), StoreError> {
        let Some(todo) = self.selected_todo().cloned() else {
            return Ok(());
        };
        self.store.dispatch(Action::SetChecked {
            id: todo.id,
            checked: !todo.checked,
        })?;
        let message = if todo.checked {
            "Todo marked as not done"
        } else {
            "Todo marked as done"
        };
        self.set_status_message(message.to_string());
        Ok(())
    }

    /// Open the confirmation modal for the selected todo
    pub fn request_delete(&mut self) {
        match self.selected_todo().cloned() {
            Some(todo) => {
                self.modals.delete_confirmation = Some(todo);
                self.modals.delete_choice = DeleteChoice::Delete;
            }
            None => self.set_status_message("No todo selected".to_string()),
        }
    }

    pub fn toggle_delete_choice(&mut self) {
        self.modals.delete_choice = match self.modals.delete_choice {
            DeleteChoice::Delete => DeleteChoice::Cancel,
            DeleteChoice::Cancel => DeleteChoice::Delete,
        };
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
    }

    /// Run the choice made in the confirmation modal
    pub fn confirm_delete(&mut self) -> Result<(), StoreError> {
        let Some(todo) = self.modals.delete_confirmation.take() else {
            return Ok(());
        };
        if self.modals.delete_choice == DeleteChoice::Cancel {
            return Ok(());
        }
        self.store.dispatch(Action::Delete { id: todo.id })?;
        self.adjust_selected_index();
        self.set_status_message(format!("Deleted '{}'", todo.name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn app() -> App<MemoryStorage> {
        let storage = MemoryStorage::new();
        storage.set_item("todos", "[]").unwrap();
        App::new(Config::default(), TodoStore::open(storage, "todos"))
    }

    fn type_text(editor: &mut Editor, text: &str) {
        editor.clear();
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    fn add(app: &mut App<MemoryStorage>, name: &str, date: &str) {
        app.enter_create_mode();
        let form = app.form.as_mut().unwrap();
        type_text(&mut form.name, name);
        type_text(&mut form.date, date);
        app.save_form().unwrap();
    }

    #[test]
    fn create_form_adds_and_selects_new_todo() {
        let mut app = app();
        add(&mut app, "Buy milk", "2024-01-01");
        add(&mut app, "Walk dog", "2024-01-02");

        assert_eq!(app.store.todos().len(), 2);
        assert_eq!(app.ui.selected_index, 1);
        assert_eq!(app.selected_todo().unwrap().name, "Walk dog");
        assert_eq!(app.ui.mode, Mode::View);
        assert!(app.form.is_none());
    }

    #[test]
    fn create_form_prefills_today() {
        let mut app = app();
        app.enter_create_mode();
        assert_eq!(app.form.as_ref().unwrap().date.value(), get_current_date_string());
    }

    #[test]
    fn invalid_form_stays_open_with_message() {
        let mut app = app();
        add(&mut app, "   ", "2024-01-01");
        assert!(app.store.todos().is_empty());
        assert_eq!(app.ui.mode, Mode::Form);
        assert_eq!(app.status.message.as_deref(), Some("Validation error: Name is required"));

        let form = app.form.as_mut().unwrap();
        type_text(&mut form.name, "Buy milk");
        type_text(&mut form.date, "tomorrow");
        app.save_form().unwrap();
        assert!(app.store.todos().is_empty());
        assert_eq!(
            app.status.message.as_deref(),
            Some("Validation error: Date must be in YYYY-MM-DD format")
        );
    }

    #[test]
    fn edit_form_replaces_fields_and_keeps_id() {
        let mut app = app();
        add(&mut app, "Buy milk", "2024-01-01");
        let id = app.selected_todo().unwrap().id.clone();

        app.enter_edit_mode();
        app.navigate_form_field(true);
        app.navigate_form_field(true);
        assert_eq!(app.form.as_ref().unwrap().current_field, FormField::Checked);
        app.toggle_form_checked();
        type_text(&mut app.form.as_mut().unwrap().name, "Buy oat milk");
        app.save_form().unwrap();

        let todo = app.selected_todo().unwrap();
        assert_eq!(todo.id, id);
        assert_eq!(todo.name, "Buy oat milk");
        assert!(todo.checked);
    }

    #[test]
    fn create_form_has_no_checked_field() {
        let mut app = app();
        app.enter_create_mode();
        app.navigate_form_field(true);
        app.navigate_form_field(true);
        assert_eq!(app.form.as_ref().unwrap().current_field, FormField::Name);
        app.navigate_form_field(false);
        assert_eq!(app.form.as_ref().unwrap().current_field, FormField::Date);
    }

    #[test]
    fn toggle_selected_flips_checkbox() {
        let mut app = app();
        add(&mut app, "Buy milk", "2024-01-01");
        app.toggle_selected().unwrap();
        assert!(app.selected_todo().unwrap().checked);
        app.toggle_selected().unwrap();
        assert!(!app.selected_todo().unwrap().checked);
    }

    #[test]
    fn delete_needs_confirmation_and_cancel_keeps_todo() {
        let mut app = app();
        add(&mut app, "Buy milk", "2024-01-01");

        app.request_delete();
        assert!(app.modals.delete_confirmation.is_some());
        app.toggle_delete_choice();
        app.confirm_delete().unwrap();
        assert_eq!(app.store.todos().len(), 1);
        assert!(app.modals.delete_confirmation.is_none());

        app.request_delete();
        app.cancel_delete();
        assert_eq!(app.store.todos().len(), 1);

        app.request_delete();
        app.confirm_delete().unwrap();
        assert!(app.store.todos().is_empty());
        assert_eq!(app.ui.list_state.selected(), None);
    }

    #[test]
    fn selection_stays_in_bounds_after_deleting_last() {
        let mut app = app();
        add(&mut app, "one", "2024-01-01");
        add(&mut app, "two", "2024-01-02");
        assert_eq!(app.ui.selected_index, 1);

        app.request_delete();
        app.confirm_delete().unwrap();
        assert_eq!(app.ui.selected_index, 0);
        assert_eq!(app.selected_todo().unwrap().name, "one");
    }

    #[test]
    fn request_delete_without_selection_sets_message() {
        let mut app = app();
        app.request_delete();
        assert!(app.modals.delete_confirmation.is_none());
        assert_eq!(app.status.message.as_deref(), Some("No todo selected"));
    }
}
