use log::{error, info, warn};
use thiserror::Error;

use crate::models::{Todo, TodoFields, TodoId, TodoList};
use crate::storage::{KeyValueStore, StorageError};

/// Default storage slot holding the serialized collection
pub const DEFAULT_STORAGE_KEY: &str = "todos";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Failed to serialize todos: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// A state change requested by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { name: String, date: String },
    Delete { id: TodoId },
    SetChecked { id: TodoId, checked: bool },
    Edit { id: TodoId, fields: TodoFields },
}

impl TodoList {
    /// Apply an action and return the resulting snapshot
    pub fn apply(&self, action: Action) -> TodoList {
        match action {
            Action::Add { name, date } => self.add(&name, &date),
            Action::Delete { id } => self.delete(&id),
            Action::SetChecked { id, checked } => self.set_checked(&id, checked),
            Action::Edit { id, fields } => self.edit(&id, &fields),
        }
    }

    /// Append a new unchecked record. Empty name or date is ignored.
    pub fn add(&self, name: &str, date: &str) -> TodoList {
        if name.is_empty() || date.is_empty() {
            return self.clone();
        }
        self.iter()
            .cloned()
            .chain(std::iter::once(Todo::new(name.to_string(), date.to_string())))
            .collect()
    }

    pub fn delete(&self, id: &TodoId) -> TodoList {
        self.iter().filter(|todo| &todo.id != id).cloned().collect()
    }

    pub fn set_checked(&self, id: &TodoId, checked: bool) -> TodoList {
        self.iter()
            .map(|todo| {
                if &todo.id == id {
                    Todo { checked, ..todo.clone() }
                } else {
                    todo.clone()
                }
            })
            .collect()
    }

    /// Replace name, date and checked on the matching record.
    /// Empty name or date is ignored, same as `add`.
    pub fn edit(&self, id: &TodoId, fields: &TodoFields) -> TodoList {
        if !fields.is_complete() {
            return self.clone();
        }
        self.iter()
            .map(|todo| {
                if &todo.id == id {
                    Todo {
                        id: todo.id.clone(),
                        name: fields.name.clone(),
                        date: fields.date.clone(),
                        checked: fields.checked,
                    }
                } else {
                    todo.clone()
                }
            })
            .collect()
    }
}

/// The six sample records used on first run, each with a fresh id
pub fn default_todos() -> TodoList {
    [
        ("Buy groceries", "2024-09-03", true),
        ("Complete project report", "2024-09-04", false),
        ("Call the bank", "2024-09-05", false),
        ("Schedule doctor appointment", "2024-09-06", false),
        ("Read a book", "2024-09-07", false),
        ("Cook dinner", "2024-09-08", false),
    ]
    .into_iter()
    .map(|(name, date, checked)| Todo {
        id: TodoId::generate(),
        name: name.to_string(),
        date: date.to_string(),
        checked,
    })
    .collect()
}

pub fn serialize(todos: &TodoList) -> Result<String, serde_json::Error> {
    serde_json::to_string(todos)
}

pub fn deserialize(text: &str) -> Result<TodoList, serde_json::Error> {
    serde_json::from_str(text)
}

/// Load the collection from a storage slot, falling back to the defaults
/// when the slot is absent, unreadable or unparsable. Never fails.
pub fn initialize<S: KeyValueStore + ?Sized>(storage: &S, key: &str) -> TodoList {
    let stored = match storage.get_item(key) {
        Ok(stored) => stored,
        Err(e) => {
            warn!("event=todos_load module=store status=error key={} error={}", key, e);
            None
        }
    };

    match stored {
        Some(text) => match deserialize(&text) {
            Ok(todos) => {
                info!("event=todos_load module=store status=ok key={} count={}", key, todos.len());
                todos
            }
            Err(e) => {
                warn!(
                    "event=todos_load module=store status=parse_error key={} error={}; using defaults",
                    key, e
                );
                default_todos()
            }
        },
        None => {
            info!("event=todos_load module=store status=absent key={}; using defaults", key);
            default_todos()
        }
    }
}

/// Owns the current snapshot and the storage slot it is persisted to.
/// Every [`Action`] goes through [`TodoStore::dispatch`], and each changed
/// snapshot is written to the slot exactly once.
pub struct TodoStore<S> {
    storage: S,
    key: String,
    todos: TodoList,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Initialize from storage and write the initial snapshot back once.
    /// A failed initial write is logged; the store is usable regardless.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let todos = initialize(&storage, &key);
        let store = Self { storage, key, todos };
        if let Err(e) = store.persist() {
            error!("event=todos_save module=store status=error key={} error={}", store.key, e);
        }
        store
    }

    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Apply an action. Returns whether the snapshot changed.
    ///
    /// A changed snapshot replaces the current one before it is written, so a
    /// failed write leaves the in-memory state updated and reports the error.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, StoreError> {
        log::debug!("event=dispatch module=store action={:?}", action);
        let next = self.todos.apply(action);
        if next == self.todos {
            return Ok(false);
        }
        self.todos = next;
        self.persist().map_err(|e| {
            error!("event=todos_save module=store status=error key={} error={}", self.key, e);
            e
        })?;
        Ok(true)
    }

    /// Drop the stored slot and start over from the defaults
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)?;
        self.todos = default_todos();
        self.persist()?;
        info!("event=todos_reset module=store status=ok key={}", self.key);
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let text = serialize(&self.todos)?;
        self.storage.set_item(&self.key, &text)?;
        log::debug!("event=todos_save module=store status=ok key={} count={}", self.key, self.todos.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_have_six_unique_ids() {
        let todos = default_todos();
        assert_eq!(todos.len(), 6);
        let mut ids: Vec<_> = todos.iter().map(|t| t.id.clone()).collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), 6);
        assert!(todos.as_slice()[0].checked);
        assert!(todos.iter().skip(1).all(|t| !t.checked));
    }

    #[test]
    fn empty_array_is_not_replaced_by_defaults() {
        let storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "[]").unwrap();
        assert!(initialize(&storage, DEFAULT_STORAGE_KEY).is_empty());
    }

    #[test]
    fn edit_with_empty_name_is_ignored() {
        let todos = TodoList::new().add("Buy milk", "2024-01-01");
        let id = todos.as_slice()[0].id.clone();
        let fields = TodoFields {
            name: String::new(),
            date: "2024-01-02".to_string(),
            checked: true,
        };
        assert_eq!(todos.edit(&id, &fields), todos);
    }
}
