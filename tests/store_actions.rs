//! Integration tests: todo store actions, persistence contract and fallbacks.

use std::cell::Cell;
use std::collections::HashSet;

use tdl::storage::StorageError;
use tdl::store::{default_todos, deserialize, initialize, serialize, StoreError};
use tdl::{Action, KeyValueStore, MemoryStorage, Todo, TodoFields, TodoId, TodoList, TodoStore};

/// Counts writes and can be told to fail them
#[derive(Default)]
struct CountingStorage {
    inner: MemoryStorage,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl KeyValueStore for CountingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::DirectoryError("disk full".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}

fn todo(id: &str, name: &str, date: &str, checked: bool) -> Todo {
    Todo {
        id: TodoId::from(id),
        name: name.to_string(),
        date: date.to_string(),
        checked,
    }
}

fn sample() -> TodoList {
    TodoList::from(vec![
        todo("1", "A", "2024-01-01", false),
        todo("2", "B", "2024-01-02", true),
    ])
}

fn ids(todos: &TodoList) -> Vec<String> {
    todos.iter().map(|t| t.id.to_string()).collect()
}

#[test]
fn add_appends_unchecked_record_with_fresh_id() {
    let before = sample();
    let after = before.apply(Action::Add {
        name: "C".to_string(),
        date: "2024-01-03".to_string(),
    });

    assert_eq!(after.len(), 3);
    assert_eq!(&after.as_slice()[..2], before.as_slice());
    let added = &after.as_slice()[2];
    assert_eq!(added.name, "C");
    assert_eq!(added.date, "2024-01-03");
    assert!(!added.checked);
    assert!(before.get(&added.id).is_none());
}

#[test]
fn add_with_empty_name_or_date_is_ignored() {
    let todos = sample();
    assert_eq!(todos.add("", "2024-01-03"), todos);
    assert_eq!(todos.add("C", ""), todos);
}

#[test]
fn delete_removes_only_the_matching_record() {
    let after = sample().apply(Action::Delete { id: TodoId::from("1") });
    assert_eq!(after, TodoList::from(vec![todo("2", "B", "2024-01-02", true)]));

    let unchanged = sample().apply(Action::Delete { id: TodoId::from("missing") });
    assert_eq!(unchanged, sample());
}

#[test]
fn set_checked_keeps_size_order_and_ids() {
    let after = sample().apply(Action::SetChecked {
        id: TodoId::from("1"),
        checked: true,
    });
    assert_eq!(ids(&after), vec!["1", "2"]);
    assert!(after.iter().all(|t| t.checked));
    assert_eq!(after.as_slice()[0].name, "A");
}

#[test]
fn edit_replaces_fields_but_never_the_id() {
    let fields = TodoFields {
        name: "A2".to_string(),
        date: "2024-02-01".to_string(),
        checked: true,
    };
    let after = sample().apply(Action::Edit {
        id: TodoId::from("1"),
        fields,
    });
    assert_eq!(ids(&after), vec!["1", "2"]);
    assert_eq!(after.as_slice()[0], todo("1", "A2", "2024-02-01", true));
    assert_eq!(after.as_slice()[1], sample().as_slice()[1]);
}

#[test]
fn edit_with_unknown_id_changes_nothing() {
    let fields = TodoFields {
        name: "X".to_string(),
        date: "2024-02-01".to_string(),
        checked: false,
    };
    let after = sample().apply(Action::Edit {
        id: TodoId::from("9"),
        fields,
    });
    assert_eq!(after, sample());
}

#[test]
fn serialized_form_uses_the_four_field_names() {
    let text = serialize(&TodoList::from(vec![todo("1", "A", "2024-01-01", false)])).unwrap();
    assert_eq!(
        text,
        r#"[{"id":"1","name":"A","date":"2024-01-01","checked":false}]"#
    );
    assert_eq!(deserialize(&text).unwrap().as_slice()[0].name, "A");
}

#[test]
fn initialize_reads_stored_collection() {
    let storage = MemoryStorage::new();
    storage
        .set_item("todos", r#"[{"id":"1","name":"A","date":"2024-01-01","checked":false}]"#)
        .unwrap();
    let todos = initialize(&storage, "todos");
    assert_eq!(todos, TodoList::from(vec![todo("1", "A", "2024-01-01", false)]));
}

#[test]
fn initialize_falls_back_to_defaults() {
    let empty = MemoryStorage::new();
    let todos = initialize(&empty, "todos");
    assert_eq!(todos.len(), 6);

    let malformed = MemoryStorage::new();
    malformed.set_item("todos", "not json").unwrap();
    let todos = initialize(&malformed, "todos");
    let names: Vec<&str> = todos.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Buy groceries",
            "Complete project report",
            "Call the bank",
            "Schedule doctor appointment",
            "Read a book",
            "Cook dinner",
        ]
    );
    let unique: HashSet<&str> = todos.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(unique.len(), 6);
    assert_eq!(todos.remaining(), 5);
}

#[test]
fn empty_stored_array_is_not_replaced_by_defaults() {
    let storage = MemoryStorage::new();
    storage.set_item("todos", "[]").unwrap();
    assert!(initialize(&storage, "todos").is_empty());
}

#[test]
fn defaults_get_fresh_ids_each_time() {
    let first: HashSet<String> = ids(&default_todos()).into_iter().collect();
    let second: HashSet<String> = ids(&default_todos()).into_iter().collect();
    assert!(first.is_disjoint(&second));
}

#[test]
fn open_writes_initial_snapshot_once() {
    let store = TodoStore::open(CountingStorage::default(), "todos");
    assert_eq!(store.storage().writes.get(), 1);
    let stored = store.storage().get_item("todos").unwrap().unwrap();
    assert_eq!(&deserialize(&stored).unwrap(), store.todos());
}

#[test]
fn each_changing_dispatch_writes_exactly_once() {
    let mut store = TodoStore::open(CountingStorage::default(), "todos");
    let first = store.todos().as_slice()[0].id.clone();

    assert!(store
        .dispatch(Action::Add {
            name: "Walk dog".to_string(),
            date: "2024-09-10".to_string(),
        })
        .unwrap());
    assert!(store.dispatch(Action::Delete { id: first }).unwrap());
    assert_eq!(store.storage().writes.get(), 3);

    let stored = store.storage().get_item("todos").unwrap().unwrap();
    assert_eq!(&deserialize(&stored).unwrap(), store.todos());
}

#[test]
fn unchanged_snapshot_is_not_written() {
    let mut store = TodoStore::open(CountingStorage::default(), "todos");
    let changed = store
        .dispatch(Action::Delete {
            id: TodoId::from("missing"),
        })
        .unwrap();
    assert!(!changed);
    assert_eq!(store.storage().writes.get(), 1);
}

#[test]
fn failed_write_keeps_new_state_and_reports() {
    let mut store = TodoStore::open(CountingStorage::default(), "todos");
    store.storage().fail_writes.set(true);

    let result = store.dispatch(Action::Add {
        name: "Walk dog".to_string(),
        date: "2024-09-10".to_string(),
    });
    assert!(matches!(result, Err(StoreError::StorageError(_))));
    assert_eq!(store.todos().len(), 7);
}

#[test]
fn reopening_keeps_ids_and_order() {
    let storage = MemoryStorage::new();
    let mut store = TodoStore::open(storage, "todos");
    let id = store.todos().as_slice()[2].id.clone();
    store
        .dispatch(Action::SetChecked {
            id: id.clone(),
            checked: true,
        })
        .unwrap();
    let before = store.todos().clone();

    // Hand the same backing storage to a second store
    let stored = store.storage().get_item("todos").unwrap().unwrap();
    let reopened_storage = MemoryStorage::new();
    reopened_storage.set_item("todos", &stored).unwrap();
    let reopened = TodoStore::open(reopened_storage, "todos");

    assert_eq!(reopened.todos(), &before);
    assert!(reopened.todos().get(&id).unwrap().checked);
}

#[test]
fn separate_keys_do_not_share_state() {
    let storage = MemoryStorage::new();
    storage.set_item("work", "[]").unwrap();
    let store = TodoStore::open(storage, "work");
    assert!(store.todos().is_empty());
    assert_eq!(store.key(), "work");
    assert!(store.storage().get_item("todos").unwrap().is_none());
}

#[test]
fn reset_restores_defaults() {
    let storage = MemoryStorage::new();
    storage.set_item("todos", "[]").unwrap();
    let mut store = TodoStore::open(storage, "todos");
    store.reset().unwrap();
    assert_eq!(store.todos().len(), 6);
    let stored = store.storage().get_item("todos").unwrap().unwrap();
    assert_eq!(deserialize(&stored).unwrap().len(), 6);
}

#[test]
fn walkthrough_add_check_edit_delete() {
    let storage = MemoryStorage::new();
    storage.set_item("todos", "[]").unwrap();
    let mut store = TodoStore::open(storage, "todos");

    store
        .dispatch(Action::Add {
            name: "Buy milk".to_string(),
            date: "2024-01-01".to_string(),
        })
        .unwrap();
    let id = store.todos().as_slice()[0].id.clone();

    store
        .dispatch(Action::SetChecked {
            id: id.clone(),
            checked: true,
        })
        .unwrap();
    store
        .dispatch(Action::Edit {
            id: id.clone(),
            fields: TodoFields {
                name: "Buy oat milk".to_string(),
                date: "2024-01-02".to_string(),
                checked: false,
            },
        })
        .unwrap();
    assert_eq!(
        store.todos().as_slice(),
        &[todo(id.as_str(), "Buy oat milk", "2024-01-02", false)]
    );

    store.dispatch(Action::Delete { id }).unwrap();
    assert!(store.todos().is_empty());
    assert_eq!(store.storage().get_item("todos").unwrap().as_deref(), Some("[]"));
}
