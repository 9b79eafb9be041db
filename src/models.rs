use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a todo record.
///
/// Stored as plain text so collections written by other tools (or older
/// versions) with non-UUID ids still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub date: String, // ISO 8601: YYYY-MM-DD
    pub checked: bool,
}

impl Todo {
    /// New unchecked record with a fresh id
    pub fn new(name: String, date: String) -> Self {
        Self {
            id: TodoId::generate(),
            name,
            date,
            checked: false,
        }
    }

    pub fn fields(&self) -> TodoFields {
        TodoFields {
            name: self.name.clone(),
            date: self.date.clone(),
            checked: self.checked,
        }
    }
}

/// The replaceable part of a record, used when editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub name: String,
    pub date: String,
    pub checked: bool,
}

impl TodoFields {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.date.is_empty()
    }
}

/// Ordered collection of todo records. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList(Vec<Todo>);

impl TodoList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Todo] {
        &self.0
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.0.iter().find(|todo| &todo.id == id)
    }

    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.0.iter().position(|todo| &todo.id == id)
    }

    /// Number of records not yet checked off
    pub fn remaining(&self) -> usize {
        self.0.iter().filter(|todo| !todo.checked).count()
    }

    /// Find a record by 1-based display position, exact id, or unique id prefix
    pub fn resolve(&self, target: &str) -> Option<&Todo> {
        let target = target.trim();
        if target.is_empty() {
            return None;
        }

        if let Ok(position) = target.parse::<usize>() {
            if position >= 1 && position <= self.0.len() {
                return self.0.get(position - 1);
            }
        }

        if let Some(todo) = self.0.iter().find(|todo| todo.id.as_str() == target) {
            return Some(todo);
        }

        let mut matches = self.0.iter().filter(|todo| todo.id.as_str().starts_with(target));
        match (matches.next(), matches.next()) {
            (Some(todo), None) => Some(todo),
            _ => None,
        }
    }
}

impl From<Vec<Todo>> for TodoList {
    fn from(todos: Vec<Todo>) -> Self {
        Self(todos)
    }
}

impl FromIterator<Todo> for TodoList {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TodoList {
    type Item = Todo;
    type IntoIter = std::vec::IntoIter<Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
