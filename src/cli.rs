use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use thiserror::Error;

use crate::models::{Todo, TodoFields};
use crate::storage::KeyValueStore;
use crate::store::{Action, StoreError, TodoStore};
use crate::utils::{get_current_date_string, validate_date, validate_name, validate_todo_input};

#[derive(Parser)]
#[command(name = "tdl")]
#[command(about = "A small to-do list for the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/storage)
    #[arg(long)]
    pub dev: bool,

    /// Keep todos in memory only; nothing is read from or written to disk
    #[arg(long)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Add a new todo
    Add {
        /// Todo name
        name: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List todos
    List {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check off a todo (by position, id, or id prefix)
    Check { target: String },
    /// Uncheck a todo (by position, id, or id prefix)
    Uncheck { target: String },
    /// Edit a todo's fields
    Edit {
        target: String,
        #[arg(long)]
        name: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        checked: Option<bool>,
    },
    /// Delete a todo
    Delete {
        target: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Replace all todos with the sample list
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("No todo matches '{0}'")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
}

fn resolve<S: KeyValueStore>(store: &TodoStore<S>, target: &str) -> Result<Todo, CliError> {
    store
        .todos()
        .resolve(target)
        .cloned()
        .ok_or_else(|| CliError::NotFound(target.to_string()))
}

/// Ask a yes/no question; anything but "y"/"yes" is a no
fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool, CliError> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Handle the add command
pub fn handle_add<S: KeyValueStore>(
    name: String,
    date: Option<String>,
    store: &mut TodoStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let date = date.unwrap_or_else(get_current_date_string);
    let (name, date) = validate_todo_input(&name, &date).map_err(CliError::Validation)?;

    store.dispatch(Action::Add { name, date })?;
    if let Some(todo) = store.todos().iter().last() {
        writeln!(out, "Todo created successfully (ID: {})", todo.id)?;
    }
    Ok(())
}

/// Handle the list command
pub fn handle_list<S: KeyValueStore>(json: bool, store: &TodoStore<S>, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        let text = serde_json::to_string_pretty(store.todos()).map_err(StoreError::from)?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    if store.todos().is_empty() {
        writeln!(out, "Nothing to do.")?;
        return Ok(());
    }

    for (index, todo) in store.todos().iter().enumerate() {
        let checkbox = if todo.checked { "[x]" } else { "[ ]" };
        let short_id: String = todo.id.as_str().chars().take(8).collect();
        writeln!(out, "{:>3}. {} {}  {}  ({})", index + 1, checkbox, todo.name, todo.date, short_id)?;
    }
    writeln!(out, "{} of {} remaining", store.todos().remaining(), store.todos().len())?;
    Ok(())
}

/// Handle the check and uncheck commands
pub fn handle_set_checked<S: KeyValueStore>(
    target: &str,
    checked: bool,
    store: &mut TodoStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let todo = resolve(store, target)?;
    store.dispatch(Action::SetChecked { id: todo.id.clone(), checked })?;
    let state = if checked { "done" } else { "not done" };
    writeln!(out, "Marked '{}' as {}", todo.name, state)?;
    Ok(())
}

/// Handle the edit command. Fields not given keep their current value
/// and are not re-validated.
pub fn handle_edit<S: KeyValueStore>(
    target: &str,
    name: Option<String>,
    date: Option<String>,
    checked: Option<bool>,
    store: &mut TodoStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let todo = resolve(store, target)?;
    let current = todo.fields();
    let name = match name {
        Some(name) => validate_name(&name).map_err(CliError::Validation)?,
        None => current.name,
    };
    let date = match date {
        Some(date) => validate_date(&date).map_err(CliError::Validation)?,
        None => current.date,
    };

    let fields = TodoFields {
        name,
        date,
        checked: checked.unwrap_or(current.checked),
    };
    if store.dispatch(Action::Edit { id: todo.id.clone(), fields })? {
        writeln!(out, "Todo updated")?;
    } else {
        writeln!(out, "Nothing to change")?;
    }
    Ok(())
}

/// Handle the delete command, asking for confirmation unless `yes` is set
pub fn handle_delete<S: KeyValueStore>(
    target: &str,
    yes: bool,
    store: &mut TodoStore<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let todo = resolve(store, target)?;
    let question = format!("are you sure you want to delete task {}?", todo.name);
    if !yes && !confirm(&question, input, out)? {
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    store.dispatch(Action::Delete { id: todo.id.clone() })?;
    writeln!(out, "Todo deleted")?;
    Ok(())
}

/// Handle the reset command, asking for confirmation unless `yes` is set
pub fn handle_reset<S: KeyValueStore>(
    yes: bool,
    store: &mut TodoStore<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !yes && !confirm("replace all todos with the sample list?", input, out)? {
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    store.reset()?;
    writeln!(out, "Todos reset ({} items)", store.todos().len())?;
    Ok(())
}
