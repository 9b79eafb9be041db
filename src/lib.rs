pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Todo, TodoFields, TodoId, TodoList};
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
pub use store::{Action, TodoStore};
pub use utils::Profile;
