//! Taskbook: a local todo list.
//!
//! Users add, toggle, and delete short text tasks. The list survives
//! restarts through a best-effort JSON blob under one fixed key in the
//! data directory. Built on the Taskbook architecture:
//!
//! - Domain types and the pure reducer live here
//! - The store runtime (`taskbook-runtime`) owns state, publishes
//!   snapshots to the view, and executes persistence effects
//! - The storage boundary (`taskbook-storage`) is a key-value store of
//!   raw strings
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskbook::{
//!     MonotonicIdGenerator, TaskArchive, TodoAction, TodoEnvironment, TodoReducer, TodoState,
//!     TodoStore,
//! };
//! use taskbook_core::environment::SystemClock;
//! use taskbook_storage::FileStore;
//!
//! # async fn example() {
//! let archive = TaskArchive::new(Arc::new(FileStore::new(".taskbook")));
//! let tasks = archive.hydrate();
//!
//! let ids = Arc::new(MonotonicIdGenerator::new(Arc::new(SystemClock)));
//! let env = TodoEnvironment::new(ids, archive);
//! let store = TodoStore::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::Hydrated { tasks }).await;
//! store.send(TodoAction::Add { text: "Buy milk".to_string() }).await;
//!
//! let total = store.state(taskbook::TodoState::total_count).await;
//! # let _ = total;
//! # }
//! ```

pub mod config;
pub mod persistence;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use persistence::{TASKS_KEY, TaskArchive, TaskWrite};
pub use reducer::{IdGenerator, MonotonicIdGenerator, TodoAction, TodoEnvironment, TodoReducer};
pub use types::{Task, TaskId, TodoState};

/// The store type the application runs on
pub type TodoStore = taskbook_runtime::Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;
