//! Domain types for the todo list.
//!
//! A task is the unit of work the user tracks: an identifier, the entered
//! text, and a completion flag. The serialized form of a task is fixed:
//! `{"id": <number>, "text": <string>, "completed": <bool>}` and the
//! stored blob is a JSON array of those objects, so anything this
//! application wrote in the past hydrates cleanly.

use serde::{Deserialize, Serialize};

/// Unique identifier for a task
///
/// Numerically it is a millisecond timestamp shape: ids produced by the
/// generator start at the wall clock and strictly increase, so they stay
/// compatible with previously persisted lists while never colliding
/// within one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from a raw value
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the inner value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What the user typed, trimmed; immutable after creation
    pub text: String,
    /// Whether the task is done
    pub completed: bool,
}

impl Task {
    /// Creates a new, not-yet-completed task
    #[must_use]
    pub const fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// State of the todo list
///
/// The task sequence is the single source of truth; the persisted blob
/// is a derived serialization of it. Insertion order is preserved, with
/// the newest task at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All tasks, in insertion order
    pub tasks: Vec<Task>,
    /// The uncommitted input text; cleared after a successful add, never
    /// persisted
    pub draft: String,
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            draft: String::new(),
        }
    }

    /// Total number of tasks
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Returns a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Returns the id of the task at a zero-based list index
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.tasks.get(index).map(|t| t.id)
    }

    /// Returns the largest id currently in the list
    ///
    /// Used at startup to seed the id generator above everything that
    /// was hydrated.
    #[must_use]
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.iter().map(|t| t.id).max()
    }
}
