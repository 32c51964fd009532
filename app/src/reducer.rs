//! Reducer logic for the todo list.
//!
//! Commands are validated against the current state and applied in
//! place; every mutation returns a persistence effect that rewrites the
//! stored blob from the post-mutation task list. Invalid input and
//! operations on missing ids are silent no-ops, not errors.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use taskbook_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use taskbook_macros::Action;

use crate::persistence::TaskArchive;
use crate::types::{Task, TaskId, TodoState};

/// Source of fresh task ids
///
/// Implementations must produce ids that never collide with any id
/// already in the list, including ids hydrated from storage.
pub trait IdGenerator: Send + Sync {
    /// Returns the next fresh id
    fn next_id(&self) -> TaskId;
}

/// Clock-seeded, strictly increasing id generator
///
/// Each id is `max(previous + 1, now_millis)`: ids keep the shape of
/// millisecond timestamps (and so stay compatible with previously
/// persisted lists) but two tasks created within the same millisecond
/// still get distinct ids.
pub struct MonotonicIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl MonotonicIdGenerator {
    /// Creates a generator over the given clock
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(0),
        }
    }

    /// Raises the floor so future ids land above `id`
    ///
    /// Called for every hydrated task at startup, which keeps ids unique
    /// even if the persisted list was written by a machine whose clock
    /// ran ahead of ours.
    pub fn observe(&self, id: TaskId) {
        self.last.fetch_max(id.get(), Ordering::Relaxed);
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> TaskId {
        let now = self.clock.now().timestamp_millis();
        loop {
            let prev = self.last.load(Ordering::Relaxed);
            let next = (prev + 1).max(now);
            if self
                .last
                .compare_exchange(prev, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return TaskId::new(next);
            }
        }
    }
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Id source for new tasks
    pub ids: Arc<dyn IdGenerator>,
    /// Persistence adapter the write effects go through
    pub archive: TaskArchive,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, archive: TaskArchive) -> Self {
        Self { ids, archive }
    }
}

/// Actions for the todo list
///
/// Commands carry user intent and are validated by the reducer. The one
/// event, `Hydrated`, is a fact fed in once at startup with whatever the
/// persistence adapter recovered.
#[derive(Action, Clone, Debug)]
pub enum TodoAction {
    /// Command: create a task from `text`
    ///
    /// Whitespace-only text is a no-op by precondition.
    #[command]
    Add {
        /// Raw text; trimmed before the task is created
        text: String,
    },

    /// Command: flip completion on the matching task
    #[command]
    Toggle {
        /// Task to toggle; unknown ids are a no-op
        id: TaskId,
    },

    /// Command: remove the matching task
    #[command]
    Delete {
        /// Task to delete; unknown ids are a no-op
        id: TaskId,
    },

    /// Command: replace the input draft
    #[command]
    DraftChanged {
        /// The new draft text, verbatim
        text: String,
    },

    /// Event: the persisted task list was loaded at startup
    #[event]
    Hydrated {
        /// Recovered tasks; empty when storage was absent or unreadable
        tasks: Vec<Task>,
    },
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the effect that rewrites storage from the current list
    ///
    /// The write is staged here, under the store's write lock, so its
    /// snapshot and sequence number reflect the mutation that caused it
    /// no matter when the effect actually runs.
    fn persist(env: &TodoEnvironment, tasks: &[Task]) -> Effect<TodoAction> {
        let write = env.archive.stage(tasks);
        Effect::future(async move {
            if let Err(error) = write.commit() {
                tracing::error!(%error, "task list write failed, changes may not survive a restart");
            }
            None
        })
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(
            kind = if action.is_command() { "command" } else { "event" },
            "reducing"
        );

        match action {
            TodoAction::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    // No-op by precondition, draft untouched.
                    return SmallVec::new();
                }

                let task = Task::new(env.ids.next_id(), text.to_string());
                state.tasks.push(task);
                state.draft.clear();

                smallvec![Self::persist(env, &state.tasks)]
            },

            TodoAction::Toggle { id } => {
                let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                    tracing::debug!(%id, "toggle on missing id ignored");
                    return SmallVec::new();
                };
                task.toggle();

                smallvec![Self::persist(env, &state.tasks)]
            },

            TodoAction::Delete { id } => {
                let before = state.tasks.len();
                state.tasks.retain(|t| t.id != id);
                if state.tasks.len() == before {
                    tracing::debug!(%id, "delete on missing id ignored");
                    return SmallVec::new();
                }

                smallvec![Self::persist(env, &state.tasks)]
            },

            TodoAction::DraftChanged { text } => {
                state.draft = text;
                SmallVec::new()
            },

            TodoAction::Hydrated { tasks } => {
                state.tasks = tasks;
                SmallVec::new()
            },
        }
    }
}
