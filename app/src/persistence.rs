//! Persistence adapter for the task list.
//!
//! The whole list is serialized as one JSON array under one fixed key.
//! Reads happen exactly once per session (hydration); writes happen
//! after every mutation, overwriting the previous blob. Storage is a
//! best-effort cache of the in-memory list, not the authority: a
//! malformed or missing blob degrades to an empty list, and a failed
//! write is logged and otherwise ignored.
//!
//! Writes are staged at mutation time and committed from effects later.
//! Effects complete in no particular order, so each staged write carries
//! a sequence number and a stale write never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use taskbook_storage::{KeyValueStore, StorageError, json};

use crate::types::Task;

/// The fixed storage key the task list lives under
pub const TASKS_KEY: &str = "todos";

/// Boundary object owning the storage handle for the task list
#[derive(Clone)]
pub struct TaskArchive {
    store: Arc<dyn KeyValueStore>,
    /// Sequence numbers issued to staged writes, in mutation order
    issued: Arc<AtomicU64>,
    /// Highest sequence number that has landed in storage
    committed: Arc<Mutex<u64>>,
}

impl TaskArchive {
    /// Creates an archive over the given store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            issued: Arc::new(AtomicU64::new(0)),
            committed: Arc::new(Mutex::new(0)),
        }
    }

    /// Loads the persisted task list, once, at startup
    ///
    /// Absent storage yields an empty list. So does unreadable or
    /// malformed storage: hydration never propagates a fault, it logs
    /// and starts fresh.
    #[must_use]
    pub fn hydrate(&self) -> Vec<Task> {
        match json::load::<Vec<Task>>(self.store.as_ref(), TASKS_KEY) {
            Ok(Some(tasks)) => {
                tracing::debug!(count = tasks.len(), "hydrated task list");
                tasks
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "saved task list unreadable, starting empty");
                Vec::new()
            },
        }
    }

    /// Stages a write of the full task list
    ///
    /// Called at mutation time, while the store still holds its write
    /// lock, so sequence numbers are issued in mutation order. The
    /// returned [`TaskWrite`] is committed later, from an effect.
    #[must_use]
    pub fn stage(&self, tasks: &[Task]) -> TaskWrite {
        TaskWrite {
            store: Arc::clone(&self.store),
            committed: Arc::clone(&self.committed),
            version: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
            tasks: tasks.to_vec(),
        }
    }
}

/// A staged write of the full task list
///
/// Holds the snapshot taken at mutation time plus its sequence number.
pub struct TaskWrite {
    store: Arc<dyn KeyValueStore>,
    committed: Arc<Mutex<u64>>,
    version: u64,
    tasks: Vec<Task>,
}

impl TaskWrite {
    /// Writes the snapshot, fully overwriting the previous value
    ///
    /// If a newer snapshot has already landed, this one is stale and is
    /// skipped: the blob always reflects the latest mutation, never an
    /// earlier one that happened to finish last.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if serialization or the underlying write
    /// fails. The caller treats this as ignorable: the in-memory list
    /// stays correct, the change just may not survive a restart.
    pub fn commit(self) -> Result<(), StorageError> {
        let mut committed = self
            .committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if *committed >= self.version {
            tracing::trace!(version = self.version, "skipping stale task list write");
            return Ok(());
        }

        json::save(self.store.as_ref(), TASKS_KEY, &self.tasks)?;
        *committed = self.version;
        Ok(())
    }
}
