//! # Taskbook Runtime
//!
//! Runtime implementation for the Taskbook architecture.
//!
//! This crate provides the Store runtime that coordinates reducer
//! execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: the runtime that manages state and executes effects
//! - **Effect executor**: runs effect descriptions on spawned tasks and
//!   feeds resulting actions back into the reducer
//! - **State watch**: a snapshot of state is published to observers after
//!   every action, which is what drives re-rendering in the view layer
//!
//! ## Example
//!
//! ```ignore
//! use taskbook_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//!
//! // Observe every state change
//! let mut states = store.subscribe();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskbook_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// The store itself never fails on the action path; effects are
    /// fire-and-forget and log their own failures. The only fallible
    /// operation is the exit-time flush.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Flush timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("flush timed out with {0} effects still running")]
        FlushTimeout(usize),
    }
}

pub use error::StoreError;

/// Decrements the pending-effect counter when dropped
///
/// Held across an effect task so the counter stays accurate even if the
/// effect panics.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
/// 5. State observation (a `watch` channel of snapshots)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(TodoState::default(), TodoReducer::new(), env);
///
/// store.send(TodoAction::Add { text: "Buy milk".into() }).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    pending_effects: Arc<AtomicUsize>,
    /// State snapshot channel for observers.
    ///
    /// A snapshot is published after every processed action, no-ops
    /// included, so an observer that dispatched an action can always
    /// await exactly one notification for it.
    state_watch: Arc<watch::Sender<S>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            pending_effects: Arc::clone(&self.pending_effects),
            state_watch: Arc::clone(&self.state_watch),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (state_watch, _) = watch::channel(initial_state.clone());

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            pending_effects: Arc::new(AtomicUsize::new(0)),
            state_watch: Arc::new(state_watch),
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Publishes the post-reduction snapshot to observers
    /// 4. Executes returned effects on spawned tasks
    ///
    /// Effects may produce further actions, which re-enter through
    /// `send` (feedback loop). `send` returns after starting effect
    /// execution, not after completion: persistence and other I/O never
    /// block the caller.
    ///
    /// Concurrent `send` calls serialize at the write lock, so there is
    /// exactly one writer at a time and snapshots are published in
    /// mutation order.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) {
        metrics::counter!("store.actions.total").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("acquired write lock on state");

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            // Publish under the lock so observers see snapshots in
            // mutation order.
            self.state_watch.send_replace(state.clone());

            effects
        };

        tracing::trace!(count = effects.len(), "executing effects");
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let total = store.state(|s| s.tasks.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to state snapshots
    ///
    /// The receiver holds the latest snapshot and is notified after
    /// every processed action. This is the explicit observer mechanism
    /// the view layer re-renders from.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state_watch.subscribe()
    }

    /// Wait for all pending effects to complete
    ///
    /// Called on the exit path so the final persistence write lands
    /// before the process ends.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FlushTimeout`] if effects are still running
    /// when the timeout expires.
    pub async fn flush(&self, timeout: Duration) -> Result<(), StoreError> {
        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::debug!("all effects completed");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending, "flush timed out with effects still running");
                return Err(StoreError::FlushTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Execute a single effect
    ///
    /// `Effect::Future` runs on a spawned task; if it yields an action,
    /// that action is sent back into the store. Effect failures are the
    /// effect's own business: the future is expected to log and swallow
    /// them (effects are fire-and-forget).
    ///
    /// A [`PendingGuard`] keeps the pending counter accurate even if the
    /// effect panics.
    fn execute_effect(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let guard = PendingGuard(Arc::clone(&self.pending_effects));
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = guard;

                    if let Some(action) = fut.await {
                        tracing::trace!("effect produced an action, feeding back");
                        store.send(action).await;
                    }
                });
            },
        }
    }
}
