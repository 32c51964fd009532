//! # Taskbook Testing
//!
//! Testing utilities and helpers for the Taskbook architecture.
//!
//! This crate provides:
//! - Mock implementations of environment traits ([`mocks`])
//! - A fluent Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use taskbook_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::default())
//!     .when_action(TodoAction::Add { text: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.total_count(), 1))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing
pub mod mocks {
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{DateTime, Utc};
    use taskbook_core::environment::Clock;
    use taskbook_storage::{KeyValueStore, StorageError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use taskbook_testing::mocks::FixedClock;
    /// use taskbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to
    /// parse, which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory key-value store for tests
    ///
    /// Behaves like the production file store, minus the filesystem.
    /// Writes can be made to fail on demand to exercise the best-effort
    /// write policy.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-seeded with one value
        #[must_use]
        pub fn with_value(key: &str, value: &str) -> Self {
            let store = Self::new();
            store
                .values
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            store
        }

        /// Make every subsequent write fail with an I/O error
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of writes currently stored (not a write count)
        #[must_use]
        pub fn len(&self) -> usize {
            self.values
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .len()
        }

        /// Whether the store holds no values
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self
                .values
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .get(key)
                .cloned())
        }

        fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Io(io::Error::other("writes disabled")));
            }
            self.values
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, MemoryStore, test_clock};
