// SPDX-License-Identifier: MPL-2.0
//! Persisted key/value store port.
//!
//! The store holds small heuristic values (bandwidth seed) scoped to this
//! device. Writers overwrite; the last write wins.

use std::collections::BTreeMap;

/// Small string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`. Persistence failures are the
    /// implementation's concern and are never reported to callers.
    fn set(&mut self, key: &str, value: String);
}

/// Volatile store used in tests and when no data directory is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value);
    }
}
