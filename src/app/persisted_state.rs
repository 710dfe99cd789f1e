// SPDX-License-Identifier: MPL-2.0
//! Device-scoped state persisted in CBOR.
//!
//! Holds values the viewer learns on its own (the bandwidth seed of the
//! adaptive engine), kept apart from the user-editable `settings.toml`.
//!
//! # Path Resolution
//!
//! 1. Use [`CborStore::open`] with an explicit directory
//! 2. `--data-dir` or `ICED_STORIES_DATA_DIR`
//! 3. Platform-specific data directory

use super::paths;
use crate::application::port::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

/// On-disk layout of the state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl AppState {
    /// Reads the state file. A missing file is not an error; an unreadable
    /// one yields the default state and the i18n key of a warning.
    pub fn load_from(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => (state, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "state file unreadable");
                    (
                        Self::default(),
                        Some("notification-state-parse-error".to_string()),
                    )
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "state file could not be opened");
                (
                    Self::default(),
                    Some("notification-state-read-error".to_string()),
                )
            }
        }
    }

    /// Writes the state file, creating its directory when needed.
    pub fn save_to(&self, path: &Path) -> Option<String> {
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        let file = match fs::File::create(path) {
            Ok(file) => file,
            Err(_) => return Some("notification-state-write-error".to_string()),
        };
        match ciborium::into_writer(self, BufWriter::new(file)) {
            Ok(()) => None,
            Err(_) => Some("notification-state-write-error".to_string()),
        }
    }
}

/// [`KeyValueStore`] backed by `state.cbor`. Every write is flushed to disk.
#[derive(Debug, Clone)]
pub struct CborStore {
    path: Option<PathBuf>,
    state: AppState,
}

impl CborStore {
    /// Opens the store in `base_dir`, or in the resolved data directory.
    ///
    /// Returns the store and an optional i18n warning key.
    pub fn open(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let path = paths::get_app_data_dir_with_override(base_dir).map(|mut dir| {
            dir.push(STATE_FILE);
            dir
        });
        let (state, warning) = match &path {
            Some(path) => AppState::load_from(path),
            None => (AppState::default(), None),
        };
        (Self { path, state }, warning)
    }

    /// File the store writes to, if a data directory could be resolved.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl KeyValueStore for CborStore {
    fn get(&self, key: &str) -> Option<String> {
        self.state.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        if self.state.entries.get(key) == Some(&value) {
            return;
        }
        self.state.entries.insert(key.to_string(), value);

        let Some(path) = &self.path else {
            return;
        };
        if let Some(warning) = self.state.save_to(path) {
            tracing::warn!(path = %path.display(), warning, "state not persisted");
        }
    }
}
