// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Key-value settings persistence.
//!
//! Settings are owned by lines and polytopes; each owner's keys are prefixed
//! with its name (see [`setting_key`]).

mod error;

pub use error::SettingsError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};

/// The key under which `owner` stores `setting`. Spaces are removed, so "Line
/// 1" and "Line1" share their settings.
pub fn setting_key(owner: &str, setting: &str) -> String {
    format!("{owner}_{setting}").replace(' ', "")
}

/// A string-valued settings store.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), SettingsError>;

    fn keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Settings that only live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: IndexMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> MemorySettings {
        MemorySettings::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        self.values.shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Settings backed by a TOML file of string values. The file is rewritten
/// after every change.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    values: IndexMap<String, String>,
}

impl FileSettings {
    /// Load settings from `path`. A missing file is treated as empty and is
    /// created on the first change.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<FileSettings, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|err| SettingsError::IO {
                path: path.clone(),
                err,
            })?;
            toml::from_str(&contents).map_err(|err| SettingsError::Decode {
                path: path.clone(),
                err,
            })?
        } else {
            debug!("Settings file {} doesn't exist yet", path.display());
            IndexMap::new()
        };
        Ok(FileSettings { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the file. If that fails, go back to `previous` so memory still
    /// matches what's on disk.
    fn sync_or_restore(&mut self, previous: IndexMap<String, String>) -> Result<(), SettingsError> {
        self.sync().map_err(|e| {
            self.values = previous;
            e
        })
    }

    fn sync(&self) -> Result<(), SettingsError> {
        trace!("Writing {} settings to {}", self.values.len(), self.path.display());
        let contents = toml::to_string(&self.values)?;
        fs::write(&self.path, contents).map_err(|err| SettingsError::IO {
            path: self.path.clone(),
            err,
        })
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError> {
        let previous = self.values.clone();
        self.values.insert(key.to_string(), value);
        self.sync_or_restore(previous)
    }

    fn remove(&mut self, key: &str) -> Result<(), SettingsError> {
        let previous = self.values.clone();
        if self.values.shift_remove(key).is_some() {
            self.sync_or_restore(previous)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
