//! File-backed [`KeyValueStore`].

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use waymark_core::{KeyValueStore, StorageError};

/// Stores every key in one JSON object file.
///
/// Each operation reads the file afresh; writes replace it atomically. A
/// missing or blank file reads as an empty store. Reads from a file that is
/// not a JSON object fail with [`StorageError::Corrupt`]; the next write
/// replaces it with a fresh object holding only the written key.
///
/// # Examples
/// ```no_run
/// use waymark_core::KeyValueStore;
/// use waymark_data::FileKeyValueStore;
///
/// let store = FileKeyValueStore::new("waymark-store.json");
/// store.set("jp_interest_weight", "0.7")?;
/// assert_eq!(store.get("jp_interest_weight")?.as_deref(), Some("0.7"));
/// # Ok::<(), waymark_core::StorageError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKeyValueStore {
    path: Utf8PathBuf,
}

impl FileKeyValueStore {
    /// Bind a store to `path`. Nothing is touched until first use.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_entries(&self, key: &str) -> Result<BTreeMap<String, String>, StorageError> {
        let contents =
            waymark_fs::read_optional_to_string(&self.path).map_err(|source| StorageError::Read {
                key: key.to_owned(),
                source,
            })?;
        match contents {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).map_err(|err| StorageError::Corrupt {
                    message: format!("{}: {err}", self.path),
                })
            }
            _ => Ok(BTreeMap::new()),
        }
    }

    /// Entries to extend on write. An unreadable root starts over empty.
    fn entries_for_write(&self, key: &str) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries(key) {
            Err(StorageError::Corrupt { message }) => {
                warn!("replacing corrupt settings file {message}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_entries(
        &self,
        key: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(entries).map_err(|err| StorageError::Corrupt {
            message: err.to_string(),
        })?;
        waymark_fs::write_atomic(&self.path, &encoded).map_err(|source| StorageError::Write {
            key: key.to_owned(),
            source,
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries(key)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write(key)?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_entries(key) {
            Err(StorageError::Corrupt { message }) => {
                warn!("replacing corrupt settings file {message}");
                return self.write_entries(key, &BTreeMap::new());
            }
            other => other?,
        };
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(key, &entries)
    }
}
