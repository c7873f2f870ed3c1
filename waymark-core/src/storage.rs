//! Durable string key-value storage port.

use std::io;

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all.
    #[error("storage is unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// Reading a key failed.
    #[error("failed to read key {key}")]
    Read {
        /// Key being read.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing a key failed.
    #[error("failed to write key {key}")]
    Write {
        /// Key being written.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The backing data could not be decoded.
    #[error("storage contents are corrupt: {message}")]
    Corrupt {
        /// Decoder message.
        message: String,
    },
}

/// Synchronous string storage keyed by name.
///
/// Implementations take `&self` so a store can be shared between the trip
/// state and a caller inspecting it; interior mutability is the
/// implementation's concern.
pub trait KeyValueStore {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
