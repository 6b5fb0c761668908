//! The key-value storage boundary.
//!
//! A [`Store`] is a named map from keys to [`StoredValue`]s. Reads go straight to the
//! store; writes are batched in an [`EditSession`] and handed to the store either with
//! [`Store::apply`] (update now, persist in the background) or [`Store::commit`] (persist
//! before returning).

use std::sync::Arc;

use thiserror::Error;

use crate::value::StoredValue;

mod configuration;
mod file;
mod memory;
mod provider;

pub use configuration::{AccessMode, StoreConfiguration};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use provider::StoreProvider;

/// An error resulting from operations on a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store name can't be used as a storage identifier.
    #[error("Invalid store name '{0}': use ASCII letters, digits, '_', '-' or '.'")]
    InvalidName(String),

    /// Reading or writing the backing file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single pending modification of a store.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Insert or replace the value under `key`.
    Put {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        value: StoredValue,
    },
    /// Remove `key`, if present.
    Remove {
        #[allow(missing_docs)]
        key: String,
    },
}

/// This trait represents a named key-value store holding preference values.
///
/// Implementations synchronize internally and can be shared between handlers.
pub trait Store: Send + Sync {
    /// The name the store was opened with.
    fn name(&self) -> &str;

    /// Retrieves the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError>;

    /// Whether a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Lists all keys in the store, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Applies `changes` to the in-memory state and schedules persistence without waiting
    /// for it. Persistence failures are not reported to the caller.
    fn apply(&self, changes: Vec<Change>) -> Result<(), StoreError>;

    /// Applies `changes` and persists them before returning.
    fn commit(&self, changes: Vec<Change>) -> Result<(), StoreError>;

    /// Blocks until everything applied so far is persisted.
    fn flush(&self) -> Result<(), StoreError>;
}

/// An open write session against a store.
///
/// Changes are buffered until [`apply`](Self::apply) or [`commit`](Self::commit) hands them
/// to the store. The session is meant for a single owner at a time.
pub struct EditSession {
    store: Arc<dyn Store>,
    pending: Vec<Change>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("store", &self.store.name())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EditSession {
    /// Open a write session on `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Queue a write of `value` under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: StoredValue) -> &mut Self {
        self.pending.push(Change::Put {
            key: key.into(),
            value,
        });
        self
    }

    /// Queue the removal of `key`.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.pending.push(Change::Remove { key: key.into() });
        self
    }

    /// The changes queued since the last apply or commit.
    pub fn pending(&self) -> &[Change] {
        &self.pending
    }

    /// Hand the queued changes to the store without waiting for persistence.
    pub fn apply(&mut self) -> Result<(), StoreError> {
        let changes = std::mem::take(&mut self.pending);
        self.store.apply(changes)
    }

    /// Hand the queued changes to the store and wait for persistence.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        let changes = std::mem::take(&mut self.pending);
        self.store.commit(changes)
    }
}
