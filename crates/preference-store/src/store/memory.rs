use std::{collections::BTreeMap, sync::RwLock};

use super::{Change, Store, StoreError};
use crate::value::StoredValue;

/// A store that keeps its values in memory only.
pub struct MemoryStore {
    name: String,
    values: RwLock<BTreeMap<String, StoredValue>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("name", &self.name)
            .finish()
    }
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RwLock::new(BTreeMap::new()),
        }
    }
}

/// Apply `changes` in order to `values`.
pub(super) fn apply_changes(values: &mut BTreeMap<String, StoredValue>, changes: Vec<Change>) {
    for change in changes {
        match change {
            Change::Put { key, value } => {
                values.insert(key, value);
            }
            Change::Remove { key } => {
                values.remove(&key);
            }
        }
    }
}

impl Store for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        Ok(self
            .values
            .read()
            .expect("RwLock should not be poisoned")
            .get(key)
            .cloned())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .values
            .read()
            .expect("RwLock should not be poisoned")
            .keys()
            .cloned()
            .collect())
    }

    fn apply(&self, changes: Vec<Change>) -> Result<(), StoreError> {
        let mut values = self.values.write().expect("RwLock should not be poisoned");
        apply_changes(&mut values, changes);
        Ok(())
    }

    fn commit(&self, changes: Vec<Change>) -> Result<(), StoreError> {
        self.apply(changes)
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
