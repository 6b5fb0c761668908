use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use super::{AccessMode, FileStore, MemoryStore, Store, StoreConfiguration, StoreError};

/// Opens named stores and keeps them open.
///
/// Opening the same name twice returns the same instance, so every handler on a name sees
/// the same values regardless of which handler wrote them.
pub struct StoreProvider {
    configuration: StoreConfiguration,
    opened: RwLock<HashMap<String, Arc<dyn Store>>>,
}

impl std::fmt::Debug for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreProvider")
            .field("configuration", &self.configuration)
            .finish()
    }
}

impl StoreProvider {
    /// Creates a provider that opens stores with `configuration`.
    pub fn new(configuration: StoreConfiguration) -> Self {
        StoreProvider {
            configuration,
            opened: RwLock::new(HashMap::new()),
        }
    }

    /// The backend configuration stores are opened with.
    pub fn configuration(&self) -> &StoreConfiguration {
        &self.configuration
    }

    /// Open (or create) the store `name`.
    ///
    /// `mode` only takes effect when the store is first opened by this provider.
    pub fn open(&self, name: &str, mode: AccessMode) -> Result<Arc<dyn Store>, StoreError> {
        if !validate_store_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        if let Some(store) = self
            .opened
            .read()
            .expect("RwLock should not be poisoned")
            .get(name)
        {
            return Ok(Arc::clone(store));
        }

        let mut opened = self.opened.write().expect("RwLock should not be poisoned");
        // Another caller may have opened it between the two locks.
        if let Some(store) = opened.get(name) {
            return Ok(Arc::clone(store));
        }

        let store: Arc<dyn Store> = match &self.configuration {
            StoreConfiguration::Memory => Arc::new(MemoryStore::new(name)),
            StoreConfiguration::File { folder_path } => {
                Arc::new(FileStore::open(folder_path, name, mode)?)
            }
        };
        debug!("Opened preference store '{}' ({:?})", name, mode);

        opened.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }
}

/// Validate that the provided name can be used as a storage identifier, including as a file
/// name. Valid characters are a-z, A-Z, 0-9, underscore (_), dash (-) and dot (.), and the
/// name must not be empty or start with a dot.
pub const fn validate_store_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes[0] == b'.' {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if !(byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' || byte == b'.') {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{store::Change, value::StoredValue};

    #[test]
    fn test_validate_name() {
        assert!(validate_store_name("app_preferences"));
        assert!(validate_store_name("App-Prefs.v2"));
        assert!(!validate_store_name(""));
        assert!(!validate_store_name(".hidden"));
        assert!(!validate_store_name("../escape"));
        assert!(!validate_store_name("with space"));
        assert!(!validate_store_name("nested/name"));
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);
        let err = provider
            .open("bad/name", AccessMode::Private)
            .err()
            .expect("opening an invalid name should fail");
        assert!(matches!(err, StoreError::InvalidName(name) if name == "bad/name"));
    }

    #[test]
    fn test_same_name_returns_same_store() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);

        let a = provider.open("shared", AccessMode::Private).unwrap();
        a.apply(vec![Change::Put {
            key: "k".to_string(),
            value: StoredValue::Int(7),
        }])
        .unwrap();

        let b = provider.open("shared", AccessMode::Private).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.get("k").unwrap(), Some(StoredValue::Int(7)));

        let other = provider.open("other", AccessMode::Private).unwrap();
        assert!(!other.contains("k").unwrap());
    }

    #[test]
    fn test_file_configuration_opens_file_stores() {
        let dir = tempfile::tempdir().unwrap();
        let provider = StoreProvider::new(StoreConfiguration::File {
            folder_path: dir.path().join("nested"),
        });

        let store = provider.open("prefs", AccessMode::Private).unwrap();
        store
            .commit(vec![Change::Put {
                key: "k".to_string(),
                value: StoredValue::Boolean(false),
            }])
            .unwrap();

        assert!(dir.path().join("nested").join("prefs.json").exists());
        assert_eq!(store.name(), "prefs");
    }
}
