use std::path::PathBuf;

/// Configuration for the backend stores are opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfiguration {
    /// Stores live in memory for the lifetime of the [`StoreProvider`](super::StoreProvider).
    Memory,

    /// Every store is persisted as `<folder_path>/<name>.json`.
    File {
        /// The folder holding the store files. Created on first use.
        folder_path: PathBuf,
    },
}

/// Visibility of a store's backing data to other users of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Only the current user can read or write the store.
    #[default]
    Private,

    /// Other users can read the store; only the current user can write it.
    Shared,
}

impl AccessMode {
    /// Unix permission bits for a store file opened with this mode.
    #[cfg_attr(not(unix), allow(dead_code))]
    pub(crate) fn file_permissions(self) -> u32 {
        match self {
            AccessMode::Private => 0o600,
            AccessMode::Shared => 0o644,
        }
    }
}
