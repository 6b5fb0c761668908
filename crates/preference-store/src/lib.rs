#![doc = include_str!("../README.md")]

/// Errors produced while declaring and accessing preferences.
pub mod error;

/// Typed access to a named store.
pub mod handler;

/// Bounded and unbounded preference declarations.
pub mod preference;

/// The key-value storage boundary and its built-in backends.
pub mod store;

/// Value kinds that can be held by a preference.
pub mod value;

pub use error::{ConfigurationError, DecodeError, IndexError, PreferenceError};
pub use handler::{CommitMode, HandlerConfig, PreferenceHandler, PreferenceInitializer};
pub use preference::{BoundedPreference, Preference, TypedPreference, UnBoundedPreference};
pub use store::{
    AccessMode, Change, EditSession, FileStore, MemoryStore, Store, StoreConfiguration,
    StoreError, StoreProvider,
};
pub use value::{Json, PreferenceValue, StoredValue, ValueKind};
