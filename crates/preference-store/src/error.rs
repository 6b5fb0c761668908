use thiserror::Error;

use crate::{store::StoreError, value::ValueKind};

/// A preference declaration that violates its construction contract.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The allowed-value list was empty.
    #[error("Preference '{key}' must declare at least one allowed value")]
    EmptyValues {
        #[allow(missing_docs)]
        key: &'static str,
    },

    /// The default index does not point into the allowed-value list.
    #[error(
        "Default index {index} of preference '{key}' must lie between 0 and {}",
        .len.saturating_sub(1)
    )]
    DefaultIndexOutOfRange {
        #[allow(missing_docs)]
        key: &'static str,
        #[allow(missing_docs)]
        index: usize,
        #[allow(missing_docs)]
        len: usize,
    },
}

/// An out-of-range lookup into a bounded preference's allowed values.
#[derive(Debug, Error)]
#[error("Index {index} is out of range for preference '{key}' with {len} values")]
pub struct IndexError {
    #[allow(missing_docs)]
    pub key: &'static str,
    #[allow(missing_docs)]
    pub index: usize,
    #[allow(missing_docs)]
    pub len: usize,
}

/// A stored value that is present but could not be read as the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The store holds a different primitive kind under the key.
    #[error("Expected a {expected} value, found a {found} value")]
    TypeMismatch {
        #[allow(missing_docs)]
        expected: ValueKind,
        #[allow(missing_docs)]
        found: ValueKind,
    },

    /// The stored JSON text does not match the requested structure.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by [`PreferenceHandler`](crate::PreferenceHandler) operations.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// A write was attempted on a handler opened without an edit session.
    #[error("Handler for store '{0}' is not in edit mode")]
    NotInEditMode(String),

    /// The value is not one of the bounded preference's allowed values.
    #[error("Request to store an unsupported value for preference '{0}'")]
    UnsupportedValue(&'static str),

    /// The stored value could not be decoded.
    #[error("Failed to decode preference '{key}': {source}")]
    Decode {
        #[allow(missing_docs)]
        key: &'static str,
        #[allow(missing_docs)]
        #[source]
        source: DecodeError,
    },

    /// The value could not be encoded for storage.
    #[error("Failed to encode preference '{key}': {source}")]
    Encode {
        #[allow(missing_docs)]
        key: &'static str,
        #[allow(missing_docs)]
        #[source]
        source: serde_json::Error,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
