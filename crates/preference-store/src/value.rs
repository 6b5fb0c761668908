//! Conversion between Rust values and the primitive kinds a store can hold.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::DecodeError;

/// The primitive kinds a store can hold.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Int,
    Long,
    Float,
    String,
    StringSet,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::StringSet => "string set",
        };
        f.write_str(name)
    }
}

/// A raw value as held by a [`Store`](crate::Store).
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StoredValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(#[serde(with = "float")] f32),
    String(String),
    StringSet(BTreeSet<String>),
}

/// JSON has no representation for non-finite numbers, so those are written as strings.
mod float {
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    pub(super) fn serialize<S>(value: &f32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { INFINITY } else { NEG_INFINITY })
        } else {
            serializer.serialize_f32(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<f32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                NAN => Ok(f32::NAN),
                INFINITY => Ok(f32::INFINITY),
                NEG_INFINITY => Ok(f32::NEG_INFINITY),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"a number, \"NaN\", \"Infinity\" or \"-Infinity\"",
                )),
            },
        }
    }
}

impl StoredValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            StoredValue::Boolean(_) => ValueKind::Boolean,
            StoredValue::Int(_) => ValueKind::Int,
            StoredValue::Long(_) => ValueKind::Long,
            StoredValue::Float(_) => ValueKind::Float,
            StoredValue::String(_) => ValueKind::String,
            StoredValue::StringSet(_) => ValueKind::StringSet,
        }
    }
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Boolean(v) => write!(f, "{v}"),
            StoredValue::Int(v) => write!(f, "{v}"),
            StoredValue::Long(v) => write!(f, "{v}"),
            StoredValue::Float(v) => write!(f, "{v}"),
            StoredValue::String(v) => f.write_str(v),
            StoredValue::StringSet(v) => {
                let joined: Vec<&str> = v.iter().map(String::as_str).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

/// A type that can be held by a preference.
///
/// Implemented for the primitive kinds supported natively by stores and for [`Json`], which
/// covers any structured `serde` type.
pub trait PreferenceValue: Clone + PartialEq {
    /// The stored kind this type is encoded as.
    const KIND: ValueKind;

    /// Encode the value for storage.
    fn to_stored(&self) -> Result<StoredValue, serde_json::Error>;

    /// Decode a value read from storage.
    fn from_stored(value: StoredValue) -> Result<Self, DecodeError>;
}

fn mismatch<T: PreferenceValue>(found: &StoredValue) -> DecodeError {
    DecodeError::TypeMismatch {
        expected: T::KIND,
        found: found.kind(),
    }
}

macro_rules! impl_primitive_value {
    ($ty:ty, $variant:ident) => {
        impl PreferenceValue for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            #[allow(clippy::clone_on_copy)]
            fn to_stored(&self) -> Result<StoredValue, serde_json::Error> {
                Ok(StoredValue::$variant(self.clone()))
            }

            fn from_stored(value: StoredValue) -> Result<Self, DecodeError> {
                match value {
                    StoredValue::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_primitive_value!(bool, Boolean);
impl_primitive_value!(i32, Int);
impl_primitive_value!(i64, Long);
impl_primitive_value!(f32, Float);
impl_primitive_value!(String, String);
impl_primitive_value!(BTreeSet<String>, StringSet);

impl PreferenceValue for HashSet<String> {
    const KIND: ValueKind = ValueKind::StringSet;

    fn to_stored(&self) -> Result<StoredValue, serde_json::Error> {
        Ok(StoredValue::StringSet(self.iter().cloned().collect()))
    }

    fn from_stored(value: StoredValue) -> Result<Self, DecodeError> {
        match value {
            StoredValue::StringSet(v) => Ok(v.into_iter().collect()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

/// A structured value stored as JSON text.
///
/// The wrapped type decides the shape that is decoded, so reading a key back requires a
/// declaration with the same `T` it was written with.
///
/// # Example
/// ```rust
/// use preference_store::{Json, UnBoundedPreference};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// const LAST_WINDOW: UnBoundedPreference<Json<Window>> =
///     UnBoundedPreference::new("pref_key_last_window", "Size of the last opened window");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the structured value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

impl<T> PreferenceValue for Json<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq,
{
    const KIND: ValueKind = ValueKind::String;

    fn to_stored(&self) -> Result<StoredValue, serde_json::Error> {
        Ok(StoredValue::String(serde_json::to_string(&self.0)?))
    }

    fn from_stored(value: StoredValue) -> Result<Self, DecodeError> {
        match value {
            StoredValue::String(json) => Ok(Json(serde_json::from_str(&json)?)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}
