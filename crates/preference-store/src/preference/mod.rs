//! Preference declarations.
//!
//! A declaration names a key and the type of value held under it. Declarations never touch
//! a store; they are handed to a [`PreferenceHandler`](crate::PreferenceHandler) as the key
//! carrier of every operation.

mod bounded;
mod unbounded;

pub use bounded::BoundedPreference;
pub use unbounded::UnBoundedPreference;

use crate::value::PreferenceValue;

/// Common accessors of every preference declaration.
pub trait Preference {
    /// The storage key.
    fn key(&self) -> &'static str;

    /// Free-text documentation of the preference. Not used for storage.
    fn description(&self) -> &'static str;
}

/// A preference declaration with a known value type.
///
/// This is what lets the handler read and write every kind of declaration through one code
/// path.
pub trait TypedPreference: Preference {
    /// The type of value held under the key.
    type Value: PreferenceValue;

    /// Returns the value to store for `value`, or `None` if the declaration doesn't accept it.
    fn admit(&self, value: Self::Value) -> Option<Self::Value>;

    /// The value to use when the key is absent, if the declaration has one.
    fn declared_default(&self) -> Option<&Self::Value>;
}
