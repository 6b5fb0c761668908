use std::marker::PhantomData;

use super::{Preference, TypedPreference};
use crate::value::PreferenceValue;

/// A preference that accepts any value of its type and has no default.
///
/// # Example
/// ```rust
/// use preference_store::UnBoundedPreference;
///
/// const LAST_USER: UnBoundedPreference<String> =
///     UnBoundedPreference::new("pref_key_last_user", "Name of the last signed in user");
/// ```
#[derive(Debug)]
pub struct UnBoundedPreference<T> {
    key: &'static str,
    description: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> UnBoundedPreference<T> {
    /// Declare an unbounded preference.
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            description,
            _marker: PhantomData,
        }
    }

    /// Get the storage key.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Get the description.
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

// Manual impls so that `T` doesn't need to be `Clone`/`Copy` itself.
impl<T> Clone for UnBoundedPreference<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UnBoundedPreference<T> {}

impl<T> Preference for UnBoundedPreference<T> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn description(&self) -> &'static str {
        self.description
    }
}

impl<T: PreferenceValue> TypedPreference for UnBoundedPreference<T> {
    type Value = T;

    fn admit(&self, value: T) -> Option<T> {
        Some(value)
    }

    fn declared_default(&self) -> Option<&T> {
        None
    }
}
