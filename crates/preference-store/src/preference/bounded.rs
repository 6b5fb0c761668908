use super::{Preference, TypedPreference};
use crate::{
    error::{ConfigurationError, IndexError},
    value::PreferenceValue,
};

/// A preference restricted to a fixed list of allowed values, one of which is the default.
///
/// # Example
/// ```rust
/// use preference_store::BoundedPreference;
///
/// let theme = BoundedPreference::new(
///     "pref_key_theme",
///     "Color theme of the application",
///     vec!["light".to_string(), "dark".to_string()],
///     0,
/// )?;
///
/// assert_eq!(theme.default_value(), "light");
/// assert_eq!(theme.value_at(1)?, "dark");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPreference<T> {
    key: &'static str,
    description: &'static str,
    values: Vec<T>,
    default_index: usize,
}

impl<T> BoundedPreference<T> {
    /// Declare a bounded preference.
    ///
    /// `key` should be of the form `pref_key_*`. `values` lists every supported value in
    /// order and must not be empty; duplicates are allowed. `default_index` selects the
    /// default and must lie within `values`.
    pub fn new(
        key: &'static str,
        description: &'static str,
        values: Vec<T>,
        default_index: usize,
    ) -> Result<Self, ConfigurationError> {
        if values.is_empty() {
            return Err(ConfigurationError::EmptyValues { key });
        }
        if default_index >= values.len() {
            return Err(ConfigurationError::DefaultIndexOutOfRange {
                key,
                index: default_index,
                len: values.len(),
            });
        }

        Ok(Self {
            key,
            description,
            values,
            default_index,
        })
    }

    /// Get the allowed value at `index`.
    pub fn value_at(&self, index: usize) -> Result<&T, IndexError> {
        self.values.get(index).ok_or(IndexError {
            key: self.key,
            index,
            len: self.values.len(),
        })
    }

    /// Get all the allowed values, in declaration order.
    pub fn all_values(&self) -> &[T] {
        &self.values
    }

    /// Get the default value.
    pub fn default_value(&self) -> &T {
        &self.values[self.default_index]
    }

    /// Get the position of the default value.
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    /// Get the storage key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Get the description.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl<T> Preference for BoundedPreference<T> {
    fn key(&self) -> &'static str {
        self.key
    }

    fn description(&self) -> &'static str {
        self.description
    }
}

impl<T: PreferenceValue> TypedPreference for BoundedPreference<T> {
    type Value = T;

    fn admit(&self, value: T) -> Option<T> {
        self.values.iter().find(|allowed| **allowed == value).cloned()
    }

    fn declared_default(&self) -> Option<&T> {
        Some(self.default_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode() -> BoundedPreference<String> {
        BoundedPreference::new(
            "mode",
            "Power mode",
            vec!["low".to_string(), "high".to_string()],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_default_value_matches_default_index() {
        for index in 0..3 {
            let pref = BoundedPreference::new("count", "", vec![10, 20, 30], index).unwrap();
            assert_eq!(pref.default_value(), &pref.all_values()[index]);
            assert_eq!(pref.default_index(), index);
        }
    }

    #[test]
    fn test_empty_values_are_rejected() {
        let err = BoundedPreference::<bool>::new("flag", "", vec![], 0).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::EmptyValues { key: "flag" }
        ));
    }

    #[test]
    fn test_default_index_out_of_range_is_rejected() {
        let err = BoundedPreference::new("flag", "", vec![true, false], 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DefaultIndexOutOfRange {
                index: 2,
                len: 2,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Default index 2 of preference 'flag' must lie between 0 and 1"
        );
    }

    #[test]
    fn test_value_at_accepts_first_index() {
        let pref = mode();
        assert_eq!(pref.value_at(0).unwrap(), "low");
        assert_eq!(pref.value_at(1).unwrap(), "high");

        let err = pref.value_at(2).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.len, 2);
    }

    #[test]
    fn test_admit_returns_matching_allowed_value() {
        let pref = mode();
        assert_eq!(pref.admit("high".to_string()), Some("high".to_string()));
        assert_eq!(pref.admit("medium".to_string()), None);
    }

    #[test]
    fn test_duplicate_values_are_permitted() {
        let pref = BoundedPreference::new("level", "", vec![1, 1, 2], 1).unwrap();
        assert_eq!(pref.admit(1), Some(1));
        assert_eq!(pref.default_value(), &1);
    }

    #[test]
    fn test_accessors() {
        let pref = mode();
        assert_eq!(pref.key(), "mode");
        assert_eq!(pref.description(), "Power mode");
        assert_eq!(Preference::key(&pref), "mode");
        assert_eq!(pref.declared_default(), Some(&"low".to_string()));
    }
}
