//! Typed access to a named store.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::{
    error::PreferenceError,
    preference::{BoundedPreference, Preference, TypedPreference},
    store::{AccessMode, EditSession, Store, StoreProvider},
    value::PreferenceValue,
};

/// How a handler hands its writes to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Update the store immediately and persist in the background. Persistence failures are
    /// logged, not returned.
    #[default]
    Apply,

    /// Persist before the write returns and report failures to the caller.
    Commit,
}

/// Configuration of a [`PreferenceHandler`].
///
/// # Example
/// ```rust
/// use preference_store::{AccessMode, CommitMode, HandlerConfig};
///
/// let config = HandlerConfig::new("app_preferences")
///     .mode(AccessMode::Private)
///     .editable(true)
///     .commit_mode(CommitMode::Commit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Name of the store to open.
    pub name: String,
    /// Access mode the store is opened with.
    pub mode: AccessMode,
    /// Whether the handler opens an edit session. Without one, every write fails.
    pub editable: bool,
    /// How writes are committed.
    pub commit: CommitMode,
}

impl HandlerConfig {
    /// A read-only configuration for the store `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: AccessMode::default(),
            editable: false,
            commit: CommitMode::default(),
        }
    }

    /// Set the access mode used when the store is first opened.
    pub fn mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Allow writes through the handler.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Choose whether writes block until they are persisted.
    pub fn commit_mode(mut self, commit: CommitMode) -> Self {
        self.commit = commit;
        self
    }
}

/// Populates first-run values of a freshly opened handler.
///
/// Implemented for any `Fn(&mut PreferenceHandler) -> Result<(), PreferenceError>`.
pub trait PreferenceInitializer {
    /// Define the preference values, typically through
    /// [`PreferenceHandler::initialize_preference`].
    fn initialize_preferences(&self, handler: &mut PreferenceHandler)
        -> Result<(), PreferenceError>;
}

impl<F> PreferenceInitializer for F
where
    F: Fn(&mut PreferenceHandler) -> Result<(), PreferenceError>,
{
    fn initialize_preferences(
        &self,
        handler: &mut PreferenceHandler,
    ) -> Result<(), PreferenceError> {
        self(handler)
    }
}

/// Typed operations on one named store.
///
/// Reads are always available. Writes need the edit session that is opened when the handler
/// is created with [`HandlerConfig::editable`]; every write commits through the configured
/// [`CommitMode`].
pub struct PreferenceHandler {
    config: HandlerConfig,
    store: Arc<dyn Store>,
    edit_session: Option<EditSession>,
    initialized: bool,
}

impl std::fmt::Debug for PreferenceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceHandler")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl PreferenceHandler {
    /// Open the store named by `config` and, if editable, an edit session on it.
    ///
    /// The handler isn't initialized yet; call [`initialize`](Self::initialize) or use
    /// [`open`](Self::open) to do both.
    pub fn new(provider: &StoreProvider, config: HandlerConfig) -> Result<Self, PreferenceError> {
        let store = provider.open(&config.name, config.mode)?;
        let edit_session = config
            .editable
            .then(|| EditSession::new(Arc::clone(&store)));

        Ok(Self {
            config,
            store,
            edit_session,
            initialized: false,
        })
    }

    /// Open the handler and run `initializer` on it.
    pub fn open<I>(
        provider: &StoreProvider,
        config: HandlerConfig,
        initializer: &I,
    ) -> Result<Self, PreferenceError>
    where
        I: PreferenceInitializer + ?Sized,
    {
        let mut handler = Self::new(provider, config)?;
        handler.initialize(initializer)?;
        Ok(handler)
    }

    /// Run `initializer` on this handler. Only the first call has any effect.
    pub fn initialize<I>(&mut self, initializer: &I) -> Result<(), PreferenceError>
    where
        I: PreferenceInitializer + ?Sized,
    {
        if self.initialized {
            debug!(
                "Preference handler for '{}' is already initialized",
                self.config.name
            );
            return Ok(());
        }
        self.initialized = true;
        initializer.initialize_preferences(self)
    }

    /// The configuration the handler was opened with.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// The name of the underlying store.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether the handler has an edit session.
    pub fn is_editable(&self) -> bool {
        self.edit_session.is_some()
    }

    /// Get the value of a bounded preference, or its default if the key is absent.
    pub fn get<T: PreferenceValue>(
        &self,
        preference: &BoundedPreference<T>,
    ) -> Result<T, PreferenceError> {
        match self.try_get(preference)? {
            Some(value) => Ok(value),
            None => Ok(preference.default_value().clone()),
        }
    }

    /// Get the value of a preference, or `override_default` if the key is absent.
    pub fn get_or<P: TypedPreference>(
        &self,
        preference: &P,
        override_default: P::Value,
    ) -> Result<P::Value, PreferenceError> {
        Ok(self.try_get(preference)?.unwrap_or(override_default))
    }

    /// Get the stored value of a preference without substituting any default.
    ///
    /// Returns `None` if the key is absent and an error if a value is present but can't be
    /// read as `P::Value`.
    pub fn try_get<P: TypedPreference>(
        &self,
        preference: &P,
    ) -> Result<Option<P::Value>, PreferenceError> {
        let key = preference.key();
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        match <P::Value as PreferenceValue>::from_stored(raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                warn!("Failed to decode preference '{}': {}", key, source);
                Err(PreferenceError::Decode { key, source })
            }
        }
    }

    /// Store `value` under the preference and return the stored value.
    ///
    /// Bounded preferences only accept one of their allowed values; the first equal allowed
    /// value is the one written.
    pub fn set<P: TypedPreference>(
        &mut self,
        preference: &P,
        value: P::Value,
    ) -> Result<P::Value, PreferenceError> {
        let key = preference.key();
        let commit = self.config.commit;
        let Some(session) = self.edit_session.as_mut() else {
            return Err(PreferenceError::NotInEditMode(self.config.name.clone()));
        };

        let selected = preference
            .admit(value)
            .ok_or(PreferenceError::UnsupportedValue(key))?;
        let stored = selected
            .to_stored()
            .map_err(|source| PreferenceError::Encode { key, source })?;

        trace!("Setting preference '{}' to {}", key, stored);
        session.put(key, stored);
        finish(session, commit)?;

        Ok(selected)
    }

    /// Write the declaration's default if the key is absent.
    ///
    /// Returns the declaration unchanged. An existing value is never overwritten, so repeated
    /// calls keep whatever was written first.
    pub fn initialize_preference<'p, T: PreferenceValue>(
        &mut self,
        preference: &'p BoundedPreference<T>,
    ) -> Result<&'p BoundedPreference<T>, PreferenceError> {
        let default = preference.default_value().clone();
        self.initialize_preference_or(preference, default)
    }

    /// Write `override_default` if the key is absent.
    ///
    /// `override_default` must be one of the preference's allowed values.
    pub fn initialize_preference_or<'p, T: PreferenceValue>(
        &mut self,
        preference: &'p BoundedPreference<T>,
        override_default: T,
    ) -> Result<&'p BoundedPreference<T>, PreferenceError> {
        if self.contains(preference)? {
            trace!(
                "Preference '{}' is already initialized",
                preference.key()
            );
            return Ok(preference);
        }

        self.set(preference, override_default)?;
        Ok(preference)
    }

    /// Remove the preference from the store.
    ///
    /// Without an edit session this does nothing.
    pub fn remove<P>(&mut self, preference: &P) -> Result<(), PreferenceError>
    where
        P: Preference + ?Sized,
    {
        let commit = self.config.commit;
        let Some(session) = self.edit_session.as_mut() else {
            return Ok(());
        };

        trace!("Removing preference '{}'", preference.key());
        session.remove(preference.key());
        finish(session, commit)?;

        Ok(())
    }

    /// Whether the store holds a value for the preference.
    pub fn contains<P>(&self, preference: &P) -> Result<bool, PreferenceError>
    where
        P: Preference + ?Sized,
    {
        Ok(self.store.contains(preference.key())?)
    }

    /// All keys present in the store, sorted.
    pub fn keys(&self) -> Result<Vec<String>, PreferenceError> {
        Ok(self.store.keys()?)
    }

    /// Block until every write made so far is persisted.
    pub fn flush(&self) -> Result<(), PreferenceError> {
        Ok(self.store.flush()?)
    }
}

fn finish(session: &mut EditSession, commit: CommitMode) -> Result<(), PreferenceError> {
    match commit {
        CommitMode::Apply => session.apply()?,
        CommitMode::Commit => session.commit()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        preference::UnBoundedPreference,
        store::{Change, StoreConfiguration},
        value::StoredValue,
    };

    fn provider() -> StoreProvider {
        StoreProvider::new(StoreConfiguration::Memory)
    }

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
    fn test_initializer_runs_once() {
        let provider = provider();
        let calls = Cell::new(0);
        let initializer = |_: &mut PreferenceHandler| -> Result<(), PreferenceError> {
            calls.set(calls.get() + 1);
            Ok(())
        };

        let mut handler =
            PreferenceHandler::open(&provider, HandlerConfig::new("prefs"), &initializer).unwrap();
        handler.initialize(&initializer).unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_new_does_not_initialize() {
        let provider = provider();
        let pref = mode();
        let mut handler =
            PreferenceHandler::new(&provider, HandlerConfig::new("prefs").editable(true)).unwrap();
        assert!(!handler.contains(&pref).unwrap());

        handler
            .initialize(&|h: &mut PreferenceHandler| -> Result<(), PreferenceError> {
                h.initialize_preference(&pref)?;
                Ok(())
            })
            .unwrap();
        assert!(handler.contains(&pref).unwrap());
    }

    #[test]
    fn test_get_or_prefers_stored_value() {
        let provider = provider();
        let pref = mode();
        let mut handler =
            PreferenceHandler::new(&provider, HandlerConfig::new("prefs").editable(true)).unwrap();

        assert_eq!(handler.get_or(&pref, "high".to_string()).unwrap(), "high");
        handler.set(&pref, "low".to_string()).unwrap();
        assert_eq!(handler.get_or(&pref, "high".to_string()).unwrap(), "low");
    }

    #[test]
    fn test_set_requires_edit_session() {
        let provider = provider();
        let pref = mode();
        let mut handler = PreferenceHandler::new(&provider, HandlerConfig::new("prefs")).unwrap();

        assert!(!handler.is_editable());
        let err = handler.set(&pref, "high".to_string()).unwrap_err();
        assert!(matches!(err, PreferenceError::NotInEditMode(name) if name == "prefs"));
        assert!(!handler.contains(&pref).unwrap());
    }

    #[test]
    fn test_initialize_preference_without_edit_session_fails_when_absent() {
        let provider = provider();
        let pref = mode();
        let mut handler = PreferenceHandler::new(&provider, HandlerConfig::new("prefs")).unwrap();

        assert!(matches!(
            handler.initialize_preference(&pref),
            Err(PreferenceError::NotInEditMode(_))
        ));
    }

    #[test]
    fn test_unsupported_override_is_rejected() {
        let provider = provider();
        let pref = mode();
        let mut handler =
            PreferenceHandler::new(&provider, HandlerConfig::new("prefs").editable(true)).unwrap();

        let err = handler
            .initialize_preference_or(&pref, "medium".to_string())
            .unwrap_err();
        assert!(matches!(err, PreferenceError::UnsupportedValue("mode")));
        assert!(!handler.contains(&pref).unwrap());
    }

    #[test]
    fn test_type_mismatch_is_a_decode_error() {
        let provider = provider();
        let store = provider.open("prefs", AccessMode::Private).unwrap();
        store
            .apply(vec![Change::Put {
                key: "count".to_string(),
                value: StoredValue::Boolean(true),
            }])
            .unwrap();

        const COUNT: UnBoundedPreference<i32> = UnBoundedPreference::new("count", "");
        let handler = PreferenceHandler::new(&provider, HandlerConfig::new("prefs")).unwrap();

        let err = handler.get_or(&COUNT, 0).unwrap_err();
        assert!(matches!(err, PreferenceError::Decode { key: "count", .. }));
    }

    #[test]
    fn test_keys_lists_stored_preferences() {
        let provider = provider();
        const B: UnBoundedPreference<bool> = UnBoundedPreference::new("b", "");
        const A: UnBoundedPreference<i64> = UnBoundedPreference::new("a", "");
        let mut handler =
            PreferenceHandler::new(&provider, HandlerConfig::new("prefs").editable(true)).unwrap();

        handler.set(&B, true).unwrap();
        handler.set(&A, 5).unwrap();
        assert_eq!(handler.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
