//! The sample preferences managed by the CLI.

use std::collections::BTreeSet;

use clap::ValueEnum;
use color_eyre::eyre::{eyre, Result, WrapErr};
use preference_store::{
    BoundedPreference, ConfigurationError, Json, Preference, PreferenceError, PreferenceHandler,
    PreferenceInitializer, PreferenceValue, TypedPreference, UnBoundedPreference,
};
use serde::{Deserialize, Serialize};

/// A structured value stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleModel {
    pub index: i32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleName {
    Theme,
    SyncInterval,
    ShowHints,
    FontScale,
    RetryCount,
    LastUser,
    Tags,
    Profile,
    Recent,
}

impl SampleName {
    fn label(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default()
    }
}

const RETRY_COUNT: UnBoundedPreference<i32> = UnBoundedPreference::new(
    "pref_key_retry_count",
    "How many times a failed sync is retried before giving up.",
);
const LAST_USER: UnBoundedPreference<String> = UnBoundedPreference::new(
    "pref_key_last_user",
    "Name of the last signed in user.",
);
const TAGS: UnBoundedPreference<BTreeSet<String>> = UnBoundedPreference::new(
    "pref_key_tags",
    "Labels attached to this device.",
);
const RECENT: UnBoundedPreference<Json<SampleModel>> = UnBoundedPreference::new(
    "pref_key_recent",
    "The most recently opened model.",
);

/// One sample preference and its current state, as rendered by `show`.
#[derive(Debug, Serialize)]
pub struct SampleEntry {
    pub name: String,
    pub key: &'static str,
    pub description: &'static str,
    pub value: Option<String>,
    pub stored: bool,
    pub allowed: Option<Vec<String>>,
}

pub struct Samples {
    theme: BoundedPreference<String>,
    sync_interval: BoundedPreference<i64>,
    show_hints: BoundedPreference<bool>,
    font_scale: BoundedPreference<f32>,
    profile: BoundedPreference<Json<SampleModel>>,
}

impl Samples {
    pub fn new() -> Result<Self, ConfigurationError> {
        Ok(Self {
            theme: BoundedPreference::new(
                "pref_key_theme",
                "Color theme of the application.",
                vec!["light".to_string(), "dark".to_string(), "system".to_string()],
                0,
            )?,
            sync_interval: BoundedPreference::new(
                "pref_key_sync_interval",
                "Minutes between background syncs.",
                vec![15, 30, 60, 240],
                1,
            )?,
            show_hints: BoundedPreference::new(
                "pref_key_show_hints",
                "Whether hints are shown on first use of a screen.",
                vec![true, false],
                0,
            )?,
            font_scale: BoundedPreference::new(
                "pref_key_font_scale",
                "Scale applied to the default font size.",
                vec![0.85, 1.0, 1.15, 1.3],
                1,
            )?,
            profile: BoundedPreference::new(
                "pref_key_profile",
                "The selected profile.",
                vec![
                    Json(SampleModel {
                        index: 0,
                        name: "xxx".to_string(),
                    }),
                    Json(SampleModel {
                        index: 1,
                        name: "yyy".to_string(),
                    }),
                ],
                0,
            )?,
        })
    }

    fn preference(&self, name: SampleName) -> &dyn Preference {
        match name {
            SampleName::Theme => &self.theme,
            SampleName::SyncInterval => &self.sync_interval,
            SampleName::ShowHints => &self.show_hints,
            SampleName::FontScale => &self.font_scale,
            SampleName::RetryCount => &RETRY_COUNT,
            SampleName::LastUser => &LAST_USER,
            SampleName::Tags => &TAGS,
            SampleName::Profile => &self.profile,
            SampleName::Recent => &RECENT,
        }
    }

    /// Current state of every sample preference.
    pub fn entries(&self, handler: &PreferenceHandler) -> Result<Vec<SampleEntry>> {
        SampleName::value_variants()
            .iter()
            .map(|name| self.entry(handler, *name))
            .collect()
    }

    fn entry(&self, handler: &PreferenceHandler, name: SampleName) -> Result<SampleEntry> {
        match name {
            SampleName::Theme => bounded_entry(handler, name, &self.theme),
            SampleName::SyncInterval => bounded_entry(handler, name, &self.sync_interval),
            SampleName::ShowHints => bounded_entry(handler, name, &self.show_hints),
            SampleName::FontScale => bounded_entry(handler, name, &self.font_scale),
            SampleName::RetryCount => unbounded_entry(handler, name, &RETRY_COUNT),
            SampleName::LastUser => unbounded_entry(handler, name, &LAST_USER),
            SampleName::Tags => unbounded_entry(handler, name, &TAGS),
            SampleName::Profile => bounded_entry(handler, name, &self.profile),
            SampleName::Recent => unbounded_entry(handler, name, &RECENT),
        }
    }

    /// Parse `raw` for the preference `name` and store it. Returns the stored value.
    pub fn set(
        &self,
        handler: &mut PreferenceHandler,
        name: SampleName,
        raw: &str,
    ) -> Result<String> {
        let label = name.label();
        match name {
            SampleName::Theme => store(handler, &self.theme, raw.to_string()),
            SampleName::SyncInterval => {
                store(handler, &self.sync_interval, parse(raw, &label)?)
            }
            SampleName::ShowHints => store(handler, &self.show_hints, parse(raw, &label)?),
            SampleName::FontScale => store(handler, &self.font_scale, parse(raw, &label)?),
            SampleName::RetryCount => store(handler, &RETRY_COUNT, parse(raw, &label)?),
            SampleName::LastUser => store(handler, &LAST_USER, raw.to_string()),
            SampleName::Tags => store(handler, &TAGS, parse_set(raw)),
            SampleName::Profile => store(handler, &self.profile, parse_json(raw, &label)?),
            SampleName::Recent => store(handler, &RECENT, parse_json(raw, &label)?),
        }
    }

    /// Remove the preference `name` from the store.
    pub fn remove(&self, handler: &mut PreferenceHandler, name: SampleName) -> Result<()> {
        handler.remove(self.preference(name))?;
        Ok(())
    }

    /// Remove every sample preference from the store.
    pub fn reset(&self, handler: &mut PreferenceHandler) -> Result<()> {
        for name in SampleName::value_variants() {
            self.remove(handler, *name)?;
        }
        Ok(())
    }
}

impl PreferenceInitializer for Samples {
    fn initialize_preferences(
        &self,
        handler: &mut PreferenceHandler,
    ) -> Result<(), PreferenceError> {
        handler.initialize_preference(&self.theme)?;
        handler.initialize_preference(&self.sync_interval)?;
        handler.initialize_preference(&self.show_hints)?;
        handler.initialize_preference(&self.font_scale)?;
        handler.initialize_preference(&self.profile)?;
        Ok(())
    }
}

fn display<V: PreferenceValue>(value: &V) -> Result<String> {
    Ok(value.to_stored()?.to_string())
}

fn bounded_entry<T: PreferenceValue>(
    handler: &PreferenceHandler,
    name: SampleName,
    preference: &BoundedPreference<T>,
) -> Result<SampleEntry> {
    let allowed = preference
        .all_values()
        .iter()
        .map(display)
        .collect::<Result<Vec<_>>>()?;

    Ok(SampleEntry {
        name: name.label(),
        key: preference.key(),
        description: preference.description(),
        value: Some(display(&handler.get(preference)?)?),
        stored: handler.contains(preference)?,
        allowed: Some(allowed),
    })
}

fn unbounded_entry<T: PreferenceValue>(
    handler: &PreferenceHandler,
    name: SampleName,
    preference: &UnBoundedPreference<T>,
) -> Result<SampleEntry> {
    let value = handler
        .try_get(preference)?
        .map(|value| display(&value))
        .transpose()?;

    Ok(SampleEntry {
        name: name.label(),
        key: preference.key(),
        description: preference.description(),
        stored: value.is_some(),
        value,
        allowed: None,
    })
}

fn store<P: TypedPreference>(
    handler: &mut PreferenceHandler,
    preference: &P,
    value: P::Value,
) -> Result<String> {
    let written = handler.set(preference, value)?;
    display(&written)
}

fn parse<T>(raw: &str, label: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .wrap_err_with(|| format!("Invalid value '{raw}' for {label}"))
}

fn parse_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str, label: &str) -> Result<Json<T>> {
    serde_json::from_str(raw)
        .map(Json)
        .map_err(|e| eyre!("Invalid JSON for {label}: {e}"))
}

#[cfg(test)]
mod tests {
    use preference_store::{HandlerConfig, StoreConfiguration, StoreProvider};

    use super::*;

    fn handler(provider: &StoreProvider) -> PreferenceHandler {
        PreferenceHandler::new(provider, HandlerConfig::new("samples").editable(true)).unwrap()
    }

    #[test]
    fn test_initializer_writes_bounded_defaults() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);
        let samples = Samples::new().unwrap();
        let mut handler = handler(&provider);
        handler.initialize(&samples).unwrap();

        assert_eq!(
            handler.keys().unwrap(),
            vec![
                "pref_key_font_scale",
                "pref_key_profile",
                "pref_key_show_hints",
                "pref_key_sync_interval",
                "pref_key_theme",
            ]
        );
    }

    #[test]
    fn test_set_parses_by_kind() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);
        let samples = Samples::new().unwrap();
        let mut handler = handler(&provider);

        assert_eq!(
            samples.set(&mut handler, SampleName::SyncInterval, "60").unwrap(),
            "60"
        );
        assert_eq!(
            samples.set(&mut handler, SampleName::Tags, "work, home,").unwrap(),
            "[home, work]"
        );
        assert_eq!(
            samples
                .set(&mut handler, SampleName::Recent, r#"{"index":3,"name":"zzz"}"#)
                .unwrap(),
            r#"{"index":3,"name":"zzz"}"#
        );
        assert!(samples
            .set(&mut handler, SampleName::SyncInterval, "soon")
            .is_err());
        assert!(samples.set(&mut handler, SampleName::Theme, "purple").is_err());
    }

    #[test]
    fn test_entries_report_unset_unbounded_values() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);
        let samples = Samples::new().unwrap();
        let handler = handler(&provider);

        let entries = samples.entries(&handler).unwrap();
        assert_eq!(entries.len(), SampleName::value_variants().len());

        let theme = &entries[0];
        assert_eq!(theme.name, "theme");
        assert_eq!(theme.value.as_deref(), Some("light"));
        assert!(!theme.stored);

        let last_user = entries
            .iter()
            .find(|entry| entry.name == "last-user")
            .unwrap();
        assert_eq!(last_user.value, None);
        assert_eq!(last_user.allowed, None);
    }

    #[test]
    fn test_reset_removes_every_sample() {
        let provider = StoreProvider::new(StoreConfiguration::Memory);
        let samples = Samples::new().unwrap();
        let mut handler = handler(&provider);
        handler.initialize(&samples).unwrap();
        samples.set(&mut handler, SampleName::LastUser, "alice").unwrap();

        samples.reset(&mut handler).unwrap();
        assert!(handler.keys().unwrap().is_empty());
    }
}
