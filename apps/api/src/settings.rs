//! Process-wide UI preferences.
//!
//! `SettingsStore` is created once in `main` from the local store and handed
//! to every consumer through `AppState`; it lives for the whole process.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{LocalStore, StoreError};

const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    Xlarge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Normal,
    High,
    Higher,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub contrast: Contrast,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Reset must be confirmed")]
    NotConfirmed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn parse<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, SettingsError> {
    serde_json::from_value(Value::String(value.to_ascii_lowercase())).map_err(|_| {
        SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    })
}

impl Settings {
    /// Returns a copy with one field changed. Keys use the persisted names.
    pub fn with(mut self, key: &str, value: &str) -> Result<Self, SettingsError> {
        match key {
            "theme" => self.theme = parse(key, value)?,
            "font_size" | "fontSize" => self.font_size = parse(key, value)?,
            "contrast" => self.contrast = parse(key, value)?,
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(self)
    }
}

pub struct SettingsStore {
    store: Arc<LocalStore>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Loads persisted settings, falling back to defaults when absent or unreadable.
    pub fn load(store: Arc<LocalStore>) -> Self {
        let current = match store.get(SETTINGS_KEY) {
            Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                warn!("Persisted settings unreadable, using defaults: {e}");
                Settings::default()
            }),
            None => Settings::default(),
        };
        info!("Settings loaded: {current:?}");
        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub fn current(&self) -> Settings {
        *self.current.read().unwrap_or_else(|p| p.into_inner())
    }

    pub fn update_setting(&self, key: &str, value: &str) -> Result<Settings, SettingsError> {
        let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
        let next = current.with(key, value)?;
        self.store.set(SETTINGS_KEY, serde_json::to_value(next).map_err(StoreError::Json)?)?;
        *current = next;
        Ok(next)
    }

    /// Restores defaults. Refused unless the caller confirmed.
    pub fn reset_settings(&self, confirmed: bool) -> Result<Settings, SettingsError> {
        if !confirmed {
            return Err(SettingsError::NotConfirmed);
        }
        let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
        let defaults = Settings::default();
        self.store
            .set(SETTINGS_KEY, serde_json::to_value(defaults).map_err(StoreError::Json)?)?;
        *current = defaults;
        info!("Settings reset to defaults");
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::load(Arc::new(LocalStore::in_memory()))
    }

    #[test]
    fn test_defaults() {
        let s = store().current();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.font_size, FontSize::Medium);
        assert_eq!(s.contrast, Contrast::Normal);
    }

    #[test]
    fn test_update_changes_only_one_field() {
        let settings = store();
        let updated = settings.update_setting("theme", "dark").unwrap();
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.font_size, FontSize::Medium);
        assert_eq!(settings.current(), updated);
    }

    #[test]
    fn test_invalid_value_leaves_settings_untouched() {
        let settings = store();
        let err = settings.update_setting("font_size", "huge").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert_eq!(settings.current(), Settings::default());
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            store().update_setting("volume", "11"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let settings = store();
        settings.update_setting("contrast", "higher").unwrap();
        assert!(matches!(settings.reset_settings(false), Err(SettingsError::NotConfirmed)));
        assert_eq!(settings.current().contrast, Contrast::Higher);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let settings = store();
        settings.update_setting("theme", "dark").unwrap();
        settings.update_setting("font_size", "xlarge").unwrap();

        let once = settings.reset_settings(true).unwrap();
        let twice = settings.reset_settings(true).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice, Settings::default());
    }

    #[test]
    fn test_dark_theme_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let settings = SettingsStore::load(Arc::new(LocalStore::open(&path).unwrap()));
        settings.update_setting("theme", "Dark").unwrap();
        drop(settings);

        let reloaded = SettingsStore::load(Arc::new(LocalStore::open(&path).unwrap()));
        assert_eq!(reloaded.current().theme, Theme::Dark);
    }

    #[test]
    fn test_failed_write_does_not_resurface_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(LocalStore::open(&path).unwrap());
        let settings = SettingsStore::load(store.clone());

        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();
        assert!(matches!(
            settings.update_setting("theme", "dark"),
            Err(SettingsError::Store(_))
        ));
        assert_eq!(settings.current().theme, Theme::Light);

        std::fs::remove_dir_all(&path).unwrap();
        store.set("ai-questions:1", serde_json::json!([1])).unwrap();
        drop(settings);

        let reloaded = SettingsStore::load(Arc::new(LocalStore::open(&path).unwrap()));
        assert_eq!(reloaded.current().theme, Theme::Light);
    }
}
