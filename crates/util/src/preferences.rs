//! User preference persistence for the Exoscope CLI/TUI.
//!
//! A tiny JSON-backed store for settings the user changes from the TUI or sets
//! by hand: the page size of the results table, the export directory, the
//! default model and the theme. The file lives in the standard configuration
//! directory (`~/.config/exoscope/preferences.json` on most platforms) and is
//! safe to read/write from multiple threads thanks to the internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config_root, expand_tilde};

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "EXOSCOPE_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values. Every field is optional so older files keep
/// loading as new settings appear.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Rows per page in the results table.
    pub entries_per_page: Option<usize>,
    /// Where `exoplanet_predictions.csv` is written. `~` is expanded.
    pub export_dir: Option<String>,
    /// Model used when a command does not name one.
    pub default_model: Option<String>,
    /// Canonical identifier of the theme selected via the TUI.
    pub preferred_theme: Option<String>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Load the store from `EXOSCOPE_PREFERENCES_PATH` or the default config
    /// directory path.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::load_from(default_preferences_path())
    }

    /// Load the store from an explicit path. A missing file yields defaults.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let payload = load_payload(&path)?;
        debug!(path = %path.display(), "preferences loaded");
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> PreferencesPayload {
        self.lock().clone()
    }

    pub fn entries_per_page(&self) -> Option<usize> {
        self.lock().entries_per_page.filter(|n| *n > 0)
    }

    pub fn set_entries_per_page(&self, entries_per_page: usize) -> Result<(), PreferencesError> {
        self.update(|payload| payload.entries_per_page = Some(entries_per_page))
    }

    /// Export directory with `~` expanded, if one was saved.
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.lock()
            .export_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(expand_tilde)
    }

    pub fn default_model(&self) -> Option<String> {
        self.lock().default_model.clone()
    }

    /// Returns the canonical identifier of the preferred theme, if one was saved.
    pub fn preferred_theme(&self) -> Option<String> {
        self.lock().preferred_theme.clone()
    }

    /// Persist a new preferred theme identifier.
    pub fn set_preferred_theme(&self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        self.update(|payload| payload.preferred_theme = theme_id)
    }

    fn update(&self, apply: impl FnOnce(&mut PreferencesPayload)) -> Result<(), PreferencesError> {
        let mut payload = self.lock();
        apply(&mut payload);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PreferencesPayload> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_root().join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let prefs = UserPreferences::load_from(dir.path().join("preferences.json")).unwrap();
        assert_eq!(prefs.snapshot(), PreferencesPayload::default());
        assert_eq!(prefs.entries_per_page(), None);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        let prefs = UserPreferences::load_from(&path).unwrap();
        assert_eq!(prefs.snapshot(), PreferencesPayload::default());
    }

    #[test]
    fn updates_persist_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let prefs = UserPreferences::load_from(&path).unwrap();
        prefs.set_entries_per_page(50).unwrap();
        prefs.set_preferred_theme(Some("aurora".into())).unwrap();

        let reloaded = UserPreferences::load_from(&path).unwrap();
        assert_eq!(reloaded.entries_per_page(), Some(50));
        assert_eq!(reloaded.preferred_theme().as_deref(), Some("aurora"));
    }

    #[test]
    fn partial_files_keep_other_fields_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"default_model":"random_forest","entries_per_page":0}"#).unwrap();
        let prefs = UserPreferences::load_from(&path).unwrap();
        assert_eq!(prefs.default_model().as_deref(), Some("random_forest"));
        assert_eq!(prefs.entries_per_page(), None, "zero is not a usable page size");
        assert_eq!(prefs.export_dir(), None);
    }

    #[test]
    fn env_override_selects_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"export_dir":"exports"}"#).unwrap();
        temp_env::with_var(PREFERENCES_PATH_ENV, Some(path.to_str().unwrap()), || {
            let prefs = UserPreferences::new().unwrap();
            assert_eq!(prefs.path(), path.as_path());
            assert_eq!(prefs.export_dir(), Some(PathBuf::from("exports")));
        });
    }

    #[test]
    fn ephemeral_store_never_writes() {
        let prefs = UserPreferences::ephemeral();
        prefs.set_entries_per_page(25).unwrap();
        assert_eq!(prefs.entries_per_page(), Some(25));
        assert_eq!(prefs.path(), Path::new(""));
    }
}
