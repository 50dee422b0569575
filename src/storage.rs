//! Persisted user preferences
//!
//! A small JSON file in the data directory. A missing or unreadable file
//! yields defaults, so a fresh install behaves like a first visit.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PREFERENCES_FILE: &str = "preferences.json";

/// Guide preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// "Never show again" was chosen on the command guide
    #[serde(default)]
    pub hide_guide: bool,
    /// The first-visit guide has been shown once
    #[serde(default)]
    pub first_visit_seen: bool,
}

/// Default data directory: `<platform data dir>/cookease`
pub fn default_data_dir() -> PathBuf {
    let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("cookease");
    dir
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from disk, falling back to defaults
    pub fn load(&self) -> Preferences {
        match fs::read_to_string(&self.path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences at {}: {}", self.path.display(), e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        }
    }

    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, data)?;
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(dir.path());
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(dir.path().join("nested"));
        let prefs = Preferences {
            hide_guide: true,
            first_visit_seen: true,
        };

        store.save(&prefs).unwrap();
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"hide_guide": true}"#).unwrap();
        assert_eq!(
            store.load(),
            Preferences {
                hide_guide: true,
                first_visit_seen: false
            }
        );
    }
}
