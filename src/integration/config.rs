//! Configuration for the cooking session
//!
//! Provides centralized configuration for all components. Every field has a
//! default, so a TOML file only needs the values it overrides.

use crate::storage::default_data_dir;
use crate::{CookeaseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest delay any scheduled task may use (one day)
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1_000;

/// Oldest cache age that can be configured (one year)
pub const MAX_CACHE_AGE_HOURS: u64 = 24 * 365;

/// Configuration for the complete assistant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Recipe document: a file path or an http(s) URL
    pub catalog: String,

    /// Where the recipe cache and preferences live
    pub data_dir: PathBuf,

    /// Recipe to select when the session starts
    pub initial_recipe: Option<String>,

    /// Timer duration before anything sets it
    pub default_timer_secs: u64,

    /// Identical commands inside this window are dropped
    pub debounce_ms: u64,

    /// Unknown commands in a row before the guide is shown
    pub unknown_limit: u32,

    /// How long a timer offer waits for yes or no
    pub confirmation_timeout_ms: u64,

    /// Delay between rendering a step and offering a timer for it
    pub timer_offer_delay_ms: u64,

    /// Shortest detected cook time worth an offer
    pub min_suggest_secs: u64,

    /// Assumed reading rate for word highlighting
    pub words_per_minute: u32,

    /// Pause between the end of speech and resumed listening
    pub resume_grace_ms: u64,

    /// Pause before restarting a recognizer that stopped on its own
    pub restart_delay_ms: u64,

    /// Delay before the first-visit guide appears
    pub first_visit_guide_delay_ms: u64,

    /// Cached catalogs older than this are not used
    pub cache_max_age_hours: u64,

    /// Whether to start listening as soon as the session starts
    pub enable_voice_input: bool,

    /// Whether to play the time-up tone on an audio device
    pub enable_tone: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            catalog: "recipe.json".to_string(),
            data_dir: default_data_dir(),
            initial_recipe: None,
            default_timer_secs: 15 * 60,
            debounce_ms: 2_000,
            unknown_limit: 3,
            confirmation_timeout_ms: 10_000,
            timer_offer_delay_ms: 1_000,
            min_suggest_secs: 30,
            words_per_minute: 150,
            resume_grace_ms: 500,
            restart_delay_ms: 1_000,
            first_visit_guide_delay_ms: 1_000,
            cache_max_age_hours: 24,
            enable_voice_input: true,
            enable_tone: true,
        }
    }
}

impl AssistantConfig {
    /// Load overrides from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            CookeaseError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| CookeaseError::ConfigError(e.to_string()))
    }

    /// Set the recipe source
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Select this recipe once the session starts
    pub fn with_initial_recipe(mut self, title: impl Into<String>) -> Self {
        self.initial_recipe = Some(title.into());
        self
    }

    /// Disable voice input (manual commands only)
    pub fn without_voice_input(mut self) -> Self {
        self.enable_voice_input = false;
        self
    }

    /// Disable the audible tone (terminal bell only)
    pub fn without_tone(mut self) -> Self {
        self.enable_tone = false;
        self
    }

    pub fn cache_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache_max_age_hours.min(MAX_CACHE_AGE_HOURS) as i64)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.catalog.trim().is_empty() {
            return Err(CookeaseError::ConfigError(
                "Recipe catalog source is required".to_string(),
            ));
        }

        if self.words_per_minute == 0 {
            return Err(CookeaseError::ConfigError(
                "words_per_minute must be positive".to_string(),
            ));
        }

        if self.unknown_limit == 0 {
            return Err(CookeaseError::ConfigError(
                "unknown_limit must be positive".to_string(),
            ));
        }

        if self.confirmation_timeout_ms == 0 {
            return Err(CookeaseError::ConfigError(
                "confirmation_timeout_ms must be positive".to_string(),
            ));
        }

        let delays = [
            ("debounce_ms", self.debounce_ms),
            ("confirmation_timeout_ms", self.confirmation_timeout_ms),
            ("timer_offer_delay_ms", self.timer_offer_delay_ms),
            ("resume_grace_ms", self.resume_grace_ms),
            ("restart_delay_ms", self.restart_delay_ms),
            ("first_visit_guide_delay_ms", self.first_visit_guide_delay_ms),
        ];
        if let Some((name, _)) = delays.iter().find(|(_, ms)| *ms > MAX_DELAY_MS) {
            return Err(CookeaseError::ConfigError(format!(
                "{} must be at most {} ms",
                name, MAX_DELAY_MS
            )));
        }

        if self.cache_max_age_hours > MAX_CACHE_AGE_HOURS {
            return Err(CookeaseError::ConfigError(format!(
                "cache_max_age_hours must be at most {}",
                MAX_CACHE_AGE_HOURS
            )));
        }

        Ok(())
    }
}
