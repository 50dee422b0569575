//! On-disk copy of the last successfully loaded catalog

use super::types::Recipe;
use crate::{CookeaseError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CACHE_FILE: &str = "recipes-cache.json";

/// Persisted catalog snapshot with the time it was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedCatalog {
    pub cached_at: DateTime<Utc>,
    pub recipes: Vec<Recipe>,
}

impl CachedCatalog {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.cached_at)
    }

    /// Fresh when strictly younger than `max_age`
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) < max_age
    }
}

/// JSON file store for [`CachedCatalog`]
#[derive(Debug, Clone)]
pub struct RecipeCache {
    path: PathBuf,
}

impl RecipeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file inside the given data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, recipes: &[Recipe], now: DateTime<Utc>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let snapshot = CachedCatalog {
            cached_at: now,
            recipes: recipes.to_vec(),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, data)?;
        debug!("Cached {} recipes at {:?}", recipes.len(), self.path);
        Ok(())
    }

    /// Read the snapshot; `Ok(None)` when no cache has been written yet
    pub fn load(&self) -> Result<Option<CachedCatalog>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| CookeaseError::CacheError(format!("corrupt cache file: {}", e)))
    }

    /// Snapshot younger than `max_age`, if any. Unreadable caches count as absent.
    pub fn load_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> Option<CachedCatalog> {
        match self.load() {
            Ok(Some(snapshot)) if snapshot.is_fresh(now, max_age) => Some(snapshot),
            Ok(Some(snapshot)) => {
                debug!("Recipe cache is stale ({} minutes old)", snapshot.age(now).num_minutes());
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring recipe cache: {}", e);
                None
            }
        }
    }
}
