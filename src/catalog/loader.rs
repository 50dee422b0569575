//! Catalog loading with cache fallback

use super::cache::RecipeCache;
use super::types::parse_document;
use super::Catalog;
use crate::{CookeaseError, Result};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Where the recipe document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// Interpret `http://` and `https://` locations as URLs, anything else as a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// How the loaded catalog was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOrigin {
    /// Fresh from the source
    Source,
    /// Source failed; served from the local cache
    Cache { age_minutes: i64 },
    /// Source failed and no fresh cache exists; the catalog is empty
    Unavailable { reason: String },
}

/// Result of a load attempt. Loading never fails outright.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub origin: CatalogOrigin,
}

impl LoadOutcome {
    pub fn is_offline(&self) -> bool {
        !matches!(self.origin, CatalogOrigin::Source)
    }
}

pub struct CatalogLoader {
    source: CatalogSource,
    cache: Option<RecipeCache>,
    max_cache_age: Duration,
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            cache: None,
            max_cache_age: Duration::hours(24),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_cache(mut self, cache: RecipeCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_max_cache_age(mut self, max_age: Duration) -> Self {
        self.max_cache_age = max_age;
        self
    }

    /// Load the catalog, refreshing the cache on success and falling back to
    /// it on failure.
    pub async fn load(&self) -> LoadOutcome {
        match self.fetch().await {
            Ok(catalog) => {
                info!("Loaded {} recipes from {}", catalog.len(), self.source);
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.store(catalog.recipes(), Utc::now()) {
                        warn!("Failed to cache recipes: {}", e);
                    }
                }
                LoadOutcome {
                    catalog,
                    origin: CatalogOrigin::Source,
                }
            }
            Err(e) => {
                error!("Error loading recipes from {}: {}", self.source, e);
                self.fallback(e)
            }
        }
    }

    fn fallback(&self, cause: CookeaseError) -> LoadOutcome {
        let now = Utc::now();
        let fresh = self
            .cache
            .as_ref()
            .and_then(|cache| cache.load_fresh(now, self.max_cache_age));

        match fresh {
            Some(snapshot) => {
                let age_minutes = snapshot.age(now).num_minutes();
                info!(
                    "Showing {} cached recipes (offline mode, {} minutes old)",
                    snapshot.recipes.len(),
                    age_minutes
                );
                LoadOutcome {
                    catalog: Catalog::new(snapshot.recipes),
                    origin: CatalogOrigin::Cache { age_minutes },
                }
            }
            None => LoadOutcome {
                catalog: Catalog::default(),
                origin: CatalogOrigin::Unavailable {
                    reason: cause.to_string(),
                },
            },
        }
    }

    async fn fetch(&self) -> Result<Catalog> {
        let document: Value = match &self.source {
            CatalogSource::File(path) => {
                let data = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&data)?
            }
            CatalogSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(CookeaseError::CatalogError(format!(
                        "Failed to load recipes: {}",
                        response.status()
                    )));
                }
                response.json().await?
            }
        };

        Ok(Catalog::new(parse_document(&document)))
    }
}
