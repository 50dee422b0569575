//! Recipe catalog
//!
//! Loads recipe records from a static source, normalizes them into one
//! canonical schema, and falls back to a locally persisted copy when the
//! source is unavailable.

pub mod cache;
pub mod loader;
pub mod types;

pub use cache::{CachedCatalog, RecipeCache};
pub use loader::{CatalogLoader, CatalogOrigin, CatalogSource, LoadOutcome};
pub use types::{parse_document, RawRecipe, Recipe, DURATION_NOT_SPECIFIED};

/// The loaded, immutable recipe list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Case-insensitive title lookup: exact match first, then substring
    /// containment. An empty query never matches.
    pub fn find_by_title(&self, query: &str) -> Option<usize> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        self.recipes
            .iter()
            .position(|r| r.title.trim().to_lowercase() == q)
            .or_else(|| {
                self.recipes
                    .iter()
                    .position(|r| r.title.to_lowercase().contains(&q))
            })
    }

    /// Indices of recipes with an ingredient containing `term`, in catalog order
    pub fn search_by_ingredient(&self, term: &str) -> Vec<usize> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        self.recipes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.has_ingredient(term))
            .map(|(i, _)| i)
            .collect()
    }

    /// Free-text filter over titles and ingredients; an empty term keeps everything
    pub fn filter(&self, term: &str) -> Vec<&Recipe> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.recipes.iter().collect();
        }

        self.recipes
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&term) || r.has_ingredient(&term))
            .collect()
    }
}
