use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Shown when a recipe carries no duration field
pub const DURATION_NOT_SPECIFIED: &str = "Not specified";

/// A normalized recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub minimum_duration: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            minimum_duration: None,
            servings: None,
            difficulty: None,
            notes: None,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.minimum_duration = Some(duration.into());
        self
    }

    /// Duration label for cards and detail pages
    pub fn duration_label(&self) -> &str {
        self.minimum_duration
            .as_deref()
            .unwrap_or(DURATION_NOT_SPECIFIED)
    }

    /// Whether any ingredient contains `term` (case-insensitive)
    pub fn has_ingredient(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.ingredients
            .iter()
            .any(|ing| ing.to_lowercase().contains(&term))
    }

    /// Plain-text rendition used for sharing or copying a recipe
    pub fn share_text(&self) -> String {
        format!(
            "{}\n\nIngredients:\n{}\n\nInstructions:\n{}",
            self.title,
            self.ingredients.join("\n"),
            self.instructions.join("\n\n")
        )
    }
}

/// A recipe record as it appears in the source document.
///
/// Sources disagree on field names and types, so every field is kept as a raw
/// JSON value until [`RawRecipe::normalize`] produces the canonical [`Recipe`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecipe {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub ingredients: Option<Value>,
    #[serde(default)]
    pub instructions: Option<Value>,
    #[serde(default, rename = "minimumDuration")]
    pub minimum_duration_camel: Option<Value>,
    #[serde(default, rename = "minimum_duration")]
    pub minimum_duration_snake: Option<Value>,
    #[serde(default)]
    pub servings: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<Value>,
    #[serde(default)]
    pub notes: Option<Value>,
}

impl RawRecipe {
    /// Produce the canonical schema. Records without a usable title are dropped.
    pub fn normalize(self) -> Option<Recipe> {
        let title = self.title.as_ref().and_then(scalar_to_string)?;
        if title.trim().is_empty() {
            return None;
        }

        // camelCase wins when both spellings are present
        let minimum_duration = self
            .minimum_duration_camel
            .as_ref()
            .and_then(scalar_to_string)
            .or_else(|| self.minimum_duration_snake.as_ref().and_then(scalar_to_string));

        Some(Recipe {
            title,
            ingredients: self.ingredients.as_ref().map(string_list).unwrap_or_default(),
            instructions: self.instructions.as_ref().map(string_list).unwrap_or_default(),
            minimum_duration,
            servings: self.servings.as_ref().and_then(scalar_to_string),
            difficulty: self.difficulty.as_ref().and_then(scalar_to_string),
            notes: self.notes.as_ref().and_then(scalar_to_string),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Anything that isn't an array yields an empty list
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    }
}

/// Extract and normalize the recipe list from a catalog document.
///
/// Accepted shapes, in order: `{"food_recipes": [...]}`, `{"recipes": [...]}`,
/// a bare array, or any object whose first array-valued field holds records.
pub fn parse_document(document: &Value) -> Vec<Recipe> {
    let records = match document {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["food_recipes", "recipes"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .or_else(|| {
                map.iter().find_map(|(key, value)| {
                    let items = value.as_array()?;
                    debug!("Using recipe array from key: {}", key);
                    Some(items)
                })
            }),
        _ => None,
    };

    let Some(records) = records else {
        warn!("Catalog document contains no recipe array");
        return Vec::new();
    };

    let mut recipes = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<RawRecipe>(record.clone()) {
            Ok(raw) => match raw.normalize() {
                Some(recipe) => recipes.push(recipe),
                None => warn!("Skipping recipe record without a title"),
            },
            Err(e) => warn!("Skipping malformed recipe record: {}", e),
        }
    }
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_duration_is_normalized() {
        let doc = json!({
            "food_recipes": [
                { "title": "Tomato Soup", "minimum_duration": "30 mins" }
            ]
        });
        let recipes = parse_document(&doc);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].minimum_duration.as_deref(), Some("30 mins"));
    }

    #[test]
    fn test_camel_case_duration_wins() {
        let raw = RawRecipe {
            title: Some(json!("Rice Pilaf")),
            minimum_duration_camel: Some(json!("25 mins")),
            minimum_duration_snake: Some(json!("40 mins")),
            ..Default::default()
        };
        let recipe = raw.normalize().unwrap();
        assert_eq!(recipe.minimum_duration.as_deref(), Some("25 mins"));
    }

    #[test]
    fn test_document_shapes() {
        let bare = json!([{ "title": "A" }]);
        let recipes_key = json!({ "recipes": [{ "title": "B" }] });
        let other_key = json!({ "version": 2, "items": [{ "title": "C" }] });

        assert_eq!(parse_document(&bare)[0].title, "A");
        assert_eq!(parse_document(&recipes_key)[0].title, "B");
        assert_eq!(parse_document(&other_key)[0].title, "C");
        assert!(parse_document(&json!("nope")).is_empty());
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let doc = json!([{ "title": "Toast", "ingredients": "bread" }]);
        let recipe = &parse_document(&doc)[0];
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.duration_label(), DURATION_NOT_SPECIFIED);
    }

    #[test]
    fn test_untitled_records_are_dropped() {
        let doc = json!([{ "ingredients": ["salt"] }, { "title": "" }, { "title": "Kept" }]);
        let recipes = parse_document(&doc);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Kept");
    }

    #[test]
    fn test_numeric_fields_are_stringified() {
        let doc = json!([{ "title": "Stew", "servings": 4, "minimumDuration": 90 }]);
        let recipe = &parse_document(&doc)[0];
        assert_eq!(recipe.servings.as_deref(), Some("4"));
        assert_eq!(recipe.minimum_duration.as_deref(), Some("90"));
    }

    #[test]
    fn test_has_ingredient() {
        let recipe = Recipe::new("Rice Pilaf").with_ingredients(["Basmati Rice", "Onion"]);
        assert!(recipe.has_ingredient("rice"));
        assert!(!recipe.has_ingredient("garlic"));
    }

    #[test]
    fn test_share_text() {
        let recipe = Recipe::new("Toast")
            .with_ingredients(["bread", "butter"])
            .with_instructions(["Toast the bread.", "Spread butter."]);
        assert_eq!(
            recipe.share_text(),
            "Toast\n\nIngredients:\nbread\nbutter\n\nInstructions:\nToast the bread.\n\nSpread butter."
        );
    }
}
