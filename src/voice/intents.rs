//! Ordered intent table for voice commands
//!
//! Rules are evaluated in table order and the first match wins. The table is
//! plain data so that callers (and tests) can enumerate it.

use crate::catalog::Catalog;
use regex::Regex;
use std::sync::LazyLock;

static SET_TIMER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"set timer (?:for )?(\d+)(?:\s*(?:minutes?|mins?))?").expect("valid regex")
});

static SELECT_RECIPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:show|open|display|find|load)\s+(?:the\s+)?(?:recipe\s+)?(.+)$")
        .expect("valid regex")
});

/// A selection remainder that reads as an ingredient filter instead of a title
static CONNECTOR_LED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:recipes?\s+)?(?:with|containing|using)\b").expect("valid regex")
});

static SEARCH_INGREDIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:search|find|show)(?:\s+for)?(?:\s+the)?(?:\s+recipes?)?(?:\s+(?:with|containing|using))?\s+([a-z0-9\s'-]+)$",
    )
    .expect("valid regex")
});

/// A recognized command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StartTimer,
    PauseTimer,
    ResetTimer,
    ToggleTimerDisplay,
    SetTimer { minutes: u64 },
    NextStep,
    PreviousStep,
    RepeatStep,
    ListIngredients,
    /// Leading-verb selection; `index` is `None` when no title matched
    SelectRecipe { query: String, index: Option<usize> },
    /// Catalog indices whose ingredients contain `terms`
    SearchIngredient { terms: String, matches: Vec<usize> },
    /// The whole command is a recipe title
    SelectTitle { index: usize },
    ShowGuide,
}

pub type Matcher = fn(&str, &Catalog) -> Option<Intent>;

/// One entry of the intent table
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    pub matcher: Matcher,
}

pub static INTENT_RULES: &[IntentRule] = &[
    IntentRule { name: "start-timer", matcher: match_start_timer },
    IntentRule { name: "pause-timer", matcher: match_pause_timer },
    IntentRule { name: "reset-timer", matcher: match_reset_timer },
    IntentRule { name: "toggle-timer", matcher: match_toggle_timer },
    IntentRule { name: "set-timer", matcher: match_set_timer },
    IntentRule { name: "next-step", matcher: match_next },
    IntentRule { name: "previous-step", matcher: match_previous },
    IntentRule { name: "repeat-step", matcher: match_repeat },
    IntentRule { name: "ingredients", matcher: match_ingredients },
    IntentRule { name: "select-recipe", matcher: match_select_recipe },
    IntentRule { name: "search-ingredient", matcher: match_search_ingredient },
    IntentRule { name: "bare-title", matcher: match_bare_title },
    IntentRule { name: "help", matcher: match_help },
];

/// First matching rule for a normalized command
pub fn match_intent(command: &str, catalog: &Catalog) -> Option<(&'static str, Intent)> {
    INTENT_RULES
        .iter()
        .find_map(|rule| (rule.matcher)(command, catalog).map(|intent| (rule.name, intent)))
}

fn match_start_timer(command: &str, _: &Catalog) -> Option<Intent> {
    (command.contains("start timer") || command.contains("begin timer")).then_some(Intent::StartTimer)
}

fn match_pause_timer(command: &str, _: &Catalog) -> Option<Intent> {
    (command.contains("stop timer") || command.contains("pause timer")).then_some(Intent::PauseTimer)
}

fn match_reset_timer(command: &str, _: &Catalog) -> Option<Intent> {
    command.contains("reset timer").then_some(Intent::ResetTimer)
}

fn match_toggle_timer(command: &str, _: &Catalog) -> Option<Intent> {
    command.contains("show timer").then_some(Intent::ToggleTimerDisplay)
}

fn match_set_timer(command: &str, _: &Catalog) -> Option<Intent> {
    let caps = SET_TIMER.captures(command)?;
    let minutes = caps[1].parse().ok()?;
    Some(Intent::SetTimer { minutes })
}

fn match_next(command: &str, _: &Catalog) -> Option<Intent> {
    matches!(command, "next step" | "next").then_some(Intent::NextStep)
}

fn match_previous(command: &str, _: &Catalog) -> Option<Intent> {
    matches!(command, "previous step" | "previous" | "back").then_some(Intent::PreviousStep)
}

fn match_repeat(command: &str, _: &Catalog) -> Option<Intent> {
    matches!(command, "repeat step" | "repeat").then_some(Intent::RepeatStep)
}

fn match_ingredients(command: &str, _: &Catalog) -> Option<Intent> {
    (command == "ingredients" || command.contains("show ingredients"))
        .then_some(Intent::ListIngredients)
}

fn match_select_recipe(command: &str, catalog: &Catalog) -> Option<Intent> {
    let caps = SELECT_RECIPE.captures(command)?;
    let query = caps[1].trim();
    if CONNECTOR_LED.is_match(query) {
        // Only a title that itself starts with the connector phrase keeps it
        // a selection; otherwise this is an ingredient search
        let index = catalog
            .recipes()
            .iter()
            .position(|r| r.title.trim().to_lowercase().starts_with(query))?;
        return Some(Intent::SelectRecipe {
            query: query.to_string(),
            index: Some(index),
        });
    }

    Some(Intent::SelectRecipe {
        query: query.to_string(),
        index: catalog.find_by_title(query),
    })
}

fn match_search_ingredient(command: &str, catalog: &Catalog) -> Option<Intent> {
    let caps = SEARCH_INGREDIENT.captures(command)?;
    let terms = caps[1].trim();
    if terms.is_empty() {
        return None;
    }

    Some(Intent::SearchIngredient {
        terms: terms.to_string(),
        matches: catalog.search_by_ingredient(terms),
    })
}

fn match_bare_title(command: &str, catalog: &Catalog) -> Option<Intent> {
    catalog
        .find_by_title(command)
        .map(|index| Intent::SelectTitle { index })
}

fn match_help(command: &str, _: &Catalog) -> Option<Intent> {
    ["help", "guide", "commands"]
        .iter()
        .any(|word| command.contains(word))
        .then_some(Intent::ShowGuide)
}
