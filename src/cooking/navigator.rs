//! Instruction navigation over the loaded catalog
//!
//! The navigator holds an index into the [`Catalog`], never a copy of the
//! recipe. Every operation returns a [`NavOutcome`] describing what the
//! session should display and say.

use crate::catalog::Catalog;
use tracing::debug;

pub const NO_RECIPE_HINT: &str = "No recipe selected. Say \"show\" followed by a recipe name.";
pub const NO_RECIPE: &str = "No recipe selected.";
pub const RECIPE_NOT_FOUND: &str = "Recipe not found.";
pub const AT_LAST_STEP: &str = "You are at the last step.";
pub const AT_FIRST_STEP: &str = "You are at the first step.";
pub const NOTHING_TO_REPEAT: &str = "No instruction to repeat.";
pub const NO_INGREDIENTS: &str = "No ingredients listed.";
pub const READY_TO_START: &str = "Ready to start. Say \"next step\" to begin.";

/// What a navigation request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Selected {
        index: usize,
        title: String,
        total_steps: usize,
    },
    /// Render and speak this instruction
    Instruction {
        /// Zero-based
        step: usize,
        total_steps: usize,
        text: String,
    },
    Ingredients {
        title: String,
        list: Option<String>,
    },
    /// Nothing changed; speak the message
    Message(&'static str),
}

impl NavOutcome {
    /// Spoken response for this outcome
    pub fn speech(&self) -> String {
        match self {
            NavOutcome::Selected { title, .. } => format!(
                "Selected {}. Say \"next step\" to begin, or \"ingredients\" for the ingredient list.",
                title
            ),
            NavOutcome::Instruction { text, .. } => text.clone(),
            NavOutcome::Ingredients { title, list } => format!(
                "Ingredients for {}: {}",
                title,
                list.as_deref().unwrap_or(NO_INGREDIENTS)
            ),
            NavOutcome::Message(message) => (*message).to_string(),
        }
    }
}

/// Selected recipe and active instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigatorState {
    pub selected_recipe: Option<usize>,
    /// `None` until the first "next step"
    pub current_instruction: Option<usize>,
}

#[derive(Debug, Default)]
pub struct InstructionNavigator {
    state: NavigatorState,
}

impl InstructionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn selected_recipe(&self) -> Option<usize> {
        self.state.selected_recipe
    }

    pub fn current_instruction(&self) -> Option<usize> {
        self.state.current_instruction
    }

    pub fn clear(&mut self) {
        self.state = NavigatorState::default();
    }

    pub fn select_recipe(&mut self, catalog: &Catalog, index: usize) -> NavOutcome {
        let Some(recipe) = catalog.get(index) else {
            debug!("Recipe index {} out of bounds", index);
            self.clear();
            return NavOutcome::Message(RECIPE_NOT_FOUND);
        };

        self.state = NavigatorState {
            selected_recipe: Some(index),
            current_instruction: None,
        };
        debug!("Selected recipe {}: {}", index, recipe.title);

        NavOutcome::Selected {
            index,
            title: recipe.title.clone(),
            total_steps: recipe.instructions.len(),
        }
    }

    pub fn next(&mut self, catalog: &Catalog) -> NavOutcome {
        let Some(instructions) = self.instructions(catalog) else {
            return NavOutcome::Message(NO_RECIPE_HINT);
        };

        let next = self.state.current_instruction.map_or(0, |i| i + 1);
        if next >= instructions.len() {
            return NavOutcome::Message(AT_LAST_STEP);
        }

        self.state.current_instruction = Some(next);
        self.instruction_outcome(instructions, next)
    }

    pub fn previous(&mut self, catalog: &Catalog) -> NavOutcome {
        let Some(instructions) = self.instructions(catalog) else {
            return NavOutcome::Message(NO_RECIPE);
        };

        match self.state.current_instruction {
            Some(current) if current > 0 => {
                self.state.current_instruction = Some(current - 1);
                self.instruction_outcome(instructions, current - 1)
            }
            _ => NavOutcome::Message(AT_FIRST_STEP),
        }
    }

    pub fn repeat(&self, catalog: &Catalog) -> NavOutcome {
        match (self.instructions(catalog), self.state.current_instruction) {
            (Some(instructions), Some(current)) if current < instructions.len() => {
                self.instruction_outcome(instructions, current)
            }
            _ => NavOutcome::Message(NOTHING_TO_REPEAT),
        }
    }

    pub fn list_ingredients(&self, catalog: &Catalog) -> NavOutcome {
        let Some(recipe) = self.state.selected_recipe.and_then(|i| catalog.get(i)) else {
            return NavOutcome::Message(NO_RECIPE_HINT);
        };

        let list = (!recipe.ingredients.is_empty()).then(|| recipe.ingredients.join(", "));
        NavOutcome::Ingredients {
            title: recipe.title.clone(),
            list,
        }
    }

    fn instructions<'a>(&self, catalog: &'a Catalog) -> Option<&'a [String]> {
        self.state
            .selected_recipe
            .and_then(|i| catalog.get(i))
            .map(|r| r.instructions.as_slice())
    }

    fn instruction_outcome(&self, instructions: &[String], step: usize) -> NavOutcome {
        NavOutcome::Instruction {
            step,
            total_steps: instructions.len(),
            text: instructions[step].clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Recipe;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Recipe::new("Tomato Soup")
                .with_ingredients(["tomatoes", "cream"])
                .with_instructions(["Chop.", "Simmer for 10-20 minutes.", "Blend."]),
            Recipe::new("Plain Water"),
        ])
    }

    #[test]
    fn test_select_invalid_clears_state() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        nav.select_recipe(&catalog, 0);
        nav.next(&catalog);

        assert_eq!(nav.select_recipe(&catalog, 7), NavOutcome::Message(RECIPE_NOT_FOUND));
        assert_eq!(nav.state(), NavigatorState::default());
    }

    #[test]
    fn test_select_resets_instruction() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        nav.select_recipe(&catalog, 0);
        nav.next(&catalog);
        let outcome = nav.select_recipe(&catalog, 0);

        assert!(matches!(outcome, NavOutcome::Selected { total_steps: 3, .. }));
        assert!(outcome.speech().starts_with("Selected Tomato Soup."));
        assert_eq!(nav.current_instruction(), None);
    }

    #[test]
    fn test_next_stops_at_last_step() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        nav.select_recipe(&catalog, 0);
        assert!(matches!(nav.next(&catalog), NavOutcome::Instruction { step: 0, .. }));

        // From the first step, N-1 more calls land on the last one
        for _ in 0..2 {
            nav.next(&catalog);
        }
        assert_eq!(nav.current_instruction(), Some(2));
        assert_eq!(nav.next(&catalog), NavOutcome::Message(AT_LAST_STEP));
        assert_eq!(nav.current_instruction(), Some(2));
    }

    #[test]
    fn test_previous_boundary() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        assert_eq!(nav.previous(&catalog), NavOutcome::Message(NO_RECIPE));

        nav.select_recipe(&catalog, 0);
        assert_eq!(nav.previous(&catalog), NavOutcome::Message(AT_FIRST_STEP));
        nav.next(&catalog);
        nav.next(&catalog);
        assert!(matches!(nav.previous(&catalog), NavOutcome::Instruction { step: 0, .. }));
        assert_eq!(nav.previous(&catalog), NavOutcome::Message(AT_FIRST_STEP));
    }

    #[test]
    fn test_repeat() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        nav.select_recipe(&catalog, 0);
        assert_eq!(nav.repeat(&catalog), NavOutcome::Message(NOTHING_TO_REPEAT));

        nav.next(&catalog);
        assert_eq!(nav.repeat(&catalog).speech(), "Chop.");
        assert_eq!(nav.current_instruction(), Some(0));
    }

    #[test]
    fn test_ingredients() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        assert_eq!(nav.list_ingredients(&catalog), NavOutcome::Message(NO_RECIPE_HINT));

        nav.select_recipe(&catalog, 0);
        assert_eq!(
            nav.list_ingredients(&catalog).speech(),
            "Ingredients for Tomato Soup: tomatoes, cream"
        );

        nav.select_recipe(&catalog, 1);
        assert_eq!(
            nav.list_ingredients(&catalog).speech(),
            "Ingredients for Plain Water: No ingredients listed."
        );
    }

    #[test]
    fn test_recipe_without_instructions() {
        let catalog = catalog();
        let mut nav = InstructionNavigator::new();
        nav.select_recipe(&catalog, 1);
        assert_eq!(nav.next(&catalog), NavOutcome::Message(AT_LAST_STEP));
        assert_eq!(nav.current_instruction(), None);
    }
}
