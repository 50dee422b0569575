//! Plain-text rendering for the terminal front-end

use crate::catalog::Recipe;
use crate::cooking::{TimerPhase, TimerSnapshot};
use crate::integration::{Effect, SessionSnapshot};
use crate::speech::SpeechAction;
use std::fmt::Write;

/// Shown when the command guide opens
pub const GUIDE_TEXT: &str = "\
Voice commands
  Recipes:    \"show <recipe>\", \"search with <ingredient>\", or just the recipe name
  Steps:      \"next step\", \"previous step\", \"repeat step\", \"ingredients\"
  Timer:      \"start timer\", \"pause timer\", \"reset timer\", \"show timer\",
              \"set timer for <N> minutes\"
  Help:       \"help\"
Console
  /listen /stop          voice input on or off
  /start /pause /reset   timer buttons
  /set <min> <sec>       timer inputs, /preset <min> for presets
  /timer                 toggle the timer display
  /select <n>            choose recipe card n
  /guide /hide-guide /never-guide
  /status /quit";

/// One-line card for recipe lists
pub fn recipe_card(number: usize, recipe: &Recipe) -> String {
    format!(
        "{:>3}. {}  ({}, {} ingredients)",
        number,
        recipe.title,
        recipe.duration_label(),
        recipe.ingredients.len()
    )
}

/// Full recipe page
pub fn recipe_detail(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.title);
    let _ = writeln!(out, "{}", "=".repeat(recipe.title.chars().count()));
    let _ = writeln!(out, "Time: {}", recipe.duration_label());
    if let Some(servings) = &recipe.servings {
        let _ = writeln!(out, "Servings: {}", servings);
    }
    if let Some(difficulty) = &recipe.difficulty {
        let _ = writeln!(out, "Difficulty: {}", difficulty);
    }

    let _ = writeln!(out, "\nIngredients");
    if recipe.ingredients.is_empty() {
        let _ = writeln!(out, "  - No ingredients listed");
    }
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", ingredient);
    }

    let _ = writeln!(out, "\nInstructions");
    if recipe.instructions.is_empty() {
        let _ = writeln!(out, "  No instructions available");
    }
    for (i, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }

    if let Some(notes) = &recipe.notes {
        let _ = writeln!(out, "\nNotes\n  {}", notes);
    }
    out
}

/// Whether a timer refresh is worth a line: phase changes, whole minutes,
/// and the final ten seconds
pub fn timer_line_due(previous: Option<&TimerSnapshot>, next: &TimerSnapshot) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    if previous.phase != next.phase || previous.total_secs != next.total_secs {
        return true;
    }
    if previous.remaining_secs == next.remaining_secs {
        return false;
    }
    next.phase == TimerPhase::Running
        && (next.remaining_secs % 60 == 0 || next.remaining_secs <= 10)
}

pub fn timer_line(snapshot: &TimerSnapshot) -> String {
    format!(
        "[timer] {}  {}  ({:.0}%)",
        snapshot.display(),
        snapshot.status_label(),
        snapshot.progress() * 100.0
    )
}

/// Console line for an effect. Timer refreshes are filtered by the caller.
pub fn effect_line(effect: &Effect) -> Option<String> {
    match effect {
        Effect::Speech(SpeechAction::Speak { text, .. }) => Some(format!("[say] {}", text)),
        Effect::Speech(_) => None,
        Effect::TimerDisplay(snapshot) => Some(timer_line(snapshot)),
        Effect::TimerVisible(true) => Some("[timer] shown".to_string()),
        Effect::TimerVisible(false) => Some("[timer] hidden".to_string()),
        Effect::Notify(text) => Some(format!("[notice] {}", text)),
        Effect::Vibrate(_) => None,
        Effect::PlayTone => None,
        Effect::GuideVisible(true) => Some(GUIDE_TEXT.to_string()),
        Effect::GuideVisible(false) => None,
        Effect::RecipeSelected { title, .. } => Some(format!("Cooking: {}", title)),
        Effect::SelectionCleared => Some("No recipe selected".to_string()),
        Effect::InstructionDisplay {
            step,
            total_steps,
            text,
        } => Some(match step {
            Some(step) => format!("Step {} of {}: {}", step + 1, total_steps, text),
            None => text.clone(),
        }),
        Effect::Status(text) => Some(format!("[{}]", text)),
    }
}

/// Multi-line session status for `/status`
pub fn status_report(snapshot: &SessionSnapshot) -> String {
    let recipe = snapshot.recipe_title.as_deref().unwrap_or("none");
    let step = match snapshot.current_instruction {
        Some(i) => format!("{} of {}", i + 1, snapshot.total_steps),
        None => "not started".to_string(),
    };
    let voice = if snapshot.voice_disabled {
        "unavailable"
    } else {
        snapshot.speech.label()
    };

    let mut out = format!(
        "Recipe: {}\nStep: {}\nTimer: {} ({})\nVoice: {}",
        recipe,
        step,
        snapshot.timer.display(),
        snapshot.timer.status_label(),
        voice
    );
    if let Some(seconds) = snapshot.awaiting_confirmation {
        let _ = write!(out, "\nWaiting for yes/no on a {}s timer", seconds);
    }
    out
}
