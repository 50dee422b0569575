//! The cooking session
//!
//! One [`CookingSession`] owns every piece of mutable state: the catalog,
//! navigator, timer, speech driver, command tracker and the deferred task
//! scheduler. It runs on a millisecond session clock supplied by the caller,
//! so the whole voice flow can be driven deterministically.
//!
//! Inputs arrive as [`SessionCommand`]s; outputs leave as [`Effect`]s that
//! the front-end drains and carries out.

use crate::catalog::Catalog;
use crate::cooking::navigator::{NavOutcome, READY_TO_START, RECIPE_NOT_FOUND};
use crate::cooking::{CookingTimer, InstructionNavigator, TimerAlert, TimerSnapshot};
use crate::integration::config::AssistantConfig;
use crate::speech::{RecognitionError, SpeechAction, SpeechDriver, SpeechState};
use crate::storage::{PreferenceStore, Preferences};
use crate::utils::scheduler::{Scheduler, TaskId};
use crate::voice::confirmation::{self, PendingConfirmation, Reply};
use crate::voice::cook_time::{offer_minutes, suggest_timer};
use crate::voice::{
    classify_reply, match_intent, normalize_transcript, CommandTracker, Intent, GUIDE_HINT,
    UNKNOWN_COMMAND,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Deferred work owned by the session scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTask {
    TimerTick,
    HighlightWord { utterance: Uuid, index: usize },
    ResumeListening,
    RestartRecognition,
    /// Speak the timer offer for a freshly rendered step
    OfferTimer { seconds: u64 },
    ConfirmationTimeout,
    ShowGuide,
}

/// Inputs from the front-end: user controls, recognizer and synthesizer
/// callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Recognizer result
    Transcript { text: String, is_final: bool },

    /// Typed or button-driven command; never treated as a yes/no answer
    ManualCommand(String),

    /// Synthesizer finished (or gave up on) an utterance
    UtteranceFinished(Uuid),

    RecognitionStarted,
    RecognitionEnded,
    RecognitionError(RecognitionError),

    StartListening,
    StopListening,

    /// A recipe card was chosen
    SelectRecipe(usize),

    /// Minute and second input fields, clamped before use
    SetTimer { minutes: i64, seconds: i64 },
    PresetTimer { minutes: i64 },
    StartTimer,
    PauseTimer,
    ResetTimer,
    ToggleTimerDisplay,

    ShowGuide,
    HideGuide,
    /// Hide the guide and never show it on first visit again
    NeverShowGuide,
    /// Hide the guide and turn listening on
    StartListeningFromGuide,
}

/// Outputs for the front-end
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Speech(SpeechAction),
    TimerDisplay(TimerSnapshot),
    TimerVisible(bool),
    Notify(String),
    /// Vibration pattern in milliseconds
    Vibrate(Vec<u64>),
    PlayTone,
    GuideVisible(bool),
    RecipeSelected { index: usize, title: String },
    SelectionCleared,
    /// `step` is `None` before the first instruction
    InstructionDisplay {
        step: Option<usize>,
        total_steps: usize,
        text: String,
    },
    /// Short status line, e.g. listening state
    Status(String),
}

/// Read-only view of the session for displays
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub now_ms: u64,
    pub recipe_count: usize,
    pub selected_recipe: Option<usize>,
    pub recipe_title: Option<String>,
    pub current_instruction: Option<usize>,
    pub total_steps: usize,
    pub timer: TimerSnapshot,
    pub timer_visible: bool,
    pub speech: SpeechState,
    pub voice_disabled: bool,
    pub guide_visible: bool,
    /// Seconds offered by a pending timer confirmation
    pub awaiting_confirmation: Option<u64>,
    pub consecutive_unknown: u32,
}

pub struct CookingSession {
    config: AssistantConfig,
    catalog: Catalog,
    navigator: InstructionNavigator,
    timer: CookingTimer,
    tracker: CommandTracker,
    speech: SpeechDriver,
    scheduler: Scheduler<SessionTask>,
    /// Scheduled but not yet spoken offer
    pending_offer: Option<TaskId>,
    confirmation: Option<PendingConfirmation>,
    preferences: Preferences,
    preference_store: Option<PreferenceStore>,
    guide_visible: bool,
    timer_visible: bool,
    now_ms: u64,
    effects: Vec<Effect>,
}

impl CookingSession {
    pub fn new(config: AssistantConfig, catalog: Catalog) -> Self {
        Self {
            navigator: InstructionNavigator::new(),
            timer: CookingTimer::new(config.default_timer_secs),
            tracker: CommandTracker::new(config.debounce_ms, config.unknown_limit),
            speech: SpeechDriver::new(
                config.words_per_minute,
                config.resume_grace_ms,
                config.restart_delay_ms,
            ),
            scheduler: Scheduler::new(),
            pending_offer: None,
            confirmation: None,
            preferences: Preferences::default(),
            preference_store: None,
            guide_visible: false,
            timer_visible: false,
            now_ms: 0,
            effects: Vec::new(),
            config,
            catalog,
        }
    }

    /// Load and persist guide preferences through `store`
    pub fn with_preference_store(mut self, store: PreferenceStore) -> Self {
        self.preferences = store.load();
        self.preference_store = Some(store);
        self
    }

    /// Initial displays, first-visit guide, initial recipe, and voice input
    pub fn start(&mut self) {
        info!("Session started with {} recipes", self.catalog.len());
        self.effects.push(Effect::TimerDisplay(self.timer.snapshot()));

        if !self.preferences.hide_guide && !self.preferences.first_visit_seen {
            self.scheduler.schedule_once(
                self.now_ms,
                self.config.first_visit_guide_delay_ms,
                SessionTask::ShowGuide,
            );
            self.preferences.first_visit_seen = true;
            self.save_preferences();
        }

        if let Some(title) = self.config.initial_recipe.clone() {
            match self.catalog.find_by_title(&title) {
                Some(index) => {
                    let outcome = self.navigator.select_recipe(&self.catalog, index);
                    self.render(outcome);
                }
                None => {
                    self.navigator.clear();
                    self.effects.push(Effect::SelectionCleared);
                    self.speak(&format!("I couldn't find a recipe named {}.", title));
                }
            }
        }

        if self.config.enable_voice_input {
            self.start_listening();
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn navigator(&self) -> &InstructionNavigator {
        &self.navigator
    }

    pub fn timer(&self) -> &CookingTimer {
        &self.timer
    }

    pub fn speech_state(&self) -> SpeechState {
        self.speech.state()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn pending_confirmation(&self) -> Option<PendingConfirmation> {
        self.confirmation
    }

    pub fn consecutive_unknown(&self) -> u32 {
        self.tracker.consecutive_unknown()
    }

    pub fn guide_visible(&self) -> bool {
        self.guide_visible
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.navigator.state();
        let recipe = state.selected_recipe.and_then(|i| self.catalog.get(i));
        SessionSnapshot {
            now_ms: self.now_ms,
            recipe_count: self.catalog.len(),
            selected_recipe: state.selected_recipe,
            recipe_title: recipe.map(|r| r.title.clone()),
            current_instruction: state.current_instruction,
            total_steps: recipe.map_or(0, |r| r.instructions.len()),
            timer: self.timer.snapshot(),
            timer_visible: self.timer_visible,
            speech: self.speech.state(),
            voice_disabled: self.speech.voice_disabled().is_some(),
            guide_visible: self.guide_visible,
            awaiting_confirmation: self.confirmation.map(|c| c.seconds),
            consecutive_unknown: self.tracker.consecutive_unknown(),
        }
    }

    /// Earliest pending task deadline on the session clock
    pub fn next_deadline(&mut self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    /// Take every effect produced so far
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Move the clock forward, running each due task at its own deadline
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some(due) = self.scheduler.next_deadline() {
            if due > now_ms {
                break;
            }
            self.now_ms = self.now_ms.max(due);
            let Some((_, task)) = self.scheduler.pop_due(due) else {
                break;
            };
            self.run_task(task);
        }
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Process one input at `now_ms`, after any tasks due by then
    pub fn handle(&mut self, now_ms: u64, command: SessionCommand) {
        self.advance_to(now_ms);

        match command {
            SessionCommand::Transcript { text, is_final } => self.on_transcript(&text, is_final),
            SessionCommand::ManualCommand(text) => {
                let command = normalize_transcript(&text);
                if !command.is_empty() {
                    self.interpret(&command);
                }
            }
            SessionCommand::UtteranceFinished(utterance) => {
                let actions = self.speech.utterance_finished(
                    &mut self.scheduler,
                    self.now_ms,
                    utterance,
                    SessionTask::ResumeListening,
                );
                self.push_speech(actions);
            }
            SessionCommand::RecognitionStarted => {
                debug!("Recognizer started");
                self.effects.push(Effect::Status("Listening...".to_string()));
            }
            SessionCommand::RecognitionEnded => {
                let actions = self.speech.recognition_ended(
                    &mut self.scheduler,
                    self.now_ms,
                    SessionTask::RestartRecognition,
                );
                self.push_speech(actions);
            }
            SessionCommand::RecognitionError(error) => {
                let disables = error.disables_voice();
                let message = error.user_message();
                let actions = self.speech.recognition_error(&mut self.scheduler, error);
                self.push_speech(actions);
                if disables {
                    self.effects.push(Effect::Status(message.to_string()));
                }
            }
            SessionCommand::StartListening => self.start_listening(),
            SessionCommand::StopListening => {
                let actions = self.speech.stop_listening(&mut self.scheduler);
                self.push_speech(actions);
                self.effects.push(Effect::Status("Voice control off".to_string()));
            }
            SessionCommand::SelectRecipe(index) => {
                let outcome = self.navigator.select_recipe(&self.catalog, index);
                self.render(outcome);
            }
            SessionCommand::SetTimer { minutes, seconds } => {
                self.timer.set_from_inputs(minutes, seconds);
                self.refresh_timer();
            }
            SessionCommand::PresetTimer { minutes } => {
                self.timer.set_from_inputs(minutes, 0);
                self.refresh_timer();
            }
            SessionCommand::StartTimer => self.start_timer(),
            SessionCommand::PauseTimer => self.pause_timer(),
            SessionCommand::ResetTimer => self.reset_timer(),
            SessionCommand::ToggleTimerDisplay => self.set_timer_visible(!self.timer_visible),
            SessionCommand::ShowGuide => self.set_guide_visible(true),
            SessionCommand::HideGuide => self.set_guide_visible(false),
            SessionCommand::NeverShowGuide => {
                self.preferences.hide_guide = true;
                self.save_preferences();
                self.set_guide_visible(false);
            }
            SessionCommand::StartListeningFromGuide => {
                self.set_guide_visible(false);
                self.start_listening();
            }
        }
    }

    fn on_transcript(&mut self, text: &str, is_final: bool) {
        if !is_final {
            return;
        }

        let command = normalize_transcript(text);
        if command.is_empty() {
            return;
        }

        if let Some(pending) = self.confirmation {
            self.answer_confirmation(pending, &command);
            return;
        }

        self.interpret(&command);
    }

    /// Debounce, then run the first matching intent or the unknown fallback
    fn interpret(&mut self, command: &str) {
        if !self.tracker.accept(command, self.now_ms) {
            return;
        }

        match match_intent(command, &self.catalog) {
            Some((rule, intent)) => {
                info!("Command \"{}\" matched {}", command, rule);
                self.tracker.record_recognized();
                self.apply(intent);
            }
            None => {
                info!("Unrecognized command: {}", command);
                self.speak(UNKNOWN_COMMAND);
                if self.tracker.record_unknown() {
                    self.set_guide_visible(true);
                    self.speak(GUIDE_HINT);
                }
            }
        }
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::StartTimer => self.start_timer(),
            Intent::PauseTimer => self.pause_timer(),
            Intent::ResetTimer => self.reset_timer(),
            Intent::ToggleTimerDisplay => self.set_timer_visible(!self.timer_visible),
            Intent::SetTimer { minutes } => {
                self.timer.set_duration(minutes.saturating_mul(60));
                self.refresh_timer();
                self.set_timer_visible(true);
                self.speak(&format!("Timer set for {} minutes.", minutes));
            }
            Intent::NextStep => {
                let outcome = self.navigator.next(&self.catalog);
                self.render(outcome);
            }
            Intent::PreviousStep => {
                let outcome = self.navigator.previous(&self.catalog);
                self.render(outcome);
            }
            Intent::RepeatStep => {
                let outcome = self.navigator.repeat(&self.catalog);
                self.render(outcome);
            }
            Intent::ListIngredients => {
                let outcome = self.navigator.list_ingredients(&self.catalog);
                self.render(outcome);
            }
            Intent::SelectRecipe { query, index } => match index {
                Some(index) => {
                    let outcome = self.navigator.select_recipe(&self.catalog, index);
                    self.render(outcome);
                }
                None => {
                    self.navigator.clear();
                    self.cancel_offer();
                    self.effects.push(Effect::SelectionCleared);
                    self.speak(&format!("I couldn't find a recipe named {}.", query));
                }
            },
            Intent::SearchIngredient { terms, matches } => match matches.first() {
                None => self.speak(&format!("No recipes found with {}.", terms)),
                Some(&first) => {
                    let outcome = self.navigator.select_recipe(&self.catalog, first);
                    let found = format!(
                        "Found {} recipes with {}. Selecting the first: {}.",
                        matches.len(),
                        terms,
                        self.catalog.get(first).map_or("", |r| r.title.as_str())
                    );
                    self.render_with_prefix(outcome, Some(found));
                }
            },
            Intent::SelectTitle { index } => {
                let outcome = self.navigator.select_recipe(&self.catalog, index);
                self.render(outcome);
            }
            Intent::ShowGuide => self.set_guide_visible(true),
        }
    }

    fn render(&mut self, outcome: NavOutcome) {
        self.render_with_prefix(outcome, None);
    }

    /// Display and speak a navigation outcome. `prefix` is spoken first, in
    /// the same utterance.
    fn render_with_prefix(&mut self, outcome: NavOutcome, prefix: Option<String>) {
        let speech = match prefix {
            Some(prefix) => format!("{} {}", prefix, outcome.speech()),
            None => outcome.speech(),
        };

        match &outcome {
            NavOutcome::Selected {
                index,
                title,
                total_steps,
            } => {
                self.cancel_offer();
                self.effects.push(Effect::RecipeSelected {
                    index: *index,
                    title: title.clone(),
                });
                self.effects.push(Effect::InstructionDisplay {
                    step: None,
                    total_steps: *total_steps,
                    text: READY_TO_START.to_string(),
                });
                self.speak(&speech);
            }
            NavOutcome::Instruction {
                step,
                total_steps,
                text,
            } => {
                self.effects.push(Effect::InstructionDisplay {
                    step: Some(*step),
                    total_steps: *total_steps,
                    text: text.clone(),
                });
                self.speak_highlighted(&speech);
                self.consider_timer_offer(text);
            }
            NavOutcome::Message(message) if *message == RECIPE_NOT_FOUND => {
                self.cancel_offer();
                self.effects.push(Effect::SelectionCleared);
                self.speak(&speech);
            }
            NavOutcome::Ingredients { .. } | NavOutcome::Message(_) => self.speak(&speech),
        }
    }

    /// Replace any unspoken offer with one for `instruction`, if it has a
    /// cook time worth timing
    fn consider_timer_offer(&mut self, instruction: &str) {
        self.cancel_offer();
        if let Some(seconds) = suggest_timer(instruction, self.config.min_suggest_secs) {
            debug!("Step suggests a {}s timer", seconds);
            self.pending_offer = Some(self.scheduler.schedule_once(
                self.now_ms,
                self.config.timer_offer_delay_ms,
                SessionTask::OfferTimer { seconds },
            ));
        }
    }

    fn cancel_offer(&mut self) {
        if let Some(id) = self.pending_offer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn offer_timer(&mut self, seconds: u64) {
        self.pending_offer = None;
        if let Some(previous) = self.confirmation.take() {
            self.scheduler.cancel(previous.timeout_task);
        }

        self.speak(&confirmation::offer_prompt(offer_minutes(seconds)));
        let timeout_task = self.scheduler.schedule_once(
            self.now_ms,
            self.config.confirmation_timeout_ms,
            SessionTask::ConfirmationTimeout,
        );
        self.confirmation = Some(PendingConfirmation {
            seconds,
            timeout_task,
        });
        info!("Offered a {}s timer", seconds);
    }

    fn answer_confirmation(&mut self, pending: PendingConfirmation, command: &str) {
        match classify_reply(command) {
            Reply::Yes => {
                self.close_confirmation(pending);
                self.timer.set_duration(pending.seconds);
                self.start_timer();
                self.speak(&confirmation::accepted_message(offer_minutes(pending.seconds)));
            }
            Reply::No => {
                self.close_confirmation(pending);
                self.speak(confirmation::DECLINED);
            }
            Reply::Unclear => debug!("Waiting for yes or no, ignoring \"{}\"", command),
        }
    }

    fn close_confirmation(&mut self, pending: PendingConfirmation) {
        self.scheduler.cancel(pending.timeout_task);
        self.confirmation = None;
    }

    fn run_task(&mut self, task: SessionTask) {
        match task {
            SessionTask::TimerTick => {
                let alerts = self.timer.tick(&mut self.scheduler);
                self.refresh_timer();
                for alert in alerts {
                    self.raise_alert(alert);
                }
            }
            SessionTask::HighlightWord { utterance, index } => {
                if let Some(action) = self.speech.highlight_word(utterance, index) {
                    self.effects.push(Effect::Speech(action));
                }
            }
            SessionTask::ResumeListening => {
                let actions = self.speech.resume_due();
                self.push_speech(actions);
            }
            SessionTask::RestartRecognition => {
                let actions = self.speech.restart_due();
                self.push_speech(actions);
            }
            SessionTask::OfferTimer { seconds } => self.offer_timer(seconds),
            SessionTask::ConfirmationTimeout => {
                if self.confirmation.take().is_some() {
                    info!("Timer offer timed out");
                    self.speak(confirmation::TIMED_OUT);
                }
            }
            SessionTask::ShowGuide => {
                if !self.preferences.hide_guide {
                    self.set_guide_visible(true);
                }
            }
        }
    }

    fn raise_alert(&mut self, alert: TimerAlert) {
        if let Some(text) = alert.notification() {
            self.effects.push(Effect::Notify(text.to_string()));
        }
        if let Some(pattern) = alert.vibration() {
            self.effects.push(Effect::Vibrate(pattern.to_vec()));
        }
        if alert.plays_tone() {
            self.effects.push(Effect::PlayTone);
        }
        if let Some(text) = alert.speech() {
            self.speak(text);
        }
    }

    fn start_timer(&mut self) {
        if self
            .timer
            .start(&mut self.scheduler, self.now_ms, SessionTask::TimerTick)
        {
            self.set_timer_visible(true);
        }
        self.refresh_timer();
    }

    fn pause_timer(&mut self) {
        self.timer.pause(&mut self.scheduler);
        self.refresh_timer();
    }

    fn reset_timer(&mut self) {
        self.timer.reset(&mut self.scheduler);
        self.refresh_timer();
    }

    fn refresh_timer(&mut self) {
        self.effects.push(Effect::TimerDisplay(self.timer.snapshot()));
    }

    fn set_timer_visible(&mut self, visible: bool) {
        self.timer_visible = visible;
        self.effects.push(Effect::TimerVisible(visible));
    }

    fn set_guide_visible(&mut self, visible: bool) {
        self.guide_visible = visible;
        self.effects.push(Effect::GuideVisible(visible));
    }

    fn start_listening(&mut self) {
        match self.speech.start_listening(&mut self.scheduler) {
            Ok(actions) => self.push_speech(actions),
            Err(reason) => {
                warn!("Cannot listen: {}", reason);
                self.effects
                    .push(Effect::Status(reason.user_message().to_string()));
            }
        }
    }

    fn speak(&mut self, text: &str) {
        let (_, actions) = self.speech.speak(&mut self.scheduler, text);
        self.push_speech(actions);
    }

    fn speak_highlighted(&mut self, text: &str) {
        let (_, actions) = self.speech.speak_highlighted(
            &mut self.scheduler,
            self.now_ms,
            text,
            |utterance, index| SessionTask::HighlightWord { utterance, index },
        );
        self.push_speech(actions);
    }

    fn push_speech(&mut self, actions: Vec<SpeechAction>) {
        self.effects
            .extend(actions.into_iter().map(Effect::Speech));
    }

    fn save_preferences(&self) {
        if let Some(store) = &self.preference_store {
            if let Err(e) = store.save(&self.preferences) {
                warn!("Failed to save preferences: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Recipe;

    fn session() -> CookingSession {
        let catalog = Catalog::new(vec![
            Recipe::new("Tomato Soup")
                .with_ingredients(["tomatoes", "cream"])
                .with_instructions(["Chop the tomatoes.", "Simmer for 10-20 minutes."]),
            Recipe::new("Rice Pilaf").with_ingredients(["rice", "onion"]),
        ]);
        let config = AssistantConfig::default().without_voice_input();
        let mut session = CookingSession::new(config, catalog);
        session.start();
        session.drain_effects();
        session
    }

    fn spoken(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Speech(SpeechAction::Speak { text, .. }) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn say(session: &mut CookingSession, at: u64, text: &str) {
        session.handle(
            at,
            SessionCommand::Transcript {
                text: text.to_string(),
                is_final: true,
            },
        );
    }

    #[test]
    fn test_interim_results_ignored() {
        let mut session = session();
        session.handle(
            0,
            SessionCommand::Transcript {
                text: "next step".into(),
                is_final: false,
            },
        );
        assert!(session.drain_effects().is_empty());
    }

    #[test]
    fn test_select_and_first_step() {
        let mut session = session();
        say(&mut session, 0, "show tomato soup");
        let effects = session.drain_effects();
        assert!(effects.contains(&Effect::RecipeSelected {
            index: 0,
            title: "Tomato Soup".into()
        }));
        assert_eq!(
            spoken(&effects),
            vec!["Selected Tomato Soup. Say \"next step\" to begin, or \"ingredients\" for the ingredient list."]
        );

        say(&mut session, 100, "Next step.");
        assert_eq!(session.navigator().current_instruction(), Some(0));
        assert_eq!(spoken(&session.drain_effects()), vec!["Chop the tomatoes."]);
    }

    #[test]
    fn test_manual_command_skips_confirmation() {
        let mut session = session();
        session.handle(0, SessionCommand::SelectRecipe(0));
        say(&mut session, 10, "next");
        say(&mut session, 20, "next step");
        session.advance_to(2_000);
        assert!(session.pending_confirmation().is_some());

        session.handle(2_100, SessionCommand::ManualCommand("previous".into()));
        assert_eq!(session.navigator().current_instruction(), Some(0));
        assert!(session.pending_confirmation().is_some());
    }

    #[test]
    fn test_never_show_guide() {
        let mut session = session();
        session.handle(0, SessionCommand::ShowGuide);
        session.handle(10, SessionCommand::NeverShowGuide);
        assert!(!session.guide_visible());
        assert!(session.preferences().hide_guide);
    }

    #[test]
    fn test_timer_tick_through_session() {
        let mut session = session();
        session.handle(0, SessionCommand::SetTimer { minutes: 0, seconds: 3 });
        session.handle(0, SessionCommand::StartTimer);
        session.drain_effects();

        session.advance_to(3_000);
        let effects = session.drain_effects();
        assert!(effects.contains(&Effect::PlayTone));
        assert!(effects.contains(&Effect::Notify("Time is up!".into())));
        assert!(spoken(&effects).contains(&"Timer finished! Time is up!".to_string()));
        assert!(!session.timer().is_running());
    }

    #[test]
    fn test_voice_disabled_keeps_manual_commands() {
        let mut session = session();
        session.handle(0, SessionCommand::StartListening);
        session.handle(5, SessionCommand::RecognitionError(RecognitionError::Unsupported));
        assert!(session.snapshot().voice_disabled);

        session.handle(10, SessionCommand::ManualCommand("show rice".into()));
        assert_eq!(session.navigator().selected_recipe(), Some(1));
    }
}
