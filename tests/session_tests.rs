//! Integration tests for the cooking session
//!
//! These drive a [`CookingSession`] on its virtual clock and check the
//! effects it asks the front-end to carry out.

use cookease::catalog::{Catalog, Recipe};
use cookease::cooking::navigator::{NavOutcome, AT_LAST_STEP};
use cookease::cooking::{CookingTimer, InstructionNavigator, TimerPhase};
use cookease::integration::{AssistantConfig, CookingSession, Effect, SessionCommand};
use cookease::speech::{SpeechAction, SpeechState};
use cookease::storage::{PreferenceStore, Preferences};
use cookease::utils::scheduler::Scheduler;
use cookease::voice::confirmation::{DECLINED, TIMED_OUT};
use cookease::voice::{suggest_timer, GUIDE_HINT, MIN_SUGGEST_SECS, UNKNOWN_COMMAND};
use uuid::Uuid;

fn catalog() -> Catalog {
    Catalog::new(vec![
        Recipe::new("Tomato Soup")
            .with_ingredients(["tomatoes", "cream", "basil"])
            .with_instructions([
                "Chop the tomatoes.",
                "Simmer for 10-20 minutes.",
                "Blend until smooth.",
            ]),
        Recipe::new("Rice Pilaf")
            .with_ingredients(["rice", "onion", "stock"])
            .with_instructions(["Rinse the rice."]),
    ])
}

/// Session with the first-visit guide already seen, so only commands
/// bring it up
fn session_with(config: AssistantConfig) -> (CookingSession, tempfile::TempDir) {
    session_with_catalog(config, catalog())
}

fn session_with_catalog(
    config: AssistantConfig,
    catalog: Catalog,
) -> (CookingSession, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::in_dir(dir.path());
    store
        .save(&Preferences {
            hide_guide: false,
            first_visit_seen: true,
        })
        .unwrap();

    let mut session = CookingSession::new(config, catalog).with_preference_store(store);
    session.start();
    session.drain_effects();
    (session, dir)
}

fn quiet_session() -> (CookingSession, tempfile::TempDir) {
    session_with(AssistantConfig::default().without_voice_input())
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

fn spoken(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Speech(SpeechAction::Speak { text, .. }) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn last_utterance(effects: &[Effect]) -> Uuid {
    effects
        .iter()
        .rev()
        .find_map(|e| match e {
            Effect::Speech(SpeechAction::Speak { utterance, .. }) => Some(*utterance),
            _ => None,
        })
        .expect("an utterance was spoken")
}

#[test]
fn test_set_duration_sets_remaining_and_total() {
    let mut timer = CookingTimer::new(900);
    for secs in [0, 1, 59, 300, 7_259] {
        timer.set_duration(secs);
        assert_eq!(timer.remaining_secs(), secs);
        assert_eq!(timer.total_secs(), secs);
    }
}

#[test]
fn test_start_at_zero_is_noop() {
    let mut scheduler = Scheduler::new();
    let mut timer = CookingTimer::new(0);

    assert!(!timer.start(&mut scheduler, 0, "tick"));
    assert_eq!(timer.phase(), TimerPhase::Idle);
    assert!(scheduler.is_empty());
}

#[test]
fn test_repeated_start_keeps_one_tick_source() {
    let mut scheduler = Scheduler::new();
    let mut timer = CookingTimer::new(120);

    assert!(timer.start(&mut scheduler, 0, "tick"));
    assert!(!timer.start(&mut scheduler, 10, "tick"));
    assert!(!timer.start(&mut scheduler, 20, "tick"));
    assert_eq!(scheduler.len(), 1);

    timer.pause(&mut scheduler);
    assert!(scheduler.is_empty());
    assert!(timer.start(&mut scheduler, 30, "tick"));
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_walking_to_the_last_step() {
    let catalog = catalog();
    let mut nav = InstructionNavigator::new();
    nav.select_recipe(&catalog, 0);
    nav.next(&catalog);
    assert_eq!(nav.current_instruction(), Some(0));

    let total = catalog.get(0).unwrap().instructions.len();
    for _ in 0..total - 1 {
        nav.next(&catalog);
    }
    assert_eq!(nav.current_instruction(), Some(total - 1));

    let outcome = nav.next(&catalog);
    assert_eq!(outcome, NavOutcome::Message(AT_LAST_STEP));
    assert_eq!(nav.current_instruction(), Some(total - 1));
}

#[test]
fn test_duplicate_command_is_debounced() {
    let (mut session, _dir) = quiet_session();
    session.handle(0, SessionCommand::SelectRecipe(0));

    say(&mut session, 100, "next step");
    say(&mut session, 900, "Next step.");
    assert_eq!(session.navigator().current_instruction(), Some(0));

    say(&mut session, 2_200, "next step");
    assert_eq!(session.navigator().current_instruction(), Some(1));
}

#[test]
fn test_set_timer_by_voice() {
    let (mut session, _dir) = quiet_session();
    say(&mut session, 0, "set timer for 5 minutes");

    assert_eq!(session.timer().remaining_secs(), 300);
    assert_eq!(session.timer().total_secs(), 300);
    let effects = session.drain_effects();
    assert!(effects.contains(&Effect::TimerVisible(true)));
    assert_eq!(spoken(&effects), vec!["Timer set for 5 minutes."]);
}

#[test]
fn test_range_cook_time_offers_midpoint() {
    assert_eq!(
        suggest_timer("Simmer for 10-20 minutes.", MIN_SUGGEST_SECS),
        Some(900)
    );

    let (mut session, _dir) = quiet_session();
    session.handle(0, SessionCommand::SelectRecipe(0));
    say(&mut session, 10, "next step");
    say(&mut session, 20, "next");
    session.drain_effects();

    session.advance_to(999);
    assert!(session.pending_confirmation().is_none());

    session.advance_to(1_020);
    assert_eq!(session.snapshot().awaiting_confirmation, Some(900));
    assert_eq!(
        spoken(&session.drain_effects()),
        vec!["This step requires about 15 minutes. Should I set a timer?"]
    );
}

#[test]
fn test_show_by_title() {
    let (mut session, _dir) = quiet_session();

    say(&mut session, 0, "show rice");
    assert_eq!(session.navigator().selected_recipe(), Some(1));
    assert!(session.drain_effects().contains(&Effect::RecipeSelected {
        index: 1,
        title: "Rice Pilaf".into()
    }));

    say(&mut session, 100, "show pizza");
    assert_eq!(session.navigator().selected_recipe(), None);
    let effects = session.drain_effects();
    assert!(effects.contains(&Effect::SelectionCleared));
    assert_eq!(spoken(&effects), vec!["I couldn't find a recipe named pizza."]);
}

#[test]
fn test_search_selects_first_match() {
    let (mut session, _dir) = quiet_session();
    say(&mut session, 0, "search recipes with rice");

    assert_eq!(session.navigator().selected_recipe(), Some(1));
    let speech = spoken(&session.drain_effects());
    assert_eq!(speech.len(), 1);
    assert!(speech[0].starts_with("Found 1 recipes with rice. Selecting the first: Rice Pilaf."));
}

#[test]
fn test_three_unknown_commands_open_the_guide_once() {
    let (mut session, _dir) = quiet_session();

    say(&mut session, 0, "flibber");
    say(&mut session, 10, "gronk");
    assert_eq!(session.consecutive_unknown(), 2);
    assert!(!session.guide_visible());
    say(&mut session, 20, "wibble wobble");

    let effects = session.drain_effects();
    let opened = effects
        .iter()
        .filter(|e| **e == Effect::GuideVisible(true))
        .count();
    assert_eq!(opened, 1);
    assert!(session.guide_visible());
    assert_eq!(session.consecutive_unknown(), 0);

    let speech = spoken(&effects);
    assert_eq!(speech.iter().filter(|s| *s == UNKNOWN_COMMAND).count(), 3);
    assert_eq!(speech.last().map(String::as_str), Some(GUIDE_HINT));
}

#[test]
fn test_recognized_command_resets_unknown_count() {
    let (mut session, _dir) = quiet_session();
    say(&mut session, 0, "flibber");
    say(&mut session, 10, "gronk");
    say(&mut session, 20, "start timer");
    assert_eq!(session.consecutive_unknown(), 0);

    say(&mut session, 30, "wibble");
    assert_eq!(session.consecutive_unknown(), 1);
    assert!(!session.guide_visible());
}

#[test]
fn test_absurd_cook_time_offer_saturates() {
    let catalog = Catalog::new(vec![Recipe::new("Forever Roast")
        .with_ingredients(["beef"])
        .with_instructions(["Preheat the oven.", "Bake for 9999999999999999 hours."])]);
    let (mut session, _dir) =
        session_with_catalog(AssistantConfig::default().without_voice_input(), catalog);

    session.handle(0, SessionCommand::SelectRecipe(0));
    say(&mut session, 10, "next step");
    session.advance_to(2_000);
    assert_eq!(session.snapshot().awaiting_confirmation, Some(u64::MAX));
    assert_eq!(
        spoken(&session.drain_effects()).last().cloned(),
        Some(format!(
            "This step requires about {} minutes. Should I set a timer?",
            u64::MAX / 60
        ))
    );

    say(&mut session, 3_000, "yes");
    assert!(session.timer().is_running());
    assert_eq!(session.timer().total_secs(), u64::MAX);
    session.advance_to(10_000);
    assert_eq!(session.timer().remaining_secs(), u64::MAX - 7);
}

#[test]
fn test_show_title_starting_with_connector() {
    let catalog = Catalog::new(vec![
        Recipe::new("Using Leftovers Casserole")
            .with_ingredients(["rice", "cheese"])
            .with_instructions(["Layer everything in a dish."]),
        Recipe::new("Pasta with Cheese")
            .with_ingredients(["pasta", "cheese"])
            .with_instructions(["Boil the pasta."]),
    ]);
    let (mut session, _dir) =
        session_with_catalog(AssistantConfig::default().without_voice_input(), catalog);

    say(&mut session, 0, "show using leftovers casserole");
    assert_eq!(session.navigator().selected_recipe(), Some(0));
}

fn session_awaiting_offer() -> (CookingSession, tempfile::TempDir) {
    let (mut session, dir) = quiet_session();
    session.handle(0, SessionCommand::SelectRecipe(0));
    say(&mut session, 10, "next step");
    say(&mut session, 20, "next");
    session.advance_to(1_020);
    session.drain_effects();
    assert!(session.pending_confirmation().is_some());
    (session, dir)
}

#[test]
fn test_confirmation_yes_starts_timer() {
    let (mut session, _dir) = session_awaiting_offer();
    say(&mut session, 2_000, "yeah go ahead");

    assert!(session.pending_confirmation().is_none());
    assert!(session.timer().is_running());
    assert_eq!(session.timer().total_secs(), 900);
    assert_eq!(
        spoken(&session.drain_effects()),
        vec!["Timer set for 15 minutes and started."]
    );

    // Timeout was cancelled with the answer
    session.advance_to(20_000);
    assert!(!spoken(&session.drain_effects()).contains(&TIMED_OUT.to_string()));
}

#[test]
fn test_confirmation_no_and_unclear() {
    let (mut session, _dir) = session_awaiting_offer();

    say(&mut session, 2_000, "what was that");
    assert!(session.pending_confirmation().is_some());
    assert!(spoken(&session.drain_effects()).is_empty());

    say(&mut session, 2_500, "no thanks");
    assert!(session.pending_confirmation().is_none());
    assert!(!session.timer().is_running());
    assert_eq!(spoken(&session.drain_effects()), vec![DECLINED]);
}

#[test]
fn test_confirmation_times_out() {
    let (mut session, _dir) = session_awaiting_offer();

    session.advance_to(11_019);
    assert!(session.pending_confirmation().is_some());

    session.advance_to(11_020);
    assert!(session.pending_confirmation().is_none());
    assert_eq!(spoken(&session.drain_effects()), vec![TIMED_OUT]);
}

#[test]
fn test_listening_suspends_while_speaking() {
    let (mut session, _dir) = session_with(AssistantConfig::default());
    assert_eq!(session.speech_state(), SpeechState::Listening);

    say(&mut session, 0, "show rice");
    let effects = session.drain_effects();
    assert!(effects.contains(&Effect::Speech(SpeechAction::StopRecognition)));
    let utterance = last_utterance(&effects);
    assert_eq!(
        session.speech_state(),
        SpeechState::SuspendedForSpeech { utterance }
    );

    session.handle(3_000, SessionCommand::UtteranceFinished(utterance));
    assert_eq!(session.speech_state(), SpeechState::Resuming);

    session.advance_to(3_499);
    assert_eq!(session.speech_state(), SpeechState::Resuming);
    session.advance_to(3_500);
    assert_eq!(session.speech_state(), SpeechState::Listening);
    assert!(session
        .drain_effects()
        .contains(&Effect::Speech(SpeechAction::StartRecognition)));
}

#[test]
fn test_unexpected_recognizer_end_restarts() {
    let (mut session, _dir) = session_with(AssistantConfig::default());

    session.handle(100, SessionCommand::RecognitionEnded);
    assert_eq!(session.speech_state(), SpeechState::Restarting);

    session.advance_to(1_100);
    assert_eq!(session.speech_state(), SpeechState::Listening);
}

#[test]
fn test_first_visit_guide_shown_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = AssistantConfig::default().without_voice_input();

    let mut session = CookingSession::new(config.clone(), catalog())
        .with_preference_store(PreferenceStore::in_dir(dir.path()));
    session.start();
    session.advance_to(1_000);
    assert!(session.drain_effects().contains(&Effect::GuideVisible(true)));

    let mut again = CookingSession::new(config, catalog())
        .with_preference_store(PreferenceStore::in_dir(dir.path()));
    again.start();
    again.advance_to(5_000);
    assert!(!again.drain_effects().contains(&Effect::GuideVisible(true)));
}
