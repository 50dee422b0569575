//! Terminal stand-in for the browser page
//!
//! Typed lines play the role of the recognizer while voice input is on and
//! of the manual command box while it is off. Speech is printed and its end
//! reported after the time it would take to read aloud.

use super::render::{effect_line, status_report, timer_line_due, GUIDE_TEXT};
use super::tone::play_alert;
use crate::cooking::TimerSnapshot;
use crate::integration::{Effect, OrchestratorEvent, OrchestratorHandle, SessionCommand};
use crate::speech::SpeechAction;
use crate::{CookeaseError, Result};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// What a typed line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Session(SessionCommand),
    /// Free text, routed by the listening state
    Speech(String),
    Status,
    Help,
    Quit,
    Invalid(String),
}

/// Parse one typed line. Lines starting with `/` are console controls.
pub fn parse_console_line(line: &str) -> Option<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(control) = line.strip_prefix('/') else {
        return Some(ConsoleInput::Speech(line.to_string()));
    };

    let mut parts = control.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();
    let number = |i: usize| args.get(i).and_then(|a| a.parse::<i64>().ok());

    let input = match name {
        "listen" => ConsoleInput::Session(SessionCommand::StartListening),
        "stop" => ConsoleInput::Session(SessionCommand::StopListening),
        "start" => ConsoleInput::Session(SessionCommand::StartTimer),
        "pause" => ConsoleInput::Session(SessionCommand::PauseTimer),
        "reset" => ConsoleInput::Session(SessionCommand::ResetTimer),
        "timer" => ConsoleInput::Session(SessionCommand::ToggleTimerDisplay),
        "set" => match (number(0), number(1).or(Some(0))) {
            (Some(minutes), Some(seconds)) => {
                ConsoleInput::Session(SessionCommand::SetTimer { minutes, seconds })
            }
            _ => ConsoleInput::Invalid("usage: /set <minutes> [seconds]".to_string()),
        },
        "preset" => match number(0) {
            Some(minutes) => ConsoleInput::Session(SessionCommand::PresetTimer { minutes }),
            None => ConsoleInput::Invalid("usage: /preset <minutes>".to_string()),
        },
        "select" => match number(0) {
            Some(n) if n >= 1 => ConsoleInput::Session(SessionCommand::SelectRecipe(n as usize - 1)),
            _ => ConsoleInput::Invalid("usage: /select <card number>".to_string()),
        },
        "guide" => ConsoleInput::Session(SessionCommand::ShowGuide),
        "hide-guide" => ConsoleInput::Session(SessionCommand::HideGuide),
        "never-guide" => ConsoleInput::Session(SessionCommand::NeverShowGuide),
        "guide-listen" => ConsoleInput::Session(SessionCommand::StartListeningFromGuide),
        "status" => ConsoleInput::Status,
        "help" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        other => ConsoleInput::Invalid(format!("unknown control /{}", other)),
    };
    Some(input)
}

pub struct ConsoleFrontend {
    handle: OrchestratorHandle,
    word_interval_ms: u64,
    play_tone: bool,
}

impl ConsoleFrontend {
    pub fn new(handle: OrchestratorHandle, word_interval_ms: u64, play_tone: bool) -> Self {
        Self {
            handle,
            word_interval_ms,
            play_tone,
        }
    }

    /// Print effects and answer synthesizer and recognizer callbacks.
    /// Must be called from inside a tokio runtime.
    pub fn spawn_event_pump(&self) -> Result<JoinHandle<()>> {
        let handle = self.handle.clone();
        let runtime = tokio::runtime::Handle::current();
        let word_interval_ms = self.word_interval_ms;
        let play_tone = self.play_tone;

        thread::Builder::new()
            .name("cookease-console".to_string())
            .spawn(move || {
                let events = handle.event_receiver();
                let mut last_timer: Option<TimerSnapshot> = None;

                while let Ok(event) = events.recv() {
                    let effect = match event {
                        OrchestratorEvent::Effect(effect) => effect,
                        OrchestratorEvent::Shutdown => break,
                    };

                    match &effect {
                        Effect::Speech(SpeechAction::Speak { utterance, text }) => {
                            // Pretend to read it aloud
                            let words = text.split_whitespace().count().max(1) as u64;
                            let delay = Duration::from_millis(words * word_interval_ms);
                            let handle = handle.clone();
                            let utterance = *utterance;
                            runtime.spawn(async move {
                                tokio::time::sleep(delay).await;
                                if let Err(e) = handle.utterance_finished(utterance) {
                                    warn!("Lost end of utterance {}: {}", utterance, e);
                                }
                            });
                        }
                        Effect::Speech(SpeechAction::StartRecognition) => {
                            if let Err(e) = handle.notify(SessionCommand::RecognitionStarted) {
                                warn!("Lost recognizer start: {}", e);
                            }
                        }
                        Effect::Speech(SpeechAction::HighlightWord { index, word, .. }) => {
                            debug!("Highlight {} {}", index, word);
                        }
                        Effect::PlayTone => {
                            thread::spawn(move || play_alert(play_tone));
                        }
                        Effect::Vibrate(pattern) => debug!("Vibrate {:?}", pattern),
                        Effect::TimerDisplay(snapshot) => {
                            let due = timer_line_due(last_timer.as_ref(), snapshot);
                            last_timer = Some(*snapshot);
                            if !due {
                                continue;
                            }
                        }
                        _ => {}
                    }

                    if let Some(line) = effect_line(&effect) {
                        println!("{}", line);
                    }
                }
                debug!("Event pump stopped");
            })
            .map_err(|e| CookeaseError::SessionError(format!("Failed to spawn console thread: {}", e)))
    }

    /// Read typed lines until `/quit` or end of input
    pub async fn run_input(&self) -> Result<()> {
        println!("Type a command, or /help for console controls.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let Some(input) = parse_console_line(&line) else {
                continue;
            };

            match input {
                ConsoleInput::Session(cmd) => self.handle.send(cmd)?,
                ConsoleInput::Speech(text) => {
                    // While voice input is on, typed text stands in for the recognizer
                    let snapshot = self.handle.snapshot();
                    if snapshot.speech.wants_listening() && !snapshot.voice_disabled {
                        self.handle.transcript(text)?;
                    } else {
                        self.handle.manual_command(text)?;
                    }
                }
                ConsoleInput::Status => println!("{}", status_report(&self.handle.snapshot())),
                ConsoleInput::Help => println!("{}", GUIDE_TEXT),
                ConsoleInput::Quit => break,
                ConsoleInput::Invalid(message) => println!("{}", message),
            }
        }

        info!("Console input finished");
        self.handle.shutdown()
    }
}
