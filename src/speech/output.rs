//! Speech output driver
//!
//! Coordinates the single current utterance with the recognizer. Recognition
//! and playback are mutually exclusive: speaking suspends listening, and
//! listening resumes after a grace delay once the utterance ends, unless it
//! was stopped explicitly in the meantime.
//!
//! The driver never touches a device. Every transition returns the
//! [`SpeechAction`]s the front-end must carry out, and front-end callbacks
//! (utterance finished, recognizer ended) come back in as method calls.

use super::highlight::{word_interval_ms, HighlightState, DEFAULT_WORDS_PER_MINUTE};
use super::{RecognitionError, SpeechAction};
use crate::utils::scheduler::{Scheduler, TaskId};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Delay between the end of an utterance and resumed listening
pub const DEFAULT_RESUME_GRACE_MS: u64 = 500;

/// Delay before restarting a recognizer that stopped on its own
pub const DEFAULT_RESTART_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    /// Neither speaking nor listening
    Idle,
    Listening,
    /// Recognizer stopped unexpectedly; a restart is pending
    Restarting,
    /// Speaking with listening off
    Speaking { utterance: Uuid },
    /// Speaking; listening resumes afterwards
    SuspendedForSpeech { utterance: Uuid },
    /// Utterance ended; listening resumes after the grace delay
    Resuming,
}

impl SpeechState {
    pub fn current_utterance(&self) -> Option<Uuid> {
        match self {
            SpeechState::Speaking { utterance } | SpeechState::SuspendedForSpeech { utterance } => {
                Some(*utterance)
            }
            _ => None,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.current_utterance().is_some()
    }

    /// Whether listening is active or will come back on its own
    pub fn wants_listening(&self) -> bool {
        matches!(
            self,
            SpeechState::Listening
                | SpeechState::Restarting
                | SpeechState::SuspendedForSpeech { .. }
                | SpeechState::Resuming
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeechState::Idle => "idle",
            SpeechState::Listening => "listening",
            SpeechState::Restarting => "restarting",
            SpeechState::Speaking { .. } => "speaking",
            SpeechState::SuspendedForSpeech { .. } => "speaking (listening suspended)",
            SpeechState::Resuming => "resuming",
        }
    }
}

#[derive(Debug)]
pub struct SpeechDriver {
    state: SpeechState,
    highlight: Option<HighlightState>,
    /// Grace or restart task, whichever the state is waiting on
    pending_task: Option<TaskId>,
    voice_disabled: Option<RecognitionError>,
    word_interval_ms: u64,
    resume_grace_ms: u64,
    restart_delay_ms: u64,
}

impl Default for SpeechDriver {
    fn default() -> Self {
        Self::new(
            DEFAULT_WORDS_PER_MINUTE,
            DEFAULT_RESUME_GRACE_MS,
            DEFAULT_RESTART_DELAY_MS,
        )
    }
}

impl SpeechDriver {
    pub fn new(words_per_minute: u32, resume_grace_ms: u64, restart_delay_ms: u64) -> Self {
        Self {
            state: SpeechState::Idle,
            highlight: None,
            pending_task: None,
            voice_disabled: None,
            word_interval_ms: word_interval_ms(words_per_minute),
            resume_grace_ms,
            restart_delay_ms,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn highlight(&self) -> Option<&HighlightState> {
        self.highlight.as_ref()
    }

    pub fn voice_disabled(&self) -> Option<&RecognitionError> {
        self.voice_disabled.as_ref()
    }

    /// Speak `text`, preempting any utterance in progress
    pub fn speak<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        text: &str,
    ) -> (Uuid, Vec<SpeechAction>) {
        let utterance = Uuid::new_v4();
        let mut actions = self.preempt(scheduler, utterance);
        actions.push(SpeechAction::Speak {
            utterance,
            text: text.to_string(),
        });
        (utterance, actions)
    }

    /// Speak `text` and schedule one highlight task per word
    pub fn speak_highlighted<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        now_ms: u64,
        text: &str,
        make_task: impl Fn(Uuid, usize) -> A,
    ) -> (Uuid, Vec<SpeechAction>) {
        let (utterance, actions) = self.speak(scheduler, text);
        self.highlight = Some(HighlightState::schedule(
            utterance,
            text,
            scheduler,
            now_ms,
            self.word_interval_ms,
            make_task,
        ));
        (utterance, actions)
    }

    fn preempt<A>(&mut self, scheduler: &mut Scheduler<A>, utterance: Uuid) -> Vec<SpeechAction> {
        let mut actions = Vec::new();
        if let Some(mut highlight) = self.highlight.take() {
            highlight.cancel(scheduler);
            actions.push(SpeechAction::ClearHighlight);
        }
        self.cancel_pending(scheduler);

        self.state = match self.state {
            SpeechState::Idle => SpeechState::Speaking { utterance },
            SpeechState::Speaking { utterance: old } => {
                debug!("Utterance {} preempted", old);
                actions.insert(0, SpeechAction::CancelSpeech);
                SpeechState::Speaking { utterance }
            }
            SpeechState::SuspendedForSpeech { utterance: old } => {
                debug!("Utterance {} preempted", old);
                actions.insert(0, SpeechAction::CancelSpeech);
                SpeechState::SuspendedForSpeech { utterance }
            }
            SpeechState::Listening => {
                actions.push(SpeechAction::StopRecognition);
                SpeechState::SuspendedForSpeech { utterance }
            }
            SpeechState::Restarting | SpeechState::Resuming => {
                SpeechState::SuspendedForSpeech { utterance }
            }
        };
        actions
    }

    /// Playback of `utterance` ended. Stale ids are ignored.
    pub fn utterance_finished<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        now_ms: u64,
        utterance: Uuid,
        resume_task: A,
    ) -> Vec<SpeechAction> {
        if self.state.current_utterance() != Some(utterance) {
            debug!("Ignoring end of stale utterance {}", utterance);
            return Vec::new();
        }

        let mut actions = Vec::new();
        if let Some(mut highlight) = self.highlight.take() {
            highlight.cancel(scheduler);
            actions.push(SpeechAction::ClearHighlight);
        }

        self.state = match self.state {
            SpeechState::SuspendedForSpeech { .. } => {
                self.pending_task =
                    Some(scheduler.schedule_once(now_ms, self.resume_grace_ms, resume_task));
                SpeechState::Resuming
            }
            _ => SpeechState::Idle,
        };
        actions
    }

    /// A scheduled highlight fired
    pub fn highlight_word(&mut self, utterance: Uuid, index: usize) -> Option<SpeechAction> {
        let word = self.highlight.as_mut()?.advance(utterance, index)?;
        Some(SpeechAction::HighlightWord {
            utterance,
            index,
            word: word.to_string(),
        })
    }

    /// The grace delay after speaking elapsed
    pub fn resume_due(&mut self) -> Vec<SpeechAction> {
        if self.state != SpeechState::Resuming {
            return Vec::new();
        }
        self.pending_task = None;
        self.state = SpeechState::Listening;
        debug!("Resuming recognition after speech");
        vec![SpeechAction::StartRecognition]
    }

    /// The restart delay after an unexpected recognizer end elapsed
    pub fn restart_due(&mut self) -> Vec<SpeechAction> {
        if self.state != SpeechState::Restarting {
            return Vec::new();
        }
        self.pending_task = None;
        self.state = SpeechState::Listening;
        info!("Restarting recognition");
        vec![SpeechAction::StartRecognition]
    }

    /// Turn listening on. Returns `Err` with the reason when voice input is
    /// unavailable.
    pub fn start_listening<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
    ) -> Result<Vec<SpeechAction>, RecognitionError> {
        if let Some(reason) = &self.voice_disabled {
            return Err(reason.clone());
        }

        let actions = match self.state {
            SpeechState::Idle => {
                self.state = SpeechState::Listening;
                vec![SpeechAction::StartRecognition]
            }
            SpeechState::Restarting => {
                self.cancel_pending(scheduler);
                self.state = SpeechState::Listening;
                vec![SpeechAction::StartRecognition]
            }
            SpeechState::Speaking { utterance } => {
                self.state = SpeechState::SuspendedForSpeech { utterance };
                Vec::new()
            }
            _ => Vec::new(),
        };
        info!("Listening requested ({})", self.state.label());
        Ok(actions)
    }

    /// Turn listening off and keep it off until asked again
    pub fn stop_listening<A>(&mut self, scheduler: &mut Scheduler<A>) -> Vec<SpeechAction> {
        let actions = match self.state {
            SpeechState::Listening => vec![SpeechAction::StopRecognition],
            _ => Vec::new(),
        };

        self.state = match self.state {
            SpeechState::SuspendedForSpeech { utterance } => SpeechState::Speaking { utterance },
            SpeechState::Speaking { utterance } => SpeechState::Speaking { utterance },
            _ => {
                self.cancel_pending(scheduler);
                SpeechState::Idle
            }
        };
        info!("Listening stopped");
        actions
    }

    /// The recognizer ended. Only an end we did not ask for schedules a
    /// restart.
    pub fn recognition_ended<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        now_ms: u64,
        restart_task: A,
    ) -> Vec<SpeechAction> {
        if self.state == SpeechState::Listening && self.voice_disabled.is_none() {
            warn!(
                "Recognition ended unexpectedly, restarting in {}ms",
                self.restart_delay_ms
            );
            self.pending_task =
                Some(scheduler.schedule_once(now_ms, self.restart_delay_ms, restart_task));
            self.state = SpeechState::Restarting;
        }
        Vec::new()
    }

    /// The recognizer reported an error. Permission and support failures
    /// disable voice input for the rest of the session.
    pub fn recognition_error<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        error: RecognitionError,
    ) -> Vec<SpeechAction> {
        if !error.disables_voice() {
            warn!("Recognition error: {}", error);
            return Vec::new();
        }

        warn!("Voice input disabled: {}", error);
        self.voice_disabled = Some(error);
        self.cancel_pending(scheduler);
        self.state = match self.state {
            SpeechState::Speaking { utterance } | SpeechState::SuspendedForSpeech { utterance } => {
                SpeechState::Speaking { utterance }
            }
            _ => SpeechState::Idle,
        };
        Vec::new()
    }

    fn cancel_pending<A>(&mut self, scheduler: &mut Scheduler<A>) {
        if let Some(id) = self.pending_task.take() {
            scheduler.cancel(id);
        }
    }
}
