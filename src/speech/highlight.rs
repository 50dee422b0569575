//! Word-by-word highlighting while an utterance plays
//!
//! Synthesizers rarely report word boundaries reliably, so highlights are
//! driven by scheduled tasks at a fixed cadence derived from an assumed
//! reading rate.

use crate::utils::scheduler::{Scheduler, TaskId};
use uuid::Uuid;

/// Assumed reading rate for highlight cadence
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 150;

/// Milliseconds per word at `wpm`; 150 wpm gives 400 ms
pub fn word_interval_ms(wpm: u32) -> u64 {
    60_000 / u64::from(wpm.max(1))
}

/// Highlight progress for one utterance
#[derive(Debug, Clone)]
pub struct HighlightState {
    pub utterance: Uuid,
    pub words: Vec<String>,
    pub current_word_index: Option<usize>,
    tasks: Vec<TaskId>,
}

impl HighlightState {
    /// Split `text` on whitespace and schedule one task per word, the first
    /// one immediately
    pub fn schedule<A>(
        utterance: Uuid,
        text: &str,
        scheduler: &mut Scheduler<A>,
        now_ms: u64,
        interval_ms: u64,
        make_task: impl Fn(Uuid, usize) -> A,
    ) -> Self {
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let tasks = (0..words.len())
            .map(|index| {
                scheduler.schedule_once(now_ms, index as u64 * interval_ms, make_task(utterance, index))
            })
            .collect();

        Self {
            utterance,
            words,
            current_word_index: None,
            tasks,
        }
    }

    /// Move to word `index` of `utterance`. Returns the word, or `None` when
    /// the request belongs to another utterance.
    pub fn advance(&mut self, utterance: Uuid, index: usize) -> Option<&str> {
        if utterance != self.utterance {
            return None;
        }
        let word = self.words.get(index)?;
        self.current_word_index = Some(index);
        Some(word)
    }

    /// Cancel every highlight that has not fired yet
    pub fn cancel<A>(&mut self, scheduler: &mut Scheduler<A>) {
        for id in self.tasks.drain(..) {
            scheduler.cancel(id);
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_interval() {
        assert_eq!(word_interval_ms(DEFAULT_WORDS_PER_MINUTE), 400);
        assert_eq!(word_interval_ms(0), 60_000);
    }

    #[test]
    fn test_schedule_cadence() {
        let mut scheduler = Scheduler::new();
        let id = Uuid::new_v4();
        let state = HighlightState::schedule(id, "Chop the  onions", &mut scheduler, 1_000, 400, |u, i| (u, i));

        assert_eq!(state.words, vec!["Chop", "the", "onions"]);
        assert_eq!(state.pending(), 3);

        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(1_800))
            .map(|(_, (_, i))| i)
            .collect();
        assert_eq!(fired, vec![0, 1, 2]);
        assert!(scheduler.pop_due(10_000).is_none());
    }

    #[test]
    fn test_cancel_pending() {
        let mut scheduler = Scheduler::new();
        let id = Uuid::new_v4();
        let mut state = HighlightState::schedule(id, "one two three", &mut scheduler, 0, 400, |u, i| (u, i));

        assert!(scheduler.pop_due(0).is_some());
        state.cancel(&mut scheduler);
        assert!(scheduler.pop_due(10_000).is_none());
    }

    #[test]
    fn test_advance_ignores_other_utterance() {
        let mut scheduler = Scheduler::new();
        let id = Uuid::new_v4();
        let mut state = HighlightState::schedule(id, "stir well", &mut scheduler, 0, 400, |u, i| (u, i));

        assert_eq!(state.advance(Uuid::new_v4(), 0), None);
        assert_eq!(state.advance(id, 1), Some("well"));
        assert_eq!(state.current_word_index, Some(1));
        assert_eq!(state.advance(id, 5), None);
    }
}
