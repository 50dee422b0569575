//! Transcript normalization and command bookkeeping

use tracing::debug;

/// Default window in which an identical command is dropped
pub const DEFAULT_DEBOUNCE_MS: u64 = 2_000;

/// Unknown commands in a row before the guide is shown
pub const DEFAULT_UNKNOWN_LIMIT: u32 = 3;

/// Lower-case, trim, and strip one trailing period
pub fn normalize_transcript(raw: &str) -> String {
    let command = raw.trim().to_lowercase();
    match command.strip_suffix('.') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => command,
    }
}

/// Debounce and unknown-command state
#[derive(Debug, Clone)]
pub struct CommandTracker {
    last_command: String,
    last_command_at_ms: Option<u64>,
    consecutive_unknown: u32,
    debounce_ms: u64,
    unknown_limit: u32,
}

impl Default for CommandTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS, DEFAULT_UNKNOWN_LIMIT)
    }
}

impl CommandTracker {
    pub fn new(debounce_ms: u64, unknown_limit: u32) -> Self {
        Self {
            last_command: String::new(),
            last_command_at_ms: None,
            consecutive_unknown: 0,
            debounce_ms,
            unknown_limit: unknown_limit.max(1),
        }
    }

    /// Returns false when `command` repeats the previous one inside the
    /// debounce window. Accepted commands become the new reference point.
    pub fn accept(&mut self, command: &str, now_ms: u64) -> bool {
        if let Some(at) = self.last_command_at_ms {
            if command == self.last_command && now_ms.saturating_sub(at) < self.debounce_ms {
                debug!("Debounced repeated command: {}", command);
                return false;
            }
        }

        self.last_command = command.to_string();
        self.last_command_at_ms = Some(now_ms);
        true
    }

    pub fn record_recognized(&mut self) {
        self.consecutive_unknown = 0;
    }

    /// Count an unknown command. Returns true when the limit is reached, in
    /// which case the counter starts over.
    pub fn record_unknown(&mut self) -> bool {
        self.consecutive_unknown += 1;
        if self.consecutive_unknown >= self.unknown_limit {
            self.consecutive_unknown = 0;
            return true;
        }
        false
    }

    pub fn consecutive_unknown(&self) -> u32 {
        self.consecutive_unknown
    }

    pub fn last_command(&self) -> &str {
        &self.last_command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_transcript() {
        assert_eq!(normalize_transcript("  Next Step. "), "next step");
        assert_eq!(normalize_transcript("Show Rice Pilaf"), "show rice pilaf");
        assert_eq!(normalize_transcript("wait.."), "wait.");
        assert_eq!(normalize_transcript("."), "");
    }

    #[test]
    fn test_debounce_window() {
        let mut tracker = CommandTracker::default();
        assert!(tracker.accept("next step", 0));
        assert!(!tracker.accept("next step", 1_999));
        assert!(tracker.accept("next step", 4_000));
    }

    #[test]
    fn test_debounce_only_identical_commands() {
        let mut tracker = CommandTracker::default();
        assert!(tracker.accept("next step", 0));
        assert!(tracker.accept("previous step", 100));
        assert!(tracker.accept("next step", 200));
        assert_eq!(tracker.last_command(), "next step");
    }

    #[test]
    fn test_discarded_command_does_not_extend_window() {
        let mut tracker = CommandTracker::default();
        assert!(tracker.accept("repeat", 0));
        assert!(!tracker.accept("repeat", 1_500));
        assert!(tracker.accept("repeat", 2_000));
    }

    #[test]
    fn test_unknown_escalation() {
        let mut tracker = CommandTracker::default();
        assert!(!tracker.record_unknown());
        assert!(!tracker.record_unknown());
        assert!(tracker.record_unknown());
        assert_eq!(tracker.consecutive_unknown(), 0);
    }

    #[test]
    fn test_recognized_resets_counter() {
        let mut tracker = CommandTracker::default();
        tracker.record_unknown();
        tracker.record_unknown();
        tracker.record_recognized();
        assert_eq!(tracker.consecutive_unknown(), 0);
        assert!(!tracker.record_unknown());
    }
}
