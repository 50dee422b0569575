//! Voice command interpretation
//!
//! Finalized transcripts are normalized, debounced, then matched against an
//! ordered intent table. Cook-time detection and the yes/no timer offer live
//! here as well since they consume the same transcripts.

pub mod command;
pub mod confirmation;
pub mod cook_time;
pub mod intents;

pub use command::{normalize_transcript, CommandTracker, DEFAULT_DEBOUNCE_MS, DEFAULT_UNKNOWN_LIMIT};
pub use confirmation::{classify_reply, PendingConfirmation, Reply};
pub use cook_time::{parse_duration, suggest_timer, COOKING_KEYWORDS, MIN_SUGGEST_SECS};
pub use intents::{match_intent, Intent, IntentRule, INTENT_RULES};

/// Spoken when no rule matches
pub const UNKNOWN_COMMAND: &str = "Sorry, I did not understand that command. Try saying \"next step\", \"previous step\", or \"ingredients\".";

/// Spoken when repeated unknown commands bring up the guide
pub const GUIDE_HINT: &str = "Let me show you the available commands.";
