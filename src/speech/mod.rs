//! Speech output and recognition control
//!
//! This module provides:
//! - The speech driver state machine that keeps playback and listening apart
//! - Word-by-word highlighting driven by the session scheduler

pub mod highlight;
pub mod output;

pub use highlight::{word_interval_ms, HighlightState, DEFAULT_WORDS_PER_MINUTE};
pub use output::{SpeechDriver, SpeechState, DEFAULT_RESTART_DELAY_MS, DEFAULT_RESUME_GRACE_MS};

use uuid::Uuid;

/// Instructions for the front-end's synthesizer and recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechAction {
    Speak { utterance: Uuid, text: String },
    /// Stop whatever is playing
    CancelSpeech,
    HighlightWord {
        utterance: Uuid,
        index: usize,
        word: String,
    },
    ClearHighlight,
    StartRecognition,
    StopRecognition,
}

/// Errors reported by the platform recognizer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("speech recognition not supported")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

impl RecognitionError {
    /// Whether voice input stays off for the rest of the session
    pub fn disables_voice(&self) -> bool {
        matches!(
            self,
            RecognitionError::PermissionDenied | RecognitionError::Unsupported
        )
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionError::PermissionDenied => {
                "Microphone access was denied. You can still use the manual commands."
            }
            RecognitionError::Unsupported => {
                "Voice control is not available here. You can still use the manual commands."
            }
            RecognitionError::Other(_) => "Voice recognition hiccup, still listening.",
        }
    }
}
