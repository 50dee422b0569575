//! Yes/no timer offer raised by cook-time detection

use crate::utils::scheduler::TaskId;

const YES_WORDS: &[&str] = &["yes", "yeah", "sure"];
const NO_WORDS: &[&str] = &["no", "not", "skip"];

/// How a transcript answers the offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    /// Not an answer; keep waiting
    Unclear,
}

/// Classify a normalized transcript. Matching is per word so that "know" or
/// "nothing" do not count as a refusal.
pub fn classify_reply(command: &str) -> Reply {
    let has_any = |words: &[&str]| {
        command
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| words.contains(&token))
    };

    if has_any(YES_WORDS) {
        Reply::Yes
    } else if has_any(NO_WORDS) {
        Reply::No
    } else {
        Reply::Unclear
    }
}

/// An offer waiting for an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub seconds: u64,
    /// Fires the implicit "no"
    pub timeout_task: TaskId,
}

pub fn offer_prompt(minutes: u64) -> String {
    format!(
        "This step requires about {} minutes. Should I set a timer?",
        minutes
    )
}

pub fn accepted_message(minutes: u64) -> String {
    format!("Timer set for {} minutes and started.", minutes)
}

pub const DECLINED: &str = "Okay, no timer set.";
pub const TIMED_OUT: &str = "I didn't hear a response. I won't set a timer for now.";
