//! Cook-time detection in instruction text

use regex::Regex;
use std::sync::LazyLock;

/// Cooking verbs that make a duration worth a timer
pub const COOKING_KEYWORDS: &[&str] = &[
    "simmer", "bake", "cook", "roast", "fry", "boil", "steam", "rest", "rise", "marinate",
];

/// Durations at or below this are not offered
pub const MIN_SUGGEST_SECS: u64 = 30;

struct TimePattern {
    regex: Regex,
    unit_secs: u64,
    range: bool,
}

impl TimePattern {
    fn new(pattern: &str, unit_secs: u64, range: bool) -> Self {
        Self {
            regex: Regex::new(pattern).expect("valid regex"),
            unit_secs,
            range,
        }
    }

    fn seconds(&self, text: &str) -> Option<u64> {
        let caps = self.regex.captures(text)?;
        let first: u64 = caps[1].parse().ok()?;
        let amount = if self.range {
            let second: u64 = caps[2].parse().ok()?;
            // Rounded average, halves go up
            first.saturating_add(second).saturating_add(1) / 2
        } else {
            first
        };
        Some(amount.saturating_mul(self.unit_secs))
    }
}

static PATTERNS: LazyLock<Vec<TimePattern>> = LazyLock::new(|| {
    vec![
        TimePattern::new(r"(?i)(\d+)\s*-\s*(\d+)\s*hours?", 3_600, true),
        TimePattern::new(r"(?i)(\d+)\s*-\s*(\d+)\s*minutes?", 60, true),
        TimePattern::new(r"(?i)(\d+)\s*-\s*(\d+)\s*mins?", 60, true),
        TimePattern::new(r"(?i)(\d+)\s*hours?", 3_600, false),
        TimePattern::new(r"(?i)(\d+)\s*minutes?", 60, false),
        TimePattern::new(r"(?i)(\d+)\s*mins?", 60, false),
    ]
});

/// First duration expression in `text`, in seconds
pub fn parse_duration(text: &str) -> Option<u64> {
    PATTERNS.iter().find_map(|p| p.seconds(text))
}

pub fn has_cooking_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    COOKING_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Seconds worth offering a timer for, if any
pub fn suggest_timer(instruction: &str, min_secs: u64) -> Option<u64> {
    if !has_cooking_keyword(instruction) {
        return None;
    }
    parse_duration(instruction).filter(|&secs| secs > min_secs)
}

/// Whole minutes for the spoken offer, rounded to nearest
pub fn offer_minutes(secs: u64) -> u64 {
    secs.saturating_add(30) / 60
}
