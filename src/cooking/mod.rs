//! Cooking session primitives: the countdown timer and instruction navigation

pub mod navigator;
pub mod timer;

pub use navigator::{InstructionNavigator, NavOutcome, NavigatorState};
pub use timer::{
    clamp_inputs, format_short_time, format_time, CookingTimer, TimerAlert, TimerPhase,
    TimerSnapshot, Urgency,
};
