//! Terminal front-end
//!
//! Prints session effects, plays the time-up tone, and turns typed lines
//! into session commands.

pub mod console;
pub mod render;
pub mod tone;

pub use console::{parse_console_line, ConsoleFrontend, ConsoleInput};
pub use render::{effect_line, recipe_card, recipe_detail, status_report, GUIDE_TEXT};
pub use tone::play_alert;
