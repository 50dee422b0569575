//! Countdown kitchen timer
//!
//! The timer owns its state but not its tick source: ticks are delivered by
//! a repeating task on the session [`Scheduler`], and the timer keeps the
//! task id so that pausing cancels it synchronously.

use crate::utils::scheduler::{Scheduler, TaskId};
use tracing::{debug, info};

/// Milliseconds between countdown ticks
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Upper bound of the minutes input field
pub const MAX_INPUT_MINUTES: i64 = 120;

/// Upper bound of the seconds input field
pub const MAX_INPUT_SECONDS: i64 = 59;

/// Remaining time at which the one-minute warning fires
const ONE_MINUTE: u64 = 60;

/// Final countdown window with a haptic pulse every second
const FINAL_COUNTDOWN: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// Side effects requested by a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAlert {
    OneMinuteWarning,
    /// One haptic pulse per second during the last ten seconds
    CountdownPulse { remaining_secs: u64 },
    TenSeconds,
    TimeUp,
}

impl TimerAlert {
    pub fn notification(&self) -> Option<&'static str> {
        match self {
            TimerAlert::OneMinuteWarning => Some("1 minute remaining!"),
            TimerAlert::TimeUp => Some("Time is up!"),
            _ => None,
        }
    }

    /// Vibration pattern in milliseconds (on, off, on, ...)
    pub fn vibration(&self) -> Option<&'static [u64]> {
        match self {
            TimerAlert::OneMinuteWarning => Some(&[100, 50, 100]),
            TimerAlert::CountdownPulse { .. } => Some(&[100]),
            TimerAlert::TimeUp => Some(&[500, 200, 500, 200, 500]),
            TimerAlert::TenSeconds => None,
        }
    }

    pub fn speech(&self) -> Option<&'static str> {
        match self {
            TimerAlert::OneMinuteWarning => Some("One minute remaining!"),
            TimerAlert::TenSeconds => Some("Ten seconds!"),
            TimerAlert::TimeUp => Some("Timer finished! Time is up!"),
            TimerAlert::CountdownPulse { .. } => None,
        }
    }

    pub fn plays_tone(&self) -> bool {
        matches!(self, TimerAlert::TimeUp)
    }
}

/// Color band used by timer displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    /// Five minutes or less
    Warning,
    /// Under a minute
    Critical,
}

/// Read-only view of the timer for displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub phase: TimerPhase,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn display(&self) -> String {
        format_time(self.remaining_secs)
    }

    pub fn short_display(&self) -> String {
        format_short_time(self.remaining_secs)
    }

    /// Elapsed fraction in `[0, 1]`; zero for an unset timer
    pub fn progress(&self) -> f32 {
        if self.total_secs == 0 {
            return 0.0;
        }
        (self.total_secs - self.remaining_secs) as f32 / self.total_secs as f32
    }

    pub fn urgency(&self) -> Urgency {
        match self.remaining_secs {
            1..=ONE_MINUTE => Urgency::Critical,
            r if r <= 300 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.phase {
            TimerPhase::Paused => "Timer paused",
            TimerPhase::Idle if self.remaining_secs == 0 && self.total_secs > 0 => "Time's up!",
            TimerPhase::Idle => "Timer ready",
            TimerPhase::Running => match self.urgency() {
                Urgency::Critical => "Less than 1 minute!",
                Urgency::Warning => "Almost done!",
                Urgency::Normal => "Timer running",
            },
        }
    }
}

#[derive(Debug)]
pub struct CookingTimer {
    remaining_secs: u64,
    total_secs: u64,
    phase: TimerPhase,
    tick_task: Option<TaskId>,
}

impl CookingTimer {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            remaining_secs: duration_secs,
            total_secs: duration_secs,
            phase: TimerPhase::Idle,
            tick_task: None,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn tick_task(&self) -> Option<TaskId> {
        self.tick_task
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            phase: self.phase,
        }
    }

    /// Set both remaining and total. A running countdown keeps ticking from
    /// the new value.
    pub fn set_duration(&mut self, secs: u64) {
        self.remaining_secs = secs;
        self.total_secs = secs;
        if self.phase == TimerPhase::Paused {
            self.phase = TimerPhase::Idle;
        }
        debug!("Timer set to {}s", secs);
    }

    /// Set from the minute/second input fields, clamping them first
    pub fn set_from_inputs(&mut self, minutes: i64, seconds: i64) -> u64 {
        let (minutes, seconds) = clamp_inputs(minutes, seconds);
        let secs = minutes * 60 + seconds;
        self.set_duration(secs);
        secs
    }

    /// Begin counting down. Returns false (and does nothing) when already
    /// running or when nothing is left to count.
    pub fn start<A>(&mut self, scheduler: &mut Scheduler<A>, now_ms: u64, tick: A) -> bool {
        if self.is_running() || self.remaining_secs == 0 {
            return false;
        }

        self.cancel_tick(scheduler);
        self.tick_task = Some(scheduler.schedule_repeating(now_ms, TICK_INTERVAL_MS, tick));
        self.phase = TimerPhase::Running;
        info!("Timer started with {}s remaining", self.remaining_secs);
        true
    }

    /// Stop ticking; idempotent
    pub fn pause<A>(&mut self, scheduler: &mut Scheduler<A>) {
        self.cancel_tick(scheduler);
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
            info!("Timer paused at {}s", self.remaining_secs);
        }
    }

    /// Pause and restore the last-set duration
    pub fn reset<A>(&mut self, scheduler: &mut Scheduler<A>) {
        self.pause(scheduler);
        self.remaining_secs = self.total_secs;
        self.phase = TimerPhase::Idle;
    }

    /// Advance the countdown by one second
    pub fn tick<A>(&mut self, scheduler: &mut Scheduler<A>) -> Vec<TimerAlert> {
        if !self.is_running() {
            return Vec::new();
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.cancel_tick(scheduler);
            self.phase = TimerPhase::Idle;
            info!("Timer finished");
            return vec![TimerAlert::TimeUp];
        }

        let mut alerts = Vec::new();
        if self.remaining_secs == ONE_MINUTE {
            alerts.push(TimerAlert::OneMinuteWarning);
        }
        if self.remaining_secs <= FINAL_COUNTDOWN {
            alerts.push(TimerAlert::CountdownPulse {
                remaining_secs: self.remaining_secs,
            });
            if self.remaining_secs == FINAL_COUNTDOWN {
                alerts.push(TimerAlert::TenSeconds);
            }
        }
        alerts
    }

    fn cancel_tick<A>(&mut self, scheduler: &mut Scheduler<A>) {
        if let Some(id) = self.tick_task.take() {
            scheduler.cancel(id);
        }
    }
}

/// `H:MM:SS` from one hour up, `MM:SS` below
pub fn format_time(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Compact `M:SS` used by the timer badge
pub fn format_short_time(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Clamp raw input fields to 0..=120 minutes and 0..=59 seconds
pub fn clamp_inputs(minutes: i64, seconds: i64) -> (u64, u64) {
    (
        minutes.clamp(0, MAX_INPUT_MINUTES) as u64,
        seconds.clamp(0, MAX_INPUT_SECONDS) as u64,
    )
}
