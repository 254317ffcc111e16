//! Pomodoro session state machine.
//!
//! The session is a countdown over fixed-length phases. It does not own a
//! timer - the driver calls `tick()` once per elapsed second while the session
//! is running.
//!
//! ## State Transitions
//!
//! ```text
//! (Focus, paused) <-> (Focus, running) --0--> (Break, paused)
//! (Break, paused) <-> (Break, running) --0--> (Focus, paused)
//! reset: any --> (Focus, paused, 1500)
//! ```
//!
//! Every phase completion stops the countdown, so the next phase only begins
//! on an explicit `start()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = PomodoroSession::new();
//! session.start(now);
//! // Once per second:
//! if let Some(Event::PhaseCompleted { .. }) = session.tick(now) { /* notify */ }
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Length of a focus phase in seconds.
pub const FOCUS_DURATION_SECS: u32 = 25 * 60;
/// Length of a break phase in seconds.
pub const BREAK_DURATION_SECS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn duration_secs(self) -> u32 {
        match self {
            Phase::Focus => FOCUS_DURATION_SECS,
            Phase::Break => BREAK_DURATION_SECS,
        }
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    /// Display label used by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus Time",
            Phase::Break => "Break Time",
        }
    }

    /// Message shown when this phase runs out.
    pub fn completion_message(self) -> &'static str {
        match self {
            Phase::Focus => "Pomodoro complete! Take a break 🎉",
            Phase::Break => "Break over! Time to focus 🎯",
        }
    }
}

/// Focus/break countdown.
///
/// Fields are private; the only way to change them is through the commands
/// below, which keep `remaining_secs` within `0..=phase.duration_secs()`.
/// Serialize-only: a session can be reported but never rebuilt from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PomodoroSession {
    phase: Phase,
    remaining_secs: u32,
    running: bool,
    completed_focus_count: u32,
}

impl Default for PomodoroSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PomodoroSession {
    /// Starts paused at the beginning of a focus phase.
    pub fn new() -> Self {
        Self {
            phase: Phase::Focus,
            remaining_secs: FOCUS_DURATION_SECS,
            running: false,
            completed_focus_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase.duration_secs();
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    pub fn pause(&mut self, at: DateTime<Local>) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at,
        })
    }

    /// Single start/pause button.
    pub fn toggle(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.running {
            self.pause(at)
        } else {
            self.start(at)
        }
    }

    /// Back to a paused, full-length focus phase. Completed sessions are kept.
    pub fn reset(&mut self, at: DateTime<Local>) -> Event {
        self.phase = Phase::Focus;
        self.remaining_secs = FOCUS_DURATION_SECS;
        self.running = false;
        Event::TimerReset {
            completed_focus_count: self.completed_focus_count,
            at,
        }
    }

    /// Advance by one second. Returns `Some(Event::PhaseCompleted)` when
    /// this tick ran the countdown out.
    pub fn tick(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.running && self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        self.settle(at)
    }

    /// Perform the phase transition if the countdown is at zero.
    ///
    /// The transition reacts to `remaining == 0`, not to the tick itself;
    /// after it runs `remaining` is a full phase again, so calling this twice
    /// never transitions twice.
    pub fn settle(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.remaining_secs > 0 {
            return None;
        }
        let completed = self.phase;
        if completed == Phase::Focus {
            self.completed_focus_count += 1;
        }
        self.phase = completed.next();
        self.remaining_secs = self.phase.duration_secs();
        self.running = false;
        tracing::info!(
            ?completed,
            next = ?self.phase,
            completed_focus_count = self.completed_focus_count,
            "phase completed"
        );
        Some(Event::PhaseCompleted {
            completed,
            next: self.phase,
            completed_focus_count: self.completed_focus_count,
            at,
        })
    }
}
