//! Habit reminder rules.
//!
//! Evaluated once per [`REMINDER_PERIOD_SECS`] by the driver. Each rule reads
//! the [`HabitStore`] and the current local time and yields at most one
//! reminder:
//!
//! 1. water    - an hour or more since the last logged glass
//! 2. medicine - not taken and the clock reads exactly 09:00
//! 3. walking  - not done, between 10:00 and 18:59, with a small chance per check
//!
//! Walking is a random nudge rather than a fixed time; over the daytime
//! window it fires a handful of times without tracking what was already sent.

use chrono::{DateTime, Local, NaiveDate, Timelike};

use super::store::HabitStore;
use super::Habit;
use crate::notify::Severity;
use crate::random::Sampler;

/// How often the reminder rules run.
pub const REMINDER_PERIOD_SECS: u64 = 60;
/// Minimum gap after the last glass before water is reminded.
pub const WATER_INTERVAL_SECS: i64 = 60 * 60;
pub const MEDICINE_REMINDER_HOUR: u32 = 9;
pub const MEDICINE_REMINDER_MINUTE: u32 = 0;
/// Inclusive hour range in which walking nudges may fire.
pub const WALKING_WINDOW_START_HOUR: u32 = 10;
pub const WALKING_WINDOW_END_HOUR: u32 = 18;
/// Chance of a walking nudge per check inside the window.
pub const WALKING_NUDGE_PROBABILITY: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub habit: Habit,
    pub message: &'static str,
    pub severity: Severity,
}

impl Reminder {
    fn water() -> Self {
        Self {
            habit: Habit::Water,
            message: "Time to drink water! 💧",
            severity: Severity::Info,
        }
    }

    fn medicine() -> Self {
        Self {
            habit: Habit::Medicine,
            message: "Don't forget your medicine! 💊",
            severity: Severity::Warning,
        }
    }

    fn walking() -> Self {
        Self {
            habit: Habit::Walking,
            message: "How about a walk? Your body will thank you! 🚶",
            severity: Severity::Info,
        }
    }
}

/// Decides which habits are due for a reminder.
///
/// The only state kept here is the date of the last medicine reminder, which
/// stops a second evaluation inside the same 09:00 minute from repeating it.
#[derive(Debug, Clone, Default)]
pub struct ReminderEngine {
    medicine_reminded_on: Option<NaiveDate>,
}

impl ReminderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run all three rules in order.
    ///
    /// The sampler is only consulted when the walking rule's deterministic
    /// conditions hold.
    pub fn evaluate(
        &mut self,
        habits: &HabitStore,
        now: DateTime<Local>,
        sampler: &mut dyn Sampler,
    ) -> Vec<Reminder> {
        let mut due = Vec::new();

        if water_due(habits, now) {
            due.push(Reminder::water());
        }

        if medicine_due(habits, now) && self.medicine_reminded_on != Some(now.date_naive()) {
            self.medicine_reminded_on = Some(now.date_naive());
            due.push(Reminder::medicine());
        }

        if walking_window(habits, now) && sampler.sample() < WALKING_NUDGE_PROBABILITY {
            due.push(Reminder::walking());
        }

        for reminder in &due {
            tracing::info!(habit = ?reminder.habit, "reminder due");
        }
        due
    }
}

fn water_due(habits: &HabitStore, now: DateTime<Local>) -> bool {
    habits
        .water()
        .last_logged_at()
        .is_some_and(|last| (now - last).num_seconds() >= WATER_INTERVAL_SECS)
}

fn medicine_due(habits: &HabitStore, now: DateTime<Local>) -> bool {
    !habits.medicine().taken()
        && now.hour() == MEDICINE_REMINDER_HOUR
        && now.minute() == MEDICINE_REMINDER_MINUTE
}

fn walking_window(habits: &HabitStore, now: DateTime<Local>) -> bool {
    !habits.walking().done()
        && (WALKING_WINDOW_START_HOUR..=WALKING_WINDOW_END_HOUR).contains(&now.hour())
}
