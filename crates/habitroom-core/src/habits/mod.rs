//! Habit tracking: the per-habit state store and the reminder rules that
//! read it.

mod reminder;
mod store;

use serde::{Deserialize, Serialize};

pub use reminder::{
    Reminder, ReminderEngine, MEDICINE_REMINDER_HOUR, MEDICINE_REMINDER_MINUTE,
    REMINDER_PERIOD_SECS, WALKING_NUDGE_PROBABILITY, WALKING_WINDOW_END_HOUR,
    WALKING_WINDOW_START_HOUR, WATER_INTERVAL_SECS,
};
pub use store::{HabitStore, MedicineState, WalkingState, WaterState, WATER_TARGET};

/// The three tracked daily habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Water,
    Medicine,
    Walking,
}
