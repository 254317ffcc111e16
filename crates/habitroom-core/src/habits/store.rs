use chrono::{DateTime, Local};
use serde::Serialize;

use super::Habit;
use crate::events::Event;

/// Daily glasses of water.
pub const WATER_TARGET: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaterState {
    count: u32,
    target: u32,
    last_logged_at: Option<DateTime<Local>>,
}

impl WaterState {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn last_logged_at(&self) -> Option<DateTime<Local>> {
        self.last_logged_at
    }

    pub fn target_reached(&self) -> bool {
        self.count >= self.target
    }

    /// Fraction of the daily target, capped at 1.0.
    pub fn progress(&self) -> f64 {
        (self.count as f64 / self.target as f64).min(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MedicineState {
    taken: bool,
    taken_at: Option<DateTime<Local>>,
}

impl MedicineState {
    pub fn taken(&self) -> bool {
        self.taken
    }

    pub fn taken_at(&self) -> Option<DateTime<Local>> {
        self.taken_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WalkingState {
    done: bool,
    completed_at: Option<DateTime<Local>>,
}

impl WalkingState {
    pub fn done(&self) -> bool {
        self.done
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }
}

/// Mutable habit state. Only the three user-action mutators write to it;
/// the reminder engine gets a shared reference. Serialize-only, so every
/// store starts from [`HabitStore::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStore {
    water: WaterState,
    medicine: MedicineState,
    walking: WalkingState,
}

impl Default for HabitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitStore {
    pub fn new() -> Self {
        Self {
            water: WaterState {
                count: 0,
                target: WATER_TARGET,
                last_logged_at: None,
            },
            medicine: MedicineState::default(),
            walking: WalkingState::default(),
        }
    }

    pub fn water(&self) -> &WaterState {
        &self.water
    }

    pub fn medicine(&self) -> &MedicineState {
        &self.medicine
    }

    pub fn walking(&self) -> &WalkingState {
        &self.walking
    }

    /// One more glass. Always takes effect, even past the target.
    pub fn log_water(&mut self, at: DateTime<Local>) -> Event {
        self.water.count += 1;
        self.water.last_logged_at = Some(at);
        tracing::debug!(count = self.water.count, "water logged");
        Event::HabitLogged {
            habit: Habit::Water,
            at,
        }
    }

    /// Returns `None` if medicine was already marked taken.
    pub fn take_medicine(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.medicine.taken {
            return None;
        }
        self.medicine.taken = true;
        self.medicine.taken_at = Some(at);
        tracing::debug!("medicine taken");
        Some(Event::HabitLogged {
            habit: Habit::Medicine,
            at,
        })
    }

    /// Returns `None` if the walk was already marked done.
    pub fn complete_walk(&mut self, at: DateTime<Local>) -> Option<Event> {
        if self.walking.done {
            return None;
        }
        self.walking.done = true;
        self.walking.completed_at = Some(at);
        tracing::debug!("walk completed");
        Some(Event::HabitLogged {
            habit: Habit::Walking,
            at,
        })
    }
}
