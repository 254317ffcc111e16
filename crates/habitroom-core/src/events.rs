use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::habits::Habit;
use crate::notify::{NotificationId, Severity};
use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// Drivers collect them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Local>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Local>,
    },
    TimerReset {
        completed_focus_count: u32,
        at: DateTime<Local>,
    },
    /// A countdown reached zero and the session switched phase.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        completed_focus_count: u32,
        at: DateTime<Local>,
    },
    /// User logged a habit through one of the store mutators.
    HabitLogged {
        habit: Habit,
        at: DateTime<Local>,
    },
    /// Reminder engine decided a habit needs a nudge.
    ReminderDue {
        habit: Habit,
        at: DateTime<Local>,
    },
    NotificationPosted {
        id: NotificationId,
        message: String,
        severity: Severity,
        at: DateTime<Local>,
    },
    NotificationExpired {
        id: NotificationId,
        at: DateTime<Local>,
    },
    TaskAdded {
        id: Uuid,
        text: String,
        at: DateTime<Local>,
    },
    TaskToggled {
        id: Uuid,
        completed: bool,
        at: DateTime<Local>,
    },
    TaskDeleted {
        id: Uuid,
        at: DateTime<Local>,
    },
}
