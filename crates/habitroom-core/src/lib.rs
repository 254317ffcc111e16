//! # Habitroom Core Library
//!
//! Core logic for Habitroom, a personal dashboard combining a Pomodoro timer,
//! habit reminders (water, medicine, walking) and a small task list. The
//! library owns all state and timing rules; front ends such as the CLI only
//! render snapshots and forward user intents.
//!
//! ## Architecture
//!
//! - **Timer**: a focus/break countdown state machine advanced one second at a
//!   time by its driver
//! - **Habits**: a state store mutated only by user actions, and a reminder
//!   engine that reads it once a minute
//! - **Notifications**: transient messages that each expire five seconds
//!   after they are posted
//! - **Drivers**: a tokio runtime for live use and a discrete-event simulator
//!   for scripted, deterministic runs
//!
//! ## Key Components
//!
//! - [`Dashboard`]: the single context object owning all engine state
//! - [`DashboardRuntime`]: background tasks with cancellation handles
//! - [`Simulator`]: deterministic driver over a [`ManualClock`]
//! - [`Config`]: ambient configuration

pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod habits;
pub mod intent;
pub mod notify;
pub mod random;
pub mod runtime;
pub mod sim;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::{Dashboard, DashboardSnapshot, PomodoroView};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use habits::{Habit, HabitStore, Reminder, ReminderEngine};
pub use intent::Intent;
pub use notify::{Notification, NotificationCenter, NotificationId, Severity};
pub use random::{Sampler, SeededSampler, SequenceSampler, ThreadSampler};
pub use runtime::DashboardRuntime;
pub use sim::{parse_script, ScriptStep, Simulator};
pub use storage::{ClockFormat, Config};
pub use task::{Priority, Task, TaskList};
pub use timer::{Phase, PomodoroSession, BREAK_DURATION_SECS, FOCUS_DURATION_SECS};
