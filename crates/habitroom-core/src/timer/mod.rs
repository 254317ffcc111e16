mod engine;

pub use engine::{Phase, PomodoroSession, BREAK_DURATION_SECS, FOCUS_DURATION_SECS};
