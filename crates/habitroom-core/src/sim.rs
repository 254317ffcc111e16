//! Deterministic simulation driver.
//!
//! Drives a [`Dashboard`] over a [`ManualClock`] with a discrete-event timer
//! queue instead of real sleeps. It schedules the same three timer kinds as
//! the tokio runtime: a 1 s pomodoro tick that exists only while the session
//! runs, a 60 s habit tick that always exists, and one expiry per
//! notification. Each timer has its own id and can be cancelled on its own.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use chrono::{DateTime, Duration, Local};

use crate::clock::{Clock, ManualClock};
use crate::dashboard::Dashboard;
use crate::error::ValidationError;
use crate::events::Event;
use crate::habits::REMINDER_PERIOD_SECS;
use crate::intent::Intent;
use crate::notify::NotificationId;
use crate::random::Sampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    PomodoroTick,
    HabitTick,
    Expire(NotificationId),
}

#[derive(Debug, PartialEq, Eq)]
struct Scheduled {
    due: DateTime<Local>,
    id: TimerId,
    kind: TimerKind,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Timers due at the same instant fire in scheduling order.
        (self.due, self.id).cmp(&(other.due, other.id))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One line of a simulation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Intent(Intent),
    /// Let simulated time pass, in seconds.
    Wait(u32),
}

/// Parse a script: one intent or `wait <secs>` per line. Blank lines and
/// lines starting with `#` are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ValidationError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let invalid = |message: String| ValidationError::InvalidScript {
            line: idx + 1,
            message,
        };
        if let Some(arg) = line.strip_prefix("wait") {
            let secs = arg
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(format!("bad wait duration: {e}")))?;
            steps.push(ScriptStep::Wait(secs));
        } else {
            let intent = line
                .parse::<Intent>()
                .map_err(|e| invalid(e.to_string()))?;
            steps.push(ScriptStep::Intent(intent));
        }
    }
    Ok(steps)
}

pub struct Simulator {
    dashboard: Dashboard,
    clock: ManualClock,
    queue: BinaryHeap<Reverse<Scheduled>>,
    cancelled: HashSet<TimerId>,
    next_timer: u64,
    pomodoro_timer: Option<TimerId>,
}

impl Simulator {
    /// Start a simulation at `start`. The first habit tick is one period
    /// later.
    pub fn new(start: DateTime<Local>, sampler: impl Sampler + 'static) -> Self {
        let clock = ManualClock::new(start);
        let mut sim = Self {
            dashboard: Dashboard::new(clock.clone(), sampler),
            clock,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_timer: 0,
            pomodoro_timer: None,
        };
        sim.schedule(habit_period(), TimerKind::HabitTick);
        sim
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(t)| !self.cancelled.contains(&t.id))
            .count()
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Vec<Event>, ValidationError> {
        let events = self.dashboard.apply(intent)?;
        self.sync_timers();
        Ok(events)
    }

    /// Run every timer due within `by`, in order, then park the clock at the
    /// end of the interval.
    pub fn advance(&mut self, by: Duration) -> Vec<Event> {
        let target = self.now() + by;
        let mut events = Vec::new();

        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > target {
                break;
            }
            let Some(Reverse(timer)) = self.queue.pop() else {
                break;
            };
            if self.cancelled.remove(&timer.id) {
                continue;
            }
            self.clock.set(timer.due);
            events.extend(self.fire(timer));
            self.sync_timers();
        }

        self.clock.set(target);
        events
    }

    /// Run a whole script, returning every event in order.
    pub fn run_script(&mut self, steps: Vec<ScriptStep>) -> Result<Vec<Event>, ValidationError> {
        let mut events = Vec::new();
        for step in steps {
            match step {
                ScriptStep::Intent(intent) => events.extend(self.apply(intent)?),
                ScriptStep::Wait(secs) => {
                    events.extend(self.advance(Duration::seconds(i64::from(secs))));
                }
            }
        }
        Ok(events)
    }

    /// Cancel every outstanding timer. Returns how many were live.
    pub fn shutdown(&mut self) -> usize {
        let live = self.pending_timers();
        self.queue.clear();
        self.cancelled.clear();
        self.pomodoro_timer = None;
        tracing::debug!(cancelled = live, "simulation timers cancelled");
        live
    }

    fn fire(&mut self, timer: Scheduled) -> Vec<Event> {
        match timer.kind {
            TimerKind::PomodoroTick => {
                if self.pomodoro_timer != Some(timer.id) {
                    return Vec::new();
                }
                self.pomodoro_timer = None;
                self.dashboard.tick_pomodoro()
            }
            TimerKind::HabitTick => {
                self.schedule(habit_period(), TimerKind::HabitTick);
                self.dashboard.run_reminders()
            }
            TimerKind::Expire(id) => self.dashboard.expire(id).into_iter().collect(),
        }
    }

    /// Bring the timer queue in line with dashboard state: a pomodoro tick
    /// exactly while running, and an expiry for every new notification.
    fn sync_timers(&mut self) {
        let running = self.dashboard.session().is_running();
        match (running, self.pomodoro_timer) {
            (true, None) => {
                let id = self.schedule(Duration::seconds(1), TimerKind::PomodoroTick);
                self.pomodoro_timer = Some(id);
            }
            (false, Some(id)) => {
                self.cancelled.insert(id);
                self.pomodoro_timer = None;
            }
            _ => {}
        }

        for (id, deadline) in self.dashboard.take_unscheduled_expiries() {
            self.schedule_at(deadline, TimerKind::Expire(id));
        }
    }

    fn schedule(&mut self, after: Duration, kind: TimerKind) -> TimerId {
        let due = self.now() + after;
        self.schedule_at(due, kind)
    }

    fn schedule_at(&mut self, due: DateTime<Local>, kind: TimerKind) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.queue.push(Reverse(Scheduled { due, id, kind }));
        id
    }
}

fn habit_period() -> Duration {
    Duration::seconds(REMINDER_PERIOD_SECS as i64)
}
