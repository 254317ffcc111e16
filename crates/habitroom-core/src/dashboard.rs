//! The process-scoped dashboard context.
//!
//! [`Dashboard`] owns every piece of engine state: the pomodoro session, the
//! habit store, the reminder engine, the notification center and the task
//! list, plus the injected clock and random sources. Drivers (`runtime`,
//! `sim`) call the periodic hooks; the presentation layer calls the intents
//! and reads [`Dashboard::snapshot`].
//!
//! Every method returns the events it caused, including one
//! `NotificationPosted` per notification. Expiry timers are the driver's
//! business: after each call it should drain
//! [`Dashboard::take_unscheduled_expiries`] and schedule a removal for each.

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::Event;
use crate::habits::{HabitStore, ReminderEngine};
use crate::intent::Intent;
use crate::notify::{Notification, NotificationCenter, NotificationId, Severity};
use crate::random::{Sampler, ThreadSampler};
use crate::task::{Priority, Task, TaskList};
use crate::timer::{Phase, PomodoroSession};

const MOTIVATIONAL_MESSAGES: [&str; 5] = [
    "You're doing great! Keep it up! 🌟",
    "Small steps lead to big changes! 💪",
    "Your future self will thank you! 🚀",
    "Progress, not perfection! ✨",
    "Every habit counts! 🎯",
];

pub struct Dashboard {
    session: PomodoroSession,
    habits: HabitStore,
    reminders: ReminderEngine,
    notifications: NotificationCenter,
    tasks: TaskList,
    clock: Box<dyn Clock>,
    /// Feeds the walking rule only, so seeded runs nudge the same way
    /// however often the motivational line is shown.
    sampler: Box<dyn Sampler>,
    motivation: Box<dyn Sampler>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(SystemClock, ThreadSampler)
    }
}

impl Dashboard {
    pub fn new(clock: impl Clock + 'static, sampler: impl Sampler + 'static) -> Self {
        Self {
            session: PomodoroSession::new(),
            habits: HabitStore::new(),
            reminders: ReminderEngine::new(),
            notifications: NotificationCenter::new(),
            tasks: TaskList::new(),
            clock: Box::new(clock),
            sampler: Box::new(sampler),
            motivation: Box::new(ThreadSampler),
        }
    }

    /// Replace the random source behind [`Dashboard::motivational_message`].
    pub fn with_motivation_sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.motivation = Box::new(sampler);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn session(&self) -> &PomodoroSession {
        &self.session
    }

    pub fn habits(&self) -> &HabitStore {
        &self.habits
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.list()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn find_task(&self, prefix: &str) -> Option<Uuid> {
        self.tasks.find_by_prefix(prefix)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            pomodoro: PomodoroView {
                phase: self.session.phase(),
                label: self.session.phase().label(),
                remaining_secs: self.session.remaining_secs(),
                display: self.session.format_remaining(),
                running: self.session.is_running(),
                completed_focus_count: self.session.completed_focus_count(),
            },
            habits: self.habits.clone(),
            notifications: self.notifications.list().to_vec(),
            tasks: self.tasks.list().to_vec(),
            at: self.now(),
        }
    }

    /// One of a handful of encouragement lines, picked at random.
    pub fn motivational_message(&mut self) -> &'static str {
        let idx = (self.motivation.sample() * MOTIVATIONAL_MESSAGES.len() as f64) as usize;
        MOTIVATIONAL_MESSAGES[idx.min(MOTIVATIONAL_MESSAGES.len() - 1)]
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Dispatch a parsed intent. Only task intents can fail.
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<Event>, ValidationError> {
        let events = match intent {
            Intent::Start => self.start(),
            Intent::Pause => self.pause(),
            Intent::Toggle => self.toggle(),
            Intent::Reset => self.reset(),
            Intent::LogWater => self.log_water(),
            Intent::TakeMedicine => self.take_medicine(),
            Intent::CompleteWalk => self.complete_walk(),
            Intent::AddTask { text, priority } => vec![self.add_task(&text, priority)?],
            Intent::ToggleTask(prefix) => {
                let id = self.resolve_task(&prefix)?;
                vec![self.toggle_task(id)?]
            }
            Intent::DeleteTask(prefix) => {
                let id = self.resolve_task(&prefix)?;
                vec![self.delete_task(id)?]
            }
        };
        Ok(events)
    }

    fn resolve_task(&self, prefix: &str) -> Result<Uuid, ValidationError> {
        self.tasks
            .find_by_prefix(prefix)
            .ok_or_else(|| ValidationError::NoTaskMatching(prefix.to_string()))
    }

    pub fn start(&mut self) -> Vec<Event> {
        let now = self.now();
        tracing::debug!("start requested");
        self.session.start(now).into_iter().collect()
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let now = self.now();
        tracing::debug!("pause requested");
        self.session.pause(now).into_iter().collect()
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        let now = self.now();
        tracing::debug!("toggle requested");
        self.session.toggle(now).into_iter().collect()
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let now = self.now();
        tracing::debug!("reset requested");
        vec![self.session.reset(now)]
    }

    // ── Habit intents ────────────────────────────────────────────────

    pub fn log_water(&mut self) -> Vec<Event> {
        let now = self.now();
        let mut events = vec![self.habits.log_water(now)];
        self.post("Great! Water logged 💧", Severity::Success, now, &mut events);
        events
    }

    pub fn take_medicine(&mut self) -> Vec<Event> {
        let now = self.now();
        let Some(event) = self.habits.take_medicine(now) else {
            return Vec::new();
        };
        let mut events = vec![event];
        self.post("Medicine taken! ✅", Severity::Success, now, &mut events);
        events
    }

    pub fn complete_walk(&mut self) -> Vec<Event> {
        let now = self.now();
        let Some(event) = self.habits.complete_walk(now) else {
            return Vec::new();
        };
        let mut events = vec![event];
        self.post("Walk completed! Great job! 🎉", Severity::Success, now, &mut events);
        events
    }

    // ── Task intents ─────────────────────────────────────────────────

    pub fn add_task(&mut self, text: &str, priority: Priority) -> Result<Event, ValidationError> {
        let now = self.now();
        self.tasks.add(text, priority, now)
    }

    pub fn toggle_task(&mut self, id: Uuid) -> Result<Event, ValidationError> {
        let now = self.now();
        self.tasks.toggle(id, now)
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<Event, ValidationError> {
        let now = self.now();
        self.tasks.delete(id, now)
    }

    // ── Periodic hooks ───────────────────────────────────────────────

    /// One elapsed second of the pomodoro countdown.
    pub fn tick_pomodoro(&mut self) -> Vec<Event> {
        let now = self.now();
        let mut events = Vec::new();
        if let Some(event) = self.session.tick(now) {
            if let Event::PhaseCompleted { completed, .. } = event {
                events.push(event);
                self.post(completed.completion_message(), Severity::Success, now, &mut events);
            }
        }
        events
    }

    /// One run of the habit reminder rules.
    pub fn run_reminders(&mut self) -> Vec<Event> {
        let now = self.now();
        let due = self
            .reminders
            .evaluate(&self.habits, now, self.sampler.as_mut());
        let mut events = Vec::new();
        for reminder in due {
            events.push(Event::ReminderDue {
                habit: reminder.habit,
                at: now,
            });
            self.post(reminder.message, reminder.severity, now, &mut events);
        }
        events
    }

    /// Removal callback for a single notification's expiry timer.
    pub fn expire(&mut self, id: NotificationId) -> Option<Event> {
        self.notifications.remove(id)?;
        Some(Event::NotificationExpired { id, at: self.now() })
    }

    /// Notifications that still need an expiry timer, with their deadlines.
    pub fn take_unscheduled_expiries(&mut self) -> Vec<(NotificationId, DateTime<Local>)> {
        self.notifications
            .take_unscheduled()
            .into_iter()
            .filter_map(|id| self.notifications.get(id).map(|n| (id, n.expires_at)))
            .collect()
    }

    fn post(
        &mut self,
        message: &str,
        severity: Severity,
        now: DateTime<Local>,
        events: &mut Vec<Event>,
    ) {
        let id = self.notifications.post(message, severity, now);
        events.push(Event::NotificationPosted {
            id,
            message: message.to_string(),
            severity,
            at: now,
        });
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub pomodoro: PomodoroView,
    pub habits: HabitStore,
    pub notifications: Vec<Notification>,
    pub tasks: Vec<Task>,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroView {
    pub phase: Phase,
    pub label: &'static str,
    pub remaining_secs: u32,
    pub display: String,
    pub running: bool,
    pub completed_focus_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::random::SequenceSampler;
    use chrono::{Duration, TimeZone};

    fn dashboard_at(h: u32, m: u32, samples: Vec<f64>) -> (Dashboard, ManualClock) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 1, 5, h, m, 0).unwrap());
        (
            Dashboard::new(clock.clone(), SequenceSampler::new(samples)),
            clock,
        )
    }

    fn posted(events: &[Event]) -> Vec<Severity> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::NotificationPosted { severity, .. } => Some(*severity),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn habit_intents_post_success_notifications() {
        let (mut dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        assert_eq!(posted(&dash.log_water()), [Severity::Success]);
        assert_eq!(posted(&dash.take_medicine()), [Severity::Success]);
        assert_eq!(posted(&dash.complete_walk()), [Severity::Success]);
        assert_eq!(dash.notifications().len(), 3);
    }

    #[test]
    fn repeated_medicine_posts_nothing() {
        let (mut dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        dash.take_medicine();
        assert!(dash.take_medicine().is_empty());
        assert_eq!(dash.notifications().len(), 1);
    }

    #[test]
    fn focus_completion_posts_one_success() {
        let (mut dash, _clock) = dashboard_at(14, 0, vec![0.9]);
        dash.start();
        let events: Vec<Event> = (0..1500).flat_map(|_| dash.tick_pomodoro()).collect();
        assert_eq!(posted(&events), [Severity::Success]);
        assert_eq!(
            dash.notifications()[0].message,
            Phase::Focus.completion_message()
        );
        let snap = dash.snapshot();
        assert_eq!(snap.pomodoro.phase, Phase::Break);
        assert_eq!(snap.pomodoro.display, "05:00");
        assert!(!snap.pomodoro.running);
    }

    #[test]
    fn reminders_become_notifications() {
        let (mut dash, clock) = dashboard_at(7, 0, vec![0.9]);
        dash.log_water();
        clock.set(Local.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap());

        let events = dash.run_reminders();
        assert!(events.contains(&Event::ReminderDue {
            habit: crate::habits::Habit::Water,
            at: dash.now()
        }));
        assert_eq!(posted(&events), [Severity::Info, Severity::Warning]);
    }

    #[test]
    fn expire_removes_exactly_once() {
        let (mut dash, clock) = dashboard_at(8, 0, vec![0.9]);
        dash.log_water();
        let pending = dash.take_unscheduled_expiries();
        assert_eq!(pending.len(), 1);
        let (id, deadline) = pending[0];
        assert_eq!(deadline, dash.now() + Duration::seconds(5));

        clock.advance(Duration::seconds(5));
        assert!(dash.expire(id).is_some());
        assert!(dash.expire(id).is_none());
        assert!(dash.notifications().is_empty());
    }

    #[test]
    fn task_intents_pass_through() {
        let (mut dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        dash.add_task("call back", Priority::High).unwrap();
        let id = dash.tasks()[0].id;
        dash.toggle_task(id).unwrap();
        assert!(dash.tasks()[0].completed);
        dash.delete_task(id).unwrap();
        assert!(dash.tasks().is_empty());
        assert!(dash.notifications().is_empty());
    }

    #[test]
    fn apply_dispatches_and_resolves_task_prefixes() {
        let (mut dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        dash.apply("task add high review PR".parse().unwrap()).unwrap();
        let id = dash.tasks()[0].id.to_string();

        let events = dash.apply(Intent::ToggleTask(id[..6].to_string())).unwrap();
        assert!(matches!(events[0], Event::TaskToggled { completed: true, .. }));

        assert_eq!(
            dash.apply(Intent::DeleteTask("nope".into())),
            Err(ValidationError::NoTaskMatching("nope".into()))
        );
        assert_eq!(dash.apply(Intent::Start).unwrap().len(), 1);
        assert!(dash.session().is_running());
    }

    /// Collects formatted log output for the duration of `f`.
    fn captured_logs(f: impl FnOnce()) -> String {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn every_pomodoro_intent_is_logged() {
        let (mut dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        let logs = captured_logs(|| {
            dash.start();
            dash.pause();
            dash.toggle();
            dash.reset();
        });
        for intent in ["start", "pause", "toggle", "reset"] {
            assert!(
                logs.contains(&format!("{intent} requested")),
                "missing {intent}: {logs}"
            );
        }
    }

    #[test]
    fn motivational_message_uses_its_own_sampler() {
        let (dash, _clock) = dashboard_at(8, 0, vec![0.9]);
        let mut dash = dash.with_motivation_sampler(SequenceSampler::new(vec![0.0, 0.999]));
        assert_eq!(dash.motivational_message(), MOTIVATIONAL_MESSAGES[0]);
        assert_eq!(dash.motivational_message(), MOTIVATIONAL_MESSAGES[4]);
    }

    #[test]
    fn motivational_lines_do_not_shift_walking_draws() {
        // Walking nudges on the second draw of the reminder sampler.
        let (mut dash, clock) = dashboard_at(11, 0, vec![0.5, 0.0]);
        for _ in 0..3 {
            dash.motivational_message();
        }

        let walks = |events: Vec<Event>| {
            events
                .iter()
                .filter(|e| {
                    matches!(
                        e,
                        Event::ReminderDue {
                            habit: crate::habits::Habit::Walking,
                            ..
                        }
                    )
                })
                .count()
        };
        assert_eq!(walks(dash.run_reminders()), 0);
        clock.advance(Duration::seconds(60));
        assert_eq!(walks(dash.run_reminders()), 1);
    }
}
