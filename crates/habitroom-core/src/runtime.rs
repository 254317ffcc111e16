//! Live tokio driver for a [`Dashboard`].
//!
//! Three kinds of task run against the shared dashboard:
//!
//! - a 1 s pomodoro ticker, alive only while the session is running
//! - a 60 s habit reminder ticker, alive for the runtime's whole life
//! - one expiry task per notification, sleeping out its lifetime
//!
//! Every task is registered with an [`AbortHandle`]. `pause()`/`reset()`
//! abort the ticker while holding the dashboard lock, and the ticker
//! re-checks its generation under that same lock before decrementing, so a
//! tick that was already waiting can never land after a pause.
//! [`DashboardRuntime::shutdown`] (also run on drop) aborts everything.
//!
//! The dashboard lock is a `std::sync::Mutex`; it is never held across an
//! `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::dashboard::{Dashboard, DashboardSnapshot};
use crate::error::ValidationError;
use crate::events::Event;
use crate::habits::REMINDER_PERIOD_SECS;
use crate::intent::Intent;
use crate::notify::{NotificationId, NOTIFICATION_LIFETIME_SECS};

pub const POMODORO_TICK: Duration = Duration::from_secs(1);
pub const HABIT_TICK: Duration = Duration::from_secs(REMINDER_PERIOD_SECS);
const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(NOTIFICATION_LIFETIME_SECS as u64);
const EVENT_CHANNEL_CAPACITY: usize = 256;

struct Shared {
    dashboard: Mutex<Dashboard>,
    pomodoro: Mutex<Option<AbortHandle>>,
    /// Bumped whenever a pomodoro ticker is spawned or cancelled.
    pomodoro_generation: AtomicU64,
    expiries: Mutex<HashMap<NotificationId, AbortHandle>>,
    events: broadcast::Sender<Event>,
}

/// Owns the background tasks driving a dashboard.
pub struct DashboardRuntime {
    shared: Arc<Shared>,
    habit_task: Option<AbortHandle>,
}

impl DashboardRuntime {
    /// Take ownership of `dashboard` and start the habit ticker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(dashboard: Dashboard) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Arc::new(Shared {
            dashboard: Mutex::new(dashboard),
            pomodoro: Mutex::new(None),
            pomodoro_generation: AtomicU64::new(0),
            expiries: Mutex::new(HashMap::new()),
            events,
        });
        let habit_task = tokio::spawn(habit_loop(Arc::clone(&shared))).abort_handle();
        tracing::debug!("dashboard runtime started");
        Self {
            shared,
            habit_task: Some(habit_task),
        }
    }

    /// Receive every event, from intents and from the background tasks alike.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Run `f` against the dashboard under its lock.
    pub fn read<R>(&self, f: impl FnOnce(&Dashboard) -> R) -> R {
        f(&lock(&self.shared.dashboard))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.read(Dashboard::snapshot)
    }

    pub fn apply(&self, intent: Intent) -> Result<Vec<Event>, ValidationError> {
        let events = {
            let mut dashboard = lock(&self.shared.dashboard);
            let events = dashboard.apply(intent)?;
            sync_timers(&self.shared, &mut dashboard);
            events
        };
        publish(&self.shared, &events);
        Ok(events)
    }

    pub fn motivational_message(&self) -> &'static str {
        lock(&self.shared.dashboard).motivational_message()
    }

    /// Whether a pomodoro ticker task is currently scheduled.
    pub fn is_ticking(&self) -> bool {
        lock(&self.shared.pomodoro).is_some()
    }

    /// Notifications whose expiry task has not fired yet.
    pub fn pending_expiries(&self) -> usize {
        lock(&self.shared.expiries).len()
    }

    /// Abort every background task. Returns how many expiry timers were
    /// still outstanding. Safe to call more than once.
    pub fn shutdown(&mut self) -> usize {
        if let Some(handle) = self.habit_task.take() {
            handle.abort();
        }
        let _dashboard = lock(&self.shared.dashboard);
        cancel_pomodoro(&self.shared);
        let mut expiries = lock(&self.shared.expiries);
        let outstanding = expiries.len();
        for (_, handle) in expiries.drain() {
            handle.abort();
        }
        if outstanding > 0 {
            tracing::debug!(outstanding, "expiry timers cancelled");
        }
        outstanding
    }
}

impl Drop for DashboardRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish(shared: &Shared, events: &[Event]) {
    for event in events {
        // No subscribers is fine.
        let _ = shared.events.send(event.clone());
    }
}

/// Align background tasks with dashboard state. Call with the dashboard
/// lock held.
fn sync_timers(shared: &Arc<Shared>, dashboard: &mut Dashboard) {
    if dashboard.session().is_running() {
        let mut pomodoro = lock(&shared.pomodoro);
        if pomodoro.is_none() {
            let generation = shared.pomodoro_generation.fetch_add(1, Ordering::SeqCst) + 1;
            let task = tokio::spawn(pomodoro_loop(Arc::clone(shared), generation));
            *pomodoro = Some(task.abort_handle());
            tracing::debug!(generation, "pomodoro ticker started");
        }
    } else {
        cancel_pomodoro(shared);
    }

    let pending = dashboard.take_unscheduled_expiries();
    if pending.is_empty() {
        return;
    }
    let mut expiries = lock(&shared.expiries);
    for (id, _deadline) in pending {
        let task = tokio::spawn(expire_after(Arc::clone(shared), id));
        expiries.insert(id, task.abort_handle());
    }
}

fn cancel_pomodoro(shared: &Shared) {
    if let Some(handle) = lock(&shared.pomodoro).take() {
        shared.pomodoro_generation.fetch_add(1, Ordering::SeqCst);
        handle.abort();
        tracing::debug!("pomodoro ticker cancelled");
    }
}

async fn pomodoro_loop(shared: Arc<Shared>, generation: u64) {
    let mut interval = time::interval_at(Instant::now() + POMODORO_TICK, POMODORO_TICK);
    loop {
        interval.tick().await;
        let events = {
            let mut dashboard = lock(&shared.dashboard);
            if shared.pomodoro_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let events = dashboard.tick_pomodoro();
            sync_timers(&shared, &mut dashboard);
            events
        };
        publish(&shared, &events);
    }
}

async fn habit_loop(shared: Arc<Shared>) {
    let mut interval = time::interval_at(Instant::now() + HABIT_TICK, HABIT_TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let events = {
            let mut dashboard = lock(&shared.dashboard);
            let events = dashboard.run_reminders();
            sync_timers(&shared, &mut dashboard);
            events
        };
        publish(&shared, &events);
    }
}

async fn expire_after(shared: Arc<Shared>, id: NotificationId) {
    time::sleep(NOTIFICATION_LIFETIME).await;
    let event = {
        let mut dashboard = lock(&shared.dashboard);
        let event = dashboard.expire(id);
        lock(&shared.expiries).remove(&id);
        event
    };
    if let Some(event) = event {
        publish(&shared, &[event]);
    }
}
