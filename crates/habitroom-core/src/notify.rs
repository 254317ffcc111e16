//! Notification center.
//!
//! Holds transient messages in creation order. Each notification carries its
//! own expiry deadline; removal is performed by a timer scheduled per
//! notification (see `runtime` and `sim`), never by sweeping the collection.
//! Posting queues the new id until a driver picks it up via
//! [`NotificationCenter::take_unscheduled`].

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a notification stays visible.
pub const NOTIFICATION_LIFETIME_SECS: i64 = 5;

pub fn notification_lifetime() -> Duration {
    Duration::seconds(NOTIFICATION_LIFETIME_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Local>,
    pub expires_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
    next_id: u64,
    unscheduled: Vec<NotificationId>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification created at `now`.
    pub fn post(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: DateTime<Local>,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
            expires_at: now + notification_lifetime(),
        };
        tracing::debug!(%id, ?severity, message = %notification.message, "notification posted");
        self.entries.push(notification);
        self.unscheduled.push(id);
        id
    }

    /// Current notifications, oldest first.
    pub fn list(&self) -> &[Notification] {
        &self.entries
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Remove a single notification. Returns `None` if it is already gone,
    /// so a second removal of the same id is harmless.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        self.unscheduled.retain(|pending| *pending != id);
        let pos = self.entries.iter().position(|n| n.id == id)?;
        let removed = self.entries.remove(pos);
        tracing::debug!(%id, "notification removed");
        Some(removed)
    }

    /// Drain ids whose expiry timer has not been scheduled yet.
    pub fn take_unscheduled(&mut self) -> Vec<NotificationId> {
        std::mem::take(&mut self.unscheduled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
