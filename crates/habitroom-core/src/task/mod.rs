//! Priority task list.
//!
//! Plain CRUD records owned by the dashboard. Nothing in the timer or habit
//! engines reads them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::events::Event;

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("invalid priority: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Local>,
}

/// Tasks in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task. Surrounding whitespace is trimmed; blank text is rejected.
    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        at: DateTime<Local>,
    ) -> Result<Event, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let task = Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            priority,
            created_at: at,
        };
        let event = Event::TaskAdded {
            id: task.id,
            text: task.text.clone(),
            at,
        };
        self.tasks.push(task);
        Ok(event)
    }

    pub fn toggle(&mut self, id: Uuid, at: DateTime<Local>) -> Result<Event, ValidationError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ValidationError::UnknownTask(id))?;
        task.completed = !task.completed;
        Ok(Event::TaskToggled {
            id,
            completed: task.completed,
            at,
        })
    }

    pub fn delete(&mut self, id: Uuid, at: DateTime<Local>) -> Result<Event, ValidationError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ValidationError::UnknownTask(id))?;
        self.tasks.remove(pos);
        Ok(Event::TaskDeleted { id, at })
    }

    /// Find a task by a unique id prefix, as typed at a prompt.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<Uuid> {
        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task.id),
            _ => None,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}
