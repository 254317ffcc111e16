//! Plain-text rendering of dashboard snapshots and events.

use habitroom_core::{ClockFormat, DashboardSnapshot, Event, Habit, Severity, Task};

pub struct Renderer {
    clock_format: ClockFormat,
}

impl Renderer {
    pub fn new(clock_format: ClockFormat) -> Self {
        Self { clock_format }
    }

    pub fn status(&self, snap: &DashboardSnapshot) -> String {
        let p = &snap.pomodoro;
        let habits = &snap.habits;
        let mut out = Vec::new();

        out.push(format!("[{}]", snap.at.format(self.clock_format.pattern())));
        out.push(format!(
            "{}  {}  {}  (sessions: {})",
            p.label,
            p.display,
            if p.running { "running" } else { "paused" },
            p.completed_focus_count
        ));
        out.push(format!(
            "water {}/{}  medicine {}  walk {}",
            habits.water().count(),
            habits.water().target(),
            check(habits.medicine().taken()),
            check(habits.walking().done()),
        ));
        for n in &snap.notifications {
            out.push(format!("{} {} {}", n.id, severity_tag(n.severity), n.message));
        }
        out.join("\n")
    }

    pub fn tasks(&self, tasks: &[Task]) -> String {
        if tasks.is_empty() {
            return "no tasks".to_string();
        }
        tasks
            .iter()
            .map(|t| {
                let id = t.id.to_string();
                format!(
                    "{} [{}] {:<6} {}",
                    &id[..8],
                    if t.completed { "x" } else { " " },
                    t.priority.to_string(),
                    t.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One line per event, or `None` for events not worth showing live.
    pub fn event(&self, event: &Event) -> Option<String> {
        let line = match event {
            Event::TimerStarted {
                remaining_secs, at, ..
            } => format!("{} timer started, {}s left", self.time(at), remaining_secs),
            Event::TimerPaused {
                remaining_secs, at, ..
            } => format!("{} timer paused, {}s left", self.time(at), remaining_secs),
            Event::TimerReset { at, .. } => format!("{} timer reset", self.time(at)),
            Event::PhaseCompleted {
                completed, next, at, ..
            } => format!(
                "{} {} finished, next: {}",
                self.time(at),
                completed.label(),
                next.label()
            ),
            Event::ReminderDue { habit, at } => {
                format!("{} reminder: {}", self.time(at), habit_name(*habit))
            }
            Event::NotificationPosted {
                id,
                message,
                severity,
                at,
            } => format!(
                "{} {} {} {}",
                self.time(at),
                id,
                severity_tag(*severity),
                message
            ),
            Event::NotificationExpired { id, at } => format!("{} {} expired", self.time(at), id),
            Event::TaskAdded { text, at, .. } => format!("{} task added: {}", self.time(at), text),
            Event::HabitLogged { .. } | Event::TaskToggled { .. } | Event::TaskDeleted { .. } => {
                return None
            }
        };
        Some(line)
    }

    fn time(&self, at: &chrono::DateTime<chrono::Local>) -> String {
        at.format(self.clock_format.pattern()).to_string()
    }
}

fn check(done: bool) -> &'static str {
    if done {
        "done"
    } else {
        "pending"
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[info]",
        Severity::Warning => "[warn]",
        Severity::Success => "[ok]",
    }
}

fn habit_name(habit: Habit) -> &'static str {
    match habit {
        Habit::Water => "water",
        Habit::Medicine => "medicine",
        Habit::Walking => "walking",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use habitroom_core::{Dashboard, ManualClock, NotificationId, SequenceSampler};

    fn renderer() -> Renderer {
        Renderer::new(ClockFormat::H24)
    }

    #[test]
    fn status_shows_countdown_and_habits() {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());
        let mut dash = Dashboard::new(clock, SequenceSampler::new(vec![0.5]));
        dash.log_water();

        let text = renderer().status(&dash.snapshot());
        assert!(text.starts_with("[08:00:00]"));
        assert!(text.contains("Focus Time  25:00  paused  (sessions: 0)"));
        assert!(text.contains("water 1/8  medicine pending  walk pending"));
        assert!(text.contains("#1 [ok] Great! Water logged 💧"));
    }

    #[test]
    fn twelve_hour_clock() {
        let at = Local.with_ymd_and_hms(2026, 1, 5, 15, 4, 5).unwrap();
        let line = Renderer::new(ClockFormat::H12)
            .event(&Event::NotificationExpired {
                id: NotificationId(3),
                at,
            })
            .unwrap();
        assert_eq!(line, "03:04:05 PM #3 expired");
    }

    #[test]
    fn quiet_events_are_skipped() {
        let at = Local.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert!(renderer()
            .event(&Event::HabitLogged {
                habit: Habit::Water,
                at
            })
            .is_none());
    }

    #[test]
    fn empty_task_list() {
        assert_eq!(renderer().tasks(&[]), "no tasks");
    }
}
