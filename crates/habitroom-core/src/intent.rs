//! User intents forwarded by the presentation layer.
//!
//! Intents have a one-line text form so the CLI prompt and simulation
//! scripts share a single parser:
//!
//! ```text
//! start | pause | toggle | reset
//! water | medicine | walk
//! task add [low|medium|high] <text>
//! task toggle <id-prefix>
//! task rm <id-prefix>
//! ```

use std::str::FromStr;

use crate::error::ValidationError;
use crate::task::Priority;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Toggle,
    Reset,
    LogWater,
    TakeMedicine,
    CompleteWalk,
    AddTask { text: String, priority: Priority },
    /// Task identified by a unique prefix of its id.
    ToggleTask(String),
    DeleteTask(String),
}

impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let unknown = || ValidationError::UnknownIntent(line.to_string());
        let (head, rest) = split_word(line);

        let intent = match head {
            "start" => Intent::Start,
            "pause" => Intent::Pause,
            "toggle" => Intent::Toggle,
            "reset" => Intent::Reset,
            "water" => Intent::LogWater,
            "medicine" => Intent::TakeMedicine,
            "walk" => Intent::CompleteWalk,
            "task" => {
                let (verb, arg) = split_word(rest);
                match verb {
                    "add" => {
                        let (first, remainder) = split_word(arg);
                        match first.parse::<Priority>() {
                            Ok(priority) => Intent::AddTask {
                                text: remainder.to_string(),
                                priority,
                            },
                            Err(_) => Intent::AddTask {
                                text: arg.to_string(),
                                priority: Priority::default(),
                            },
                        }
                    }
                    "toggle" if !arg.is_empty() => Intent::ToggleTask(arg.to_string()),
                    "rm" | "delete" if !arg.is_empty() => Intent::DeleteTask(arg.to_string()),
                    _ => return Err(unknown()),
                }
            }
            _ => return Err(unknown()),
        };

        // Bare commands take no arguments.
        if head != "task" && !rest.is_empty() {
            return Err(unknown());
        }
        Ok(intent)
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!("start".parse::<Intent>().unwrap(), Intent::Start);
        assert_eq!("  water ".parse::<Intent>().unwrap(), Intent::LogWater);
        assert_eq!("walk".parse::<Intent>().unwrap(), Intent::CompleteWalk);
        assert!("start now".parse::<Intent>().is_err());
        assert!("dance".parse::<Intent>().is_err());
    }

    #[test]
    fn parses_task_add_with_optional_priority() {
        assert_eq!(
            "task add high ship release".parse::<Intent>().unwrap(),
            Intent::AddTask {
                text: "ship release".into(),
                priority: Priority::High
            }
        );
        assert_eq!(
            "task add buy milk".parse::<Intent>().unwrap(),
            Intent::AddTask {
                text: "buy milk".into(),
                priority: Priority::Medium
            }
        );
    }

    #[test]
    fn task_toggle_and_rm_need_an_id() {
        assert_eq!(
            "task toggle 3fa8".parse::<Intent>().unwrap(),
            Intent::ToggleTask("3fa8".into())
        );
        assert_eq!(
            "task rm 3fa8".parse::<Intent>().unwrap(),
            Intent::DeleteTask("3fa8".into())
        );
        assert!("task toggle".parse::<Intent>().is_err());
        assert!("task".parse::<Intent>().is_err());
    }
}
