mod config;

pub use config::{ClockFormat, Config, DisplayConfig, LogConfig, ReminderConfig};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Directory holding `config.toml`, created on first use.
///
/// `~/.config/habitroom`, or `~/.config/habitroom-dev` when
/// `HABITROOM_ENV=dev`.
///
/// # Errors
/// Returns [`ConfigError::DirUnavailable`] naming the directory if it cannot
/// be created.
pub fn data_dir() -> Result<PathBuf> {
    let name = dir_name(std::env::var("HABITROOM_ENV").ok().as_deref());
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(name);
    ensure_dir(dir)
}

fn dir_name(env: Option<&str>) -> &'static str {
    match env {
        Some("dev") => "habitroom-dev",
        _ => "habitroom",
    }
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&dir) {
        Ok(()) => Ok(dir),
        Err(e) => Err(ConfigError::DirUnavailable {
            message: e.to_string(),
            path: dir,
        }
        .into()),
    }
}
