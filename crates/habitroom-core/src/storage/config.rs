//! TOML-based application configuration.
//!
//! Only ambient settings live here: log filtering, the random seed for the
//! walking nudge and display preferences. Timer durations and reminder
//! schedules are fixed constants and are not configurable.
//!
//! Configuration is stored at `~/.config/habitroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `HABITROOM_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Reminder engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Fixed seed for the walking nudge. Unset means OS randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockFormat {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

impl ClockFormat {
    /// chrono format string for wall-clock times.
    pub fn pattern(self) -> &'static str {
        match self {
            ClockFormat::H24 => "%H:%M:%S",
            ClockFormat::H12 => "%I:%M:%S %p",
        }
    }
}

/// Display configuration for the CLI dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_motivation: bool,
    #[serde(default)]
    pub clock_format: ClockFormat,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitroom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_log_filter() -> String {
    "habitroom=info".into()
}
fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_motivation: true,
            clock_format: ClockFormat::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|e| invalid(e.to_string()))?;
                        serde_json::Value::Number(n.into())
                    }
                    // Unset optionals: take the value as JSON if it parses, else as a string.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot set a whole section".into()));
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `config.toml` inside the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = toml::from_str(&content).map_err(ConfigError::from)?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.log.filter, "habitroom=info");
        assert!(parsed.display.show_motivation);
        assert_eq!(parsed.reminders.seed, None);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[display]\nclock_format = \"12h\"\n").unwrap();
        assert_eq!(parsed.display.clock_format, ClockFormat::H12);
        assert!(parsed.display.show_motivation);
        assert_eq!(parsed.log.filter, "habitroom=info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.show_motivation").as_deref(), Some("true"));
        assert_eq!(cfg.get("display.clock_format").as_deref(), Some("24h"));
        assert_eq!(cfg.get("reminders.seed").as_deref(), Some("null"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("display.show_motivation", "false").unwrap();
        cfg.set("reminders.seed", "42").unwrap();
        cfg.set("log.filter", "habitroom=debug").unwrap();
        cfg.set("display.clock_format", "12h").unwrap();

        assert!(!cfg.display.show_motivation);
        assert_eq!(cfg.reminders.seed, Some(42));
        assert_eq!(cfg.log.filter, "habitroom=debug");
        assert_eq!(cfg.display.clock_format, ClockFormat::H12);

        cfg.set("reminders.seed", "7").unwrap();
        assert_eq!(cfg.reminders.seed, Some(7));
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("display.nonexistent", "x").is_err());
        assert!(cfg.set("display.show_motivation", "maybe").is_err());
        assert!(cfg.set("display.clock_format", "36h").is_err());
        assert!(cfg.set("display", "{}").is_err());
        assert!(cfg.set("", "x").is_err());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("reminders.seed", "99").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.reminders.seed, Some(99));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log = 5").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
