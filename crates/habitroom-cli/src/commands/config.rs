use std::path::PathBuf;

use clap::Subcommand;
use habitroom_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "display.clock_format", "reminders.seed")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

/// Where the config lives: an explicit `--config` path, or the default
/// data directory.
pub struct ConfigStore {
    path: Option<PathBuf>,
}

impl ConfigStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::path()?),
        }
    }

    pub fn load(&self) -> Result<Config, Box<dyn std::error::Error>> {
        match &self.path {
            Some(path) if path.exists() => Ok(Config::load_from(path)?),
            Some(_) => Ok(Config::default()),
            None => Ok(Config::load()?),
        }
    }

    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            eprintln!("warning: using default config: {e}");
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        config.save_to(&self.path()?)?;
        Ok(())
    }
}

pub fn run(action: ConfigAction, store: &ConfigStore) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = store.load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = store.load()?;
            config.set(&key, &value)?;
            store.save(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = store.load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            store.save(&Config::default())?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", store.path()?.display());
        }
    }
    Ok(())
}
