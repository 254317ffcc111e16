//! Core error types for habitroom-core.
//!
//! The engines themselves are infallible: their state sits behind methods that
//! keep every invariant by construction. Errors only arise at the edges --
//! task intents from the presentation layer, configuration files and
//! simulation scripts.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for habitroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// The configuration directory could not be created
    #[error("Cannot use configuration directory {path}: {message}")]
    DirUnavailable { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Task text was empty after trimming
    #[error("Task text must not be empty")]
    EmptyText,

    /// No task with the given id
    #[error("Unknown task: {0}")]
    UnknownTask(Uuid),

    /// No task id starts with the given prefix, or more than one does
    #[error("No single task matches '{0}'")]
    NoTaskMatching(String),

    /// An intent line could not be understood
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    /// A simulation script line could not be understood
    #[error("Invalid script at line {line}: {message}")]
    InvalidScript { line: usize, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
