//! Core error types for habitcoach-core.
//!
//! Missing or insufficient data is never an error here: analyzers simply
//! return fewer findings. These types cover malformed caller input,
//! configuration IO and collaborator failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitcoach-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot collaborator errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Reminder refresh errors
    #[error("Refresh error: {0}")]
    Refresh(#[from] RefreshError),
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Dot-path key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A calendar date did not parse as `yyyy-MM-dd`
    #[error("Invalid date '{value}': expected yyyy-MM-dd")]
    InvalidDate { value: String },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

/// Failures reported by a snapshot collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// The backing store could not be read
    #[error("Snapshot unavailable for user '{user_id}': {message}")]
    Unavailable { user_id: String, message: String },

    /// The store answered but part of the day's data is missing
    #[error("Snapshot incomplete: missing {0}")]
    Incomplete(String),
}

/// A reminder refresh that was not applied. The previous queue is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefreshError {
    #[error("Reminder refresh failed, keeping previous queue: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
