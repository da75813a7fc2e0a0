//! Core error types for focusflow-core.
//!
//! Nothing in the core is fatal: every error here describes a rejected
//! input or transition, and the caller is expected to report it and carry on.

use std::path::PathBuf;
use thiserror::Error;

use crate::lock::Tool;
use crate::timer::TimerState;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A command was issued in a state that does not accept it
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Input rejected at the boundary
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejected timer or lock transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// `start` while a focus session is already counting down
    #[error("timer is already running")]
    AlreadyRunning,

    /// The command needs a running timer
    #[error("timer is not running")]
    NotRunning,

    /// Settings and manual stops are refused while the lock overlay is up
    #[error("cannot {action} while the timer is {state:?}; give up from the lock screen instead")]
    LockedWhileRunning { action: &'static str, state: TimerState },

    /// `confirm` without a preceding give-up request
    #[error("no give-up request is pending")]
    NoPendingGiveUp,

    /// Confirmation minted for an earlier focus session or a superseded request
    #[error("give-up confirmation is stale")]
    StaleConfirmation,

    /// The lock-screen tool needed for this action is not the active one
    #[error("select the {0} tool first")]
    ToolNotSelected(Tool),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank task title
    #[error("title must not be empty")]
    EmptyTitle,

    /// A study session must last at least one minute
    #[error("session minutes must be positive")]
    ZeroMinutes,

    /// No task with this id
    #[error("unknown task: {0}")]
    UnknownTask(uuid::Uuid),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Delivery failure at the notification boundary. Never rolls back state.
#[derive(Error, Debug)]
#[error("notification via {channel} failed: {message}")]
pub struct NotifyError {
    pub channel: &'static str,
    pub message: String,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
