//! Core error types for habitflow-core.
//!
//! The evaluation routines themselves never fail (malformed input degrades to
//! "never occurs" or a skipped edge). [`CoreError`] covers the snapshot
//! layer; validation, share transitions, rule labels and configuration each
//! return their own error type.

use std::path::PathBuf;
use thiserror::Error;

use crate::sharing::ShareStatus;

/// Snapshot loading and record lookup errors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot file could not be read
    #[error("Failed to read snapshot at {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record lookup failed
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),

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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Reasons a repeat rule can never produce an occurrence.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDefect {
    #[error("frequency must be at least 1, got {0}")]
    NonPositiveFrequency(i32),

    #[error("unknown repeat unit")]
    UnknownUnit,

    #[error("weekly custom rule has no weekdays")]
    EmptyWeekdays,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Weekly target outside 1..=7
    #[error("Weekly target must be between 1 and 7, got {0}")]
    WeeklyTargetOutOfRange(u8),

    /// Repeat rule that can never occur
    #[error("Malformed repeat rule: {0}")]
    MalformedRule(#[from] RuleDefect),

    /// Sender and recipient are the same user
    #[error("User '{user_id}' cannot share an item with themselves")]
    SelfShare { user_id: String },

    /// Original and copy refer to the same record
    #[error("Share copy must be a distinct item from the original '{item_id}'")]
    CopyIsOriginal { item_id: String },
}

/// Share edge lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareTransitionError {
    #[error("Invalid share transition: {from:?} -> {to:?}")]
    InvalidTransition { from: ShareStatus, to: ShareStatus },

    #[error("Share '{edge_id}' has no copy reference; run the copy backfill first")]
    MissingCopy { edge_id: String },
}

/// Repeat rule label parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("unrecognized repeat rule: {0}")]
    Unrecognized(String),

    #[error("invalid frequency '{0}'")]
    InvalidFrequency(String),

    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("unknown repeat unit '{0}'")]
    UnknownUnit(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
