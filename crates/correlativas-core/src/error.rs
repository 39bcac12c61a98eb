//! Core error types for correlativas-core.
//!
//! The cascade engine and the stats aggregator never fail. Errors only arise
//! at the edges: normalizing backend records into a plan, enforcing the
//! session contract, and reading or writing configuration and plan files.

use std::path::PathBuf;
use thiserror::Error;

use crate::cascade::MissingPrerequisites;
use crate::course::CourseId;

/// Core error type for correlativas-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Plan normalization errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Simulation session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while turning raw backend records into course nodes.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// Two courses in the same plan share an id
    #[error("Duplicate course id in plan: {0}")]
    DuplicateCourse(CourseId),

    /// Levels are 1-based academic years
    #[error("Course {id} has invalid level {level} (levels start at 1)")]
    InvalidLevel { id: CourseId, level: u8 },

    /// The plan document could not be read or parsed
    #[error("Failed to load plan from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },
}

/// Errors raised by [`crate::session::SimulationSession`] when a caller
/// breaks the transition contract.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No course with this id exists in the session
    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    /// Blocked courses cannot be changed directly
    #[error("Course {id} is blocked: {} prerequisite(s) missing", .missing.len())]
    CourseBlocked {
        id: CourseId,
        missing: MissingPrerequisites,
    },

    /// `blocked` is derived by the cascade and cannot be requested
    #[error("State 'blocked' cannot be set manually")]
    BlockedNotAssignable,

    /// Nothing left to undo
    #[error("No transition to undo")]
    NothingToUndo,
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
