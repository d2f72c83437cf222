//! Error types for blobsim operations.
//!
//! Configuration problems are reported before the first event runs.
//! Invariant violations abort the run that hit them. Missed interrupts are
//! not errors at all: the kernel counts and logs them.

use crate::types::{BlobId, ProcessId, SimTime};
use std::error::Error;
use std::fmt;

/// Result type for blobsim operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The simulation was configured with unusable parameters.
    Config(ConfigError),
    /// A kernel or container invariant was violated.
    Invariant(InvariantError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "Config error: {}", e),
            SimError::Invariant(e) => write!(f, "Invariant violated: {}", e),
        }
    }
}

impl Error for SimError {}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<InvariantError> for SimError {
    fn from(e: InvariantError) -> Self {
        SimError::Invariant(e)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A duration, rate or requirement that must be strictly positive is zero.
    NonPositive(String),
    /// Invalid value.
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(field) => write!(f, "{} must be greater than zero", field),
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value for {}: {} ({})", field, value, reason)
            }
        }
    }
}

/// Invariant violations. These are programming errors and end the run.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantError {
    /// Container level left `[0, capacity]`.
    LevelOutOfBounds { level: u64, capacity: u64 },
    /// A `get` asked for more than the container can ever hold.
    RequestExceedsCapacity { requested: u64, capacity: u64 },
    /// `now + delay` does not fit in the clock.
    ClockOverflow { now: SimTime, delay: SimTime },
    /// An activation or interrupt named a process that was never spawned.
    UnknownProcess(ProcessId),
    /// A process was resumed while it was already executing.
    ReentrantResume(ProcessId),
    /// A blob index outside the roster.
    UnknownBlob(BlobId),
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::LevelOutOfBounds { level, capacity } => {
                write!(f, "container level {} outside [0, {}]", level, capacity)
            }
            InvariantError::RequestExceedsCapacity {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "get of {} can never be fulfilled (capacity {})",
                    requested, capacity
                )
            }
            InvariantError::ClockOverflow { now, delay } => {
                write!(f, "clock overflow scheduling {} after t={}", delay, now)
            }
            InvariantError::UnknownProcess(id) => write!(f, "unknown process {}", id.0),
            InvariantError::ReentrantResume(id) => {
                write!(f, "process {} resumed while already running", id.0)
            }
            InvariantError::UnknownBlob(id) => write!(f, "unknown blob {}", id.0),
        }
    }
}

// Convenience constructors
impl SimError {
    pub fn non_positive(field: impl Into<String>) -> Self {
        SimError::Config(ConfigError::NonPositive(field.into()))
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SimError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// Whether this error came from configuration rather than from a run.
    pub fn is_config(&self) -> bool {
        matches!(self, SimError::Config(_))
    }
}
