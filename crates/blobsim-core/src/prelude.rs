//! blobsim core prelude: convenient imports for common usage.
//!
//! ```rust
//! use blobsim_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    SimTime, RunId, ProcessId, BlobId,
    EventHandle, DayRhythm, Phase,
    InterruptReason, Wake,
    Suspension, ProcessState,
    SimEvent,
};

// Re-export the process protocol
pub use crate::process::{Effects, Process, ProcessContext, Step};

// Re-export the food container
pub use crate::container::{FoodContainer, GetOutcome};

// Re-export the sampler trait
pub use crate::sampler::ForagingSampler;

// Re-export error types
pub use crate::error::{ConfigError, InvariantError, Result, SimError};
