//! blobsim agents prelude: convenient imports for common usage.
//!
//! ```rust
//! use blobsim_agents::prelude::*;
//! ```

// Re-export agent types
pub use crate::blob::Blob;
pub use crate::habitat::Habitat;
pub use crate::forest::ForestCycle;
pub use crate::hunt::{HuntProcess, HuntState};
pub use crate::sleep::SleepProcess;
pub use crate::sampler::{FixedForaging, ScriptedForaging, UniformForaging};

// Re-export from core
pub use blobsim_core::prelude::*;
