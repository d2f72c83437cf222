//! blobsim runtime prelude: convenient imports for common usage.
//!
//! ```rust
//! use blobsim_runtime::prelude::*;
//! ```

// Re-export the kernel
pub use crate::scheduler::{ScheduledEvent, Scheduler};
pub use crate::kernel::{Activation, DispatchRecord, Kernel, KernelStats};

// Re-export the simulation driver
pub use crate::config::SimulationConfig;
pub use crate::simulation::{BlobProcesses, Simulation, SimulationReport, SimulationSnapshot};

// Re-export metrics
pub use crate::metrics::{daily_census, total_growth, DailyCensus};

// Re-export from agents
pub use blobsim_agents::prelude::*;
