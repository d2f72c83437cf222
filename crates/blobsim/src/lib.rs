//! # blobsim
//!
//! A discrete-event simulation of a blob population competing for food in
//! a forest that follows a day/night rhythm.
//!
//! Time is a logical clock that jumps from event to event. Every actor is a
//! process that runs until it suspends on a timer or on the food container.
//! At nightfall each blob's sleep process interrupts its hunt, and blobs
//! that did not eat enough that day die.
//!
//! ## Quick Start
//!
//! ```rust
//! use blobsim::prelude::*;
//!
//! let config = SimulationConfig::default()
//!     .with_population(10)
//!     .with_days(3)
//!     .with_seed(7);
//!
//! let mut sim = Simulation::new(config).unwrap();
//! let report = sim.run().unwrap();
//!
//! println!("{} of {} blobs survived", report.survivors, report.initial_population);
//! for day in &report.census {
//!     println!("day {}: {} meals, {} deaths", day.day, day.meals, day.deaths);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`blobsim_core`] - Shared types, errors, the `Process` trait and the food container
//! - [`blobsim_agents`] - The habitat, the forest cycle and the blob hunt/sleep processes
//! - [`blobsim_runtime`] - Scheduler, kernel, configuration and the simulation driver
//!
//! ## Custom Foraging
//!
//! The time a blob spends searching is drawn from an injected sampler. Any
//! `FnMut() -> SimTime` works:
//!
//! ```rust
//! use blobsim::prelude::*;
//!
//! let config = SimulationConfig::default().with_population(1).with_days(1);
//! let mut sim = Simulation::with_sampler(config, Box::new(|| 60u64)).unwrap();
//! sim.run().unwrap();
//! assert!(sim.blobs()[0].is_alive());
//! ```

// Re-export all subcrates
pub use blobsim_core as core;
pub use blobsim_runtime as runtime;
pub use blobsim_agents as agents;

/// Prelude module for convenient imports.
///
/// ```rust
/// use blobsim::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use blobsim_core::types::{
        SimTime, RunId, ProcessId, BlobId,
        EventHandle, DayRhythm, Phase,
        InterruptReason, Wake,
        Suspension, ProcessState,
        SimEvent,
    };

    // Core traits
    pub use blobsim_core::process::{Process, ProcessContext, Step};
    pub use blobsim_core::sampler::ForagingSampler;
    pub use blobsim_core::container::{FoodContainer, GetOutcome};

    // Error types
    pub use blobsim_core::error::{ConfigError, InvariantError, Result, SimError};

    // Agents
    pub use blobsim_agents::blob::Blob;
    pub use blobsim_agents::habitat::Habitat;
    pub use blobsim_agents::forest::ForestCycle;
    pub use blobsim_agents::hunt::{HuntProcess, HuntState};
    pub use blobsim_agents::sleep::SleepProcess;
    pub use blobsim_agents::sampler::{FixedForaging, ScriptedForaging, UniformForaging};

    // Runtime
    pub use blobsim_runtime::kernel::{Kernel, KernelStats};
    pub use blobsim_runtime::config::SimulationConfig;
    pub use blobsim_runtime::simulation::{Simulation, SimulationReport, SimulationSnapshot};
    pub use blobsim_runtime::metrics::DailyCensus;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
