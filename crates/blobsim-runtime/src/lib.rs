//! # blobsim runtime
//!
//! The discrete-event kernel and the simulation driver.
//!
//! The [`scheduler`] keeps the logical clock and the ordered event queue.
//! The [`kernel`] owns the processes and the world they share, dispatches
//! events one at a time and implements the interrupt protocol. The
//! [`simulation`] module wires a forest and a blob population onto a kernel
//! and runs it to a horizon.

pub mod scheduler;
pub mod kernel;
pub mod config;
pub mod simulation;
pub mod metrics;
pub mod prelude;
