//! # blobsim core
//!
//! Core types and the process protocol shared by every blobsim crate:
//!
//! - **types**: logical time, identifiers, event handles, process states, reporting events
//! - **process**: the `Process` state-machine trait and the `ProcessContext` it runs with
//! - **container**: the depletable `FoodContainer` with FIFO waiters
//! - **sampler**: the injected `ForagingSampler` strategy
//! - **error**: configuration and invariant errors
//!
//! ## Quick Start
//!
//! ```rust
//! use blobsim_core::prelude::*;
//!
//! let mut food = FoodContainer::new(1000, 0).unwrap();
//! food.put(70).unwrap();
//! assert_eq!(food.level(), 70);
//!
//! assert_eq!(food.get(1, ProcessId(0)).unwrap(), GetOutcome::Granted);
//! assert_eq!(food.level(), 69);
//! ```

pub mod types;
pub mod process;
pub mod container;
pub mod sampler;
pub mod error;
pub mod prelude;
