//! # blobsim agents
//!
//! The processes the kernel drives, and the world they share:
//!
//! - **Habitat**: food container, day/night phase, blob roster, foraging sampler
//! - **ForestCycle**: alternates daylight and night, grows food at every dusk
//! - **HuntProcess**: a blob's opportunistic foraging loop
//! - **SleepProcess**: ends each day by calling the blob home and judging survival
//!
//! Every blob runs one hunt and one sleep process. The sleep process is
//! spawned first so that at dusk it always runs before the hunt timer that
//! falls on the same instant.

pub mod blob;
pub mod habitat;
pub mod forest;
pub mod hunt;
pub mod sleep;
pub mod sampler;
pub mod prelude;
