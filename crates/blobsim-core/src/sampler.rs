//! Foraging-time sampling.
//!
//! The kernel never draws random numbers itself. How long a blob searches
//! before it finds food comes from an injected sampler, so a run is fully
//! determined by its configuration plus the sampler's output sequence.

use crate::types::SimTime;

/// Produces foraging durations.
pub trait ForagingSampler {
    /// Time until the next food item is found. Callers clamp the result to
    /// the daylight window.
    fn sample(&mut self) -> SimTime;
}

impl<F> ForagingSampler for F
where
    F: FnMut() -> SimTime,
{
    fn sample(&mut self) -> SimTime {
        self()
    }
}
