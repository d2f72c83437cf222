//! Concrete foraging samplers.
//!
//! `UniformForaging` is what a real run uses: integer search times drawn
//! uniformly from `[1, upper]` with a seeded ChaCha stream, so a seed
//! reproduces a run exactly. The other two are for tests and experiments.

use blobsim_core::sampler::ForagingSampler;
use blobsim_core::types::SimTime;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// Uniform integer search times in `[1, upper]`.
pub struct UniformForaging {
    rng: ChaCha12Rng,
    upper: SimTime,
}

impl UniformForaging {
    pub fn new(seed: u64, upper: SimTime) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
            upper: upper.max(1),
        }
    }
}

impl ForagingSampler for UniformForaging {
    fn sample(&mut self) -> SimTime {
        self.rng.gen_range(1..=self.upper)
    }
}

/// Always the same search time.
#[derive(Debug, Clone, Copy)]
pub struct FixedForaging(pub SimTime);

impl ForagingSampler for FixedForaging {
    fn sample(&mut self) -> SimTime {
        self.0
    }
}

/// Replays a fixed script of search times, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedForaging {
    script: Vec<SimTime>,
    cursor: usize,
}

impl ScriptedForaging {
    pub fn new(script: Vec<SimTime>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl ForagingSampler for ScriptedForaging {
    fn sample(&mut self) -> SimTime {
        if self.script.is_empty() {
            return 1;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value
    }
}
