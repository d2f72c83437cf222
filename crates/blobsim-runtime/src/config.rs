//! Simulation parameters.

use blobsim_core::error::{Result, SimError};
use blobsim_core::types::{DayRhythm, SimTime};
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of blobs at the start (default: 100).
    pub population: usize,
    /// Food in the forest at t=0 (default: 70).
    pub initial_food: u64,
    /// Most food the forest can hold (default: 7000).
    pub capacity: u64,
    /// Food grown every night (default: 70).
    pub production_rate: u64,
    /// Length of the day in minutes (default: 720).
    pub daylight: SimTime,
    /// Length of the night in minutes (default: 720).
    pub nighttime: SimTime,
    /// Number of full days to simulate (default: 2).
    pub days: u64,
    /// Units each blob must eat per day to survive (default: 1).
    pub food_requirement: u64,
    /// Rest after each meal (default: 20).
    pub post_meal_rest: SimTime,
    /// Upper bound of the uniform foraging time (default: 720).
    pub foraging_upper_bound: SimTime,
    /// Seed of the foraging sampler (default: 0).
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 100,
            initial_food: 70,
            capacity: 7000,
            production_rate: 70,
            daylight: 720,
            nighttime: 720,
            days: 2,
            food_requirement: 1,
            post_meal_rest: 20,
            foraging_upper_bound: 720,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_initial_food(mut self, initial_food: u64) -> Self {
        self.initial_food = initial_food;
        self
    }

    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_production_rate(mut self, production_rate: u64) -> Self {
        self.production_rate = production_rate;
        self
    }

    pub fn with_rhythm(mut self, daylight: SimTime, nighttime: SimTime) -> Self {
        self.daylight = daylight;
        self.nighttime = nighttime;
        self
    }

    pub fn with_days(mut self, days: u64) -> Self {
        self.days = days;
        self
    }

    pub fn with_food_requirement(mut self, food_requirement: u64) -> Self {
        self.food_requirement = food_requirement;
        self
    }

    pub fn with_post_meal_rest(mut self, post_meal_rest: SimTime) -> Self {
        self.post_meal_rest = post_meal_rest;
        self
    }

    pub fn with_foraging_upper_bound(mut self, upper: SimTime) -> Self {
        self.foraging_upper_bound = upper;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn rhythm(&self) -> DayRhythm {
        DayRhythm::new(self.daylight, self.nighttime)
    }

    /// Last instant of the run: `days` full day/night cycles.
    pub fn horizon(&self) -> Result<SimTime> {
        self.daylight
            .checked_add(self.nighttime)
            .and_then(|day| day.checked_mul(self.days))
            .ok_or_else(|| {
                SimError::invalid_config("days", self.days.to_string(), "horizon overflows the clock")
            })
    }

    /// Reject parameters the model cannot run with.
    ///
    /// A population of zero and a production rate of zero are both valid.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("capacity", self.capacity),
            ("daylight", self.daylight),
            ("nighttime", self.nighttime),
            ("days", self.days),
            ("food_requirement", self.food_requirement),
            ("post_meal_rest", self.post_meal_rest),
            ("foraging_upper_bound", self.foraging_upper_bound),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(SimError::non_positive(*field));
        }
        if self.initial_food > self.capacity {
            return Err(SimError::invalid_config(
                "initial_food",
                self.initial_food.to_string(),
                format!("exceeds capacity {}", self.capacity),
            ));
        }
        self.horizon()?;
        Ok(())
    }
}
