//! Simulation driver: builds the habitat and its processes, runs the
//! clock, and reports.
//!
//! Construction order matters for same-instant dispatch: the forest is
//! spawned first, then for every blob its sleep process and then its hunt
//! process. At dusk the forest therefore grows food before any blob is
//! judged, and a blob's sleep process always runs before a hunt timer
//! expiring at the same instant.

use crate::config::SimulationConfig;
use crate::kernel::{DispatchRecord, Kernel, KernelStats};
use crate::metrics::{daily_census, total_growth, DailyCensus};
use blobsim_agents::blob::Blob;
use blobsim_agents::forest::ForestCycle;
use blobsim_agents::habitat::Habitat;
use blobsim_agents::hunt::HuntProcess;
use blobsim_agents::sampler::UniformForaging;
use blobsim_agents::sleep::SleepProcess;
use blobsim_core::container::FoodContainer;
use blobsim_core::error::Result;
use blobsim_core::sampler::ForagingSampler;
use blobsim_core::types::{BlobId, Phase, ProcessId, RunId, SimEvent, SimTime};
use serde::Serialize;
use tracing::{debug, info};

/// Process ids belonging to one blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlobProcesses {
    pub blob: BlobId,
    pub sleep: ProcessId,
    pub hunt: ProcessId,
}

/// Point-in-time view of a running simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub time: SimTime,
    pub day: u64,
    pub phase: Phase,
    pub food_level: u64,
    pub alive: usize,
    pub blobs: Vec<Blob>,
    pub stats: KernelStats,
}

/// Final results of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: RunId,
    pub config: SimulationConfig,
    pub final_time: SimTime,
    pub initial_population: usize,
    pub survivors: usize,
    pub initial_food: u64,
    pub food_grown: u64,
    pub food_level: u64,
    pub blobs: Vec<Blob>,
    pub census: Vec<DailyCensus>,
    pub stats: KernelStats,
}

impl SimulationReport {
    pub fn deaths(&self) -> usize {
        self.initial_population - self.survivors
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One blob population in one forest.
pub struct Simulation {
    run_id: RunId,
    config: SimulationConfig,
    kernel: Kernel<Habitat>,
    forest: ProcessId,
    processes: Vec<BlobProcesses>,
    days_run: u64,
}

impl Simulation {
    /// Build a simulation with the seeded uniform foraging sampler.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let sampler = UniformForaging::new(config.seed, config.foraging_upper_bound);
        Self::with_sampler(config, Box::new(sampler))
    }

    /// Build a simulation with a caller-supplied foraging sampler.
    pub fn with_sampler(config: SimulationConfig, sampler: Box<dyn ForagingSampler>) -> Result<Self> {
        config.validate()?;
        let rhythm = config.rhythm();
        let food = FoodContainer::new(config.capacity, config.initial_food)?;
        let mut kernel = Kernel::new(Habitat::new(food, sampler));

        let forest = kernel.spawn(Box::new(ForestCycle::new(rhythm, config.production_rate)))?;

        let mut processes = Vec::with_capacity(config.population);
        for i in 0..config.population {
            let blob = kernel
                .world_mut()
                .add_blob(format!("Blob {}", i), config.food_requirement);
            let sleep = kernel.spawn(Box::new(SleepProcess::new(blob, rhythm)))?;
            let hunt = kernel.spawn(Box::new(HuntProcess::new(
                blob,
                rhythm,
                config.post_meal_rest,
            )))?;
            kernel.world_mut().attach_hunt(blob, hunt)?;
            processes.push(BlobProcesses { blob, sleep, hunt });
        }

        info!(
            population = config.population,
            initial_food = config.initial_food,
            capacity = config.capacity,
            days = config.days,
            "simulation built"
        );

        Ok(Self {
            run_id: RunId::new(),
            config,
            kernel,
            forest,
            processes,
            days_run: 0,
        })
    }

    /// Run every configured day and report.
    pub fn run(&mut self) -> Result<SimulationReport> {
        let horizon = self.horizon()?;
        self.run_until(horizon)?;
        self.days_run = self.config.days;
        Ok(self.report())
    }

    /// Run one more full day/night cycle. Returns the number of days run so far.
    pub fn run_day(&mut self) -> Result<u64> {
        let next = self.days_run + 1;
        let until = self.config.clone().with_days(next).horizon()?;
        self.run_until(until)?;
        self.days_run = next;
        Ok(next)
    }

    /// Dispatch every event due at or before `horizon`.
    pub fn run_until(&mut self, horizon: SimTime) -> Result<()> {
        debug!(from = self.now(), horizon, "running");
        self.kernel.run_until(horizon)
    }

    pub fn horizon(&self) -> Result<SimTime> {
        self.config.horizon()
    }

    pub fn is_finished(&self) -> bool {
        self.days_run >= self.config.days
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn now(&self) -> SimTime {
        self.kernel.now()
    }

    pub fn habitat(&self) -> &Habitat {
        self.kernel.world()
    }

    pub fn blobs(&self) -> &[Blob] {
        self.habitat().blobs()
    }

    pub fn food_level(&self) -> u64 {
        self.habitat().food().level()
    }

    pub fn alive_count(&self) -> usize {
        self.habitat().alive_count()
    }

    pub fn kernel(&self) -> &Kernel<Habitat> {
        &self.kernel
    }

    pub fn forest_process(&self) -> ProcessId {
        self.forest
    }

    /// Process ids of every blob, in roster order.
    pub fn blob_processes(&self) -> &[BlobProcesses] {
        &self.processes
    }

    pub fn history(&self) -> &[(SimTime, SimEvent)] {
        self.kernel.history()
    }

    pub fn trace(&self) -> &[DispatchRecord] {
        self.kernel.trace()
    }

    pub fn stats(&self) -> &KernelStats {
        self.kernel.stats()
    }

    pub fn census(&self) -> Vec<DailyCensus> {
        let mut census = daily_census(self.history(), self.config.rhythm());
        census.retain(|day| day.day < self.config.days);
        census
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let habitat = self.habitat();
        SimulationSnapshot {
            time: self.now(),
            day: self.config.rhythm().day_of(self.now()),
            phase: habitat.phase(),
            food_level: habitat.food().level(),
            alive: habitat.alive_count(),
            blobs: habitat.blobs().to_vec(),
            stats: self.stats().clone(),
        }
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            run_id: self.run_id,
            config: self.config.clone(),
            final_time: self.now(),
            initial_population: self.config.population,
            survivors: self.alive_count(),
            initial_food: self.config.initial_food,
            food_grown: total_growth(self.history()),
            food_level: self.food_level(),
            blobs: self.blobs().to_vec(),
            census: self.census(),
            stats: self.stats().clone(),
        }
    }
}
