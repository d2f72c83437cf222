//! Blob: one individual of the population.
//!
//! The record itself is passive data. Two processes drive it: the hunt
//! process forages during the day, the sleep process ends the day and
//! decides whether the blob lives on. Once `alive` turns false it never
//! turns back, and the record stays in the roster for final accounting.

use blobsim_core::types::{BlobId, ProcessId, SimTime};
use serde::Serialize;

/// State of a single blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blob {
    id: BlobId,
    name: String,
    alive: bool,
    is_hunting: bool,
    food_eaten_today: u64,
    food_requirement: u64,

    // Lifetime accounting
    /// Meals over the whole run.
    total_eaten: u64,
    /// Day boundaries survived.
    days_survived: u64,
    /// When the blob starved, if it did.
    died_at: Option<SimTime>,

    /// The hunt process the sleep process interrupts at nightfall.
    #[serde(skip)]
    hunt_process: Option<ProcessId>,
}

impl Blob {
    pub fn new(id: BlobId, name: impl Into<String>, food_requirement: u64) -> Self {
        Self {
            id,
            name: name.into(),
            alive: true,
            is_hunting: false,
            food_eaten_today: 0,
            food_requirement,
            total_eaten: 0,
            days_survived: 0,
            died_at: None,
            hunt_process: None,
        }
    }

    pub fn id(&self) -> BlobId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_hunting(&self) -> bool {
        self.is_hunting
    }

    pub fn food_eaten_today(&self) -> u64 {
        self.food_eaten_today
    }

    pub fn food_requirement(&self) -> u64 {
        self.food_requirement
    }

    pub fn total_eaten(&self) -> u64 {
        self.total_eaten
    }

    pub fn days_survived(&self) -> u64 {
        self.days_survived
    }

    pub fn died_at(&self) -> Option<SimTime> {
        self.died_at
    }

    pub fn hunt_process(&self) -> Option<ProcessId> {
        self.hunt_process
    }

    /// Whether today's meals meet the requirement.
    pub fn is_fed(&self) -> bool {
        self.food_eaten_today >= self.food_requirement
    }

    pub(crate) fn set_hunt_process(&mut self, process: ProcessId) {
        self.hunt_process = Some(process);
    }

    pub(crate) fn set_hunting(&mut self, hunting: bool) {
        self.is_hunting = hunting;
    }

    pub(crate) fn record_meal(&mut self) {
        self.food_eaten_today += 1;
        self.total_eaten += 1;
    }

    /// Close the day: survive or starve, then start counting from zero.
    ///
    /// Returns whether the blob is still alive.
    pub(crate) fn end_day(&mut self, now: SimTime) -> bool {
        if self.alive {
            if self.is_fed() {
                self.days_survived += 1;
            } else {
                self.alive = false;
                self.died_at = Some(now);
            }
        }
        self.food_eaten_today = 0;
        self.alive
    }
}
