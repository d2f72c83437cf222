//! Habitat: the world every process operates on.
//!
//! Holds the forest's food container, the day/night phase flag, the blob
//! roster and the foraging sampler. The simulation driver owns the habitat
//! (through the kernel); processes only see it while they run.

use crate::blob::Blob;
use blobsim_core::container::FoodContainer;
use blobsim_core::error::{InvariantError, Result};
use blobsim_core::sampler::ForagingSampler;
use blobsim_core::types::{BlobId, Phase, ProcessId, SimTime};

/// Shared state of one simulation.
pub struct Habitat {
    food: FoodContainer,
    phase: Phase,
    blobs: Vec<Blob>,
    sampler: Box<dyn ForagingSampler>,
}

impl Habitat {
    pub fn new(food: FoodContainer, sampler: Box<dyn ForagingSampler>) -> Self {
        Self {
            food,
            phase: Phase::Day,
            blobs: Vec::new(),
            sampler,
        }
    }

    /// Add a blob to the roster.
    pub fn add_blob(&mut self, name: impl Into<String>, food_requirement: u64) -> BlobId {
        let id = BlobId(self.blobs.len());
        self.blobs.push(Blob::new(id, name, food_requirement));
        id
    }

    /// Record which process forages for `blob`.
    pub fn attach_hunt(&mut self, blob: BlobId, process: ProcessId) -> Result<()> {
        self.blob_mut(blob)?.set_hunt_process(process);
        Ok(())
    }

    pub fn blob(&self, id: BlobId) -> Result<&Blob> {
        self.blobs
            .get(id.0)
            .ok_or_else(|| InvariantError::UnknownBlob(id).into())
    }

    pub(crate) fn blob_mut(&mut self, id: BlobId) -> Result<&mut Blob> {
        self.blobs
            .get_mut(id.0)
            .ok_or_else(|| InvariantError::UnknownBlob(id).into())
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn alive_count(&self) -> usize {
        self.blobs.iter().filter(|b| b.is_alive()).count()
    }

    pub fn food(&self) -> &FoodContainer {
        &self.food
    }

    pub fn food_mut(&mut self) -> &mut FoodContainer {
        &mut self.food
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Draw the next foraging duration.
    pub fn sample_foraging(&mut self) -> SimTime {
        self.sampler.sample()
    }
}

impl std::fmt::Debug for Habitat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Habitat")
            .field("food", &self.food)
            .field("phase", &self.phase)
            .field("blobs", &self.blobs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habitat() -> Habitat {
        Habitat::new(FoodContainer::new(100, 10).unwrap(), Box::new(|| 5u64))
    }

    #[test]
    fn roster_assigns_sequential_ids() {
        let mut h = habitat();
        let a = h.add_blob("Blob 0", 1);
        let b = h.add_blob("Blob 1", 1);
        assert_eq!(a, BlobId(0));
        assert_eq!(b, BlobId(1));
        assert_eq!(h.alive_count(), 2);
        assert_eq!(h.blob(b).unwrap().name(), "Blob 1");
    }

    #[test]
    fn unknown_blob_is_an_error() {
        let h = habitat();
        assert!(h.blob(BlobId(9)).is_err());
    }

    #[test]
    fn attach_hunt_links_process() {
        let mut h = habitat();
        let id = h.add_blob("Blob 0", 1);
        h.attach_hunt(id, ProcessId(4)).unwrap();
        assert_eq!(h.blob(id).unwrap().hunt_process(), Some(ProcessId(4)));
    }

    #[test]
    fn sampler_is_injected() {
        let mut h = habitat();
        assert_eq!(h.sample_foraging(), 5);
        assert_eq!(h.phase(), Phase::Day);
    }
}
