//! Hunt process: a blob's foraging loop.
//!
//! Each iteration the blob searches for a sampled amount of time. If the
//! forest has food when the search ends it takes one unit and rests;
//! otherwise it goes straight back to searching. Foraging is
//! opportunistic: the blob only asks the container for food it can see,
//! it never queues on an empty forest.
//!
//! At nightfall the sleep process interrupts whatever timer the hunt is
//! parked on. The blob then sleeps for a full night and starts over. The
//! loop ends for good once the blob is dead.

use crate::habitat::Habitat;
use blobsim_core::container::GetOutcome;
use blobsim_core::error::Result;
use blobsim_core::process::{Process, ProcessContext, Step};
use blobsim_core::types::{BlobId, DayRhythm, Phase, SimEvent, SimTime, Wake};
use tracing::{debug, trace};

/// Where the hunt loop is parked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntState {
    /// About to (re)enter the loop head.
    Ready,
    /// Searching; the timer marks when the search ends.
    Foraging,
    /// Waiting on a queued container request.
    Feeding,
    /// Resting after a meal.
    Satiated,
    /// Sleeping through the night after an interrupt.
    NightInterrupted,
    /// The blob is dead; the process has terminated.
    Finished,
}

/// The foraging process of one blob.
pub struct HuntProcess {
    blob: BlobId,
    name: String,
    rhythm: DayRhythm,
    post_meal_rest: SimTime,
    state: HuntState,
}

impl HuntProcess {
    pub fn new(blob: BlobId, rhythm: DayRhythm, post_meal_rest: SimTime) -> Self {
        Self {
            blob,
            name: format!("hunt-{}", blob.0),
            rhythm,
            post_meal_rest,
            state: HuntState::Ready,
        }
    }

    pub fn state(&self) -> HuntState {
        self.state
    }

    /// Loop head: check the blob is alive, then go searching.
    fn start_search(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        let blob = habitat.blob_mut(self.blob)?;
        if !blob.is_alive() {
            self.state = HuntState::Finished;
            return Ok(Step::Terminate);
        }
        blob.set_hunting(true);
        ctx.emit(SimEvent::HuntStarted { blob: self.blob });

        let search = habitat.sample_foraging().clamp(1, self.rhythm.daylight.max(1));
        trace!(blob = self.blob.0, at = ctx.now(), search, "hunt started");
        self.state = HuntState::Foraging;
        Ok(Step::Hold(search))
    }

    /// The search timer expired.
    fn finish_search(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        if habitat.food().is_empty() {
            ctx.emit(SimEvent::ForageFailed { blob: self.blob });
            return self.start_search(habitat, ctx);
        }
        match habitat.food_mut().get(1, ctx.process_id())? {
            GetOutcome::Granted => self.eat(habitat, ctx),
            GetOutcome::Queued => {
                self.state = HuntState::Feeding;
                Ok(Step::AwaitResource)
            }
        }
    }

    /// A queued request was served. A dead blob leaves the loop without
    /// eating; a meal served after dusk counts toward the coming day and
    /// the blob sleeps until dawn.
    fn take_grant(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        if !habitat.blob(self.blob)?.is_alive() {
            debug!(blob = self.blob.0, at = ctx.now(), "grant reached a dead blob");
            self.state = HuntState::Finished;
            return Ok(Step::Terminate);
        }
        if habitat.phase() == Phase::Night {
            self.eat(habitat, ctx)?;
            habitat.blob_mut(self.blob)?.set_hunting(false);
            self.state = HuntState::NightInterrupted;
            return Ok(Step::Hold(self.until_dawn(ctx.now())));
        }
        self.eat(habitat, ctx)
    }

    fn until_dawn(&self, now: SimTime) -> SimTime {
        match self.rhythm.day_length() {
            0 => 0,
            len => len - now % len,
        }
    }

    fn eat(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        let food_level = habitat.food().level();
        habitat.blob_mut(self.blob)?.record_meal();
        ctx.emit(SimEvent::Ate {
            blob: self.blob,
            food_level,
        });
        self.state = HuntState::Satiated;
        Ok(Step::Hold(self.post_meal_rest))
    }
}

impl Process<Habitat> for HuntProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, wake: Wake, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        if let Wake::Interrupted(reason) = wake {
            habitat.blob_mut(self.blob)?.set_hunting(false);
            ctx.emit(SimEvent::HuntInterrupted { blob: self.blob });
            debug!(blob = self.blob.0, at = ctx.now(), ?reason, from = ?self.state, "hunt interrupted");
            self.state = HuntState::NightInterrupted;
            return Ok(Step::Hold(self.rhythm.nighttime));
        }

        match self.state {
            HuntState::Foraging => self.finish_search(habitat, ctx),
            HuntState::Feeding => self.take_grant(habitat, ctx),
            HuntState::Ready | HuntState::Satiated | HuntState::NightInterrupted => {
                self.start_search(habitat, ctx)
            }
            HuntState::Finished => Ok(Step::Terminate),
        }
    }
}
