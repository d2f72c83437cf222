//! Sleep process: closes each day for one blob.
//!
//! At dusk it calls the blob home (interrupting the hunt if it is still
//! out), checks whether the blob ate enough, and resets the daily meal
//! count. It then sleeps until dawn, so it fires exactly once per day
//! boundary. A blob that starves takes its sleep process with it.

use crate::habitat::Habitat;
use blobsim_core::error::Result;
use blobsim_core::process::{Process, ProcessContext, Step};
use blobsim_core::types::{BlobId, DayRhythm, InterruptReason, SimEvent, SimTime, Wake};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepState {
    /// Waiting for the first activation, or for dawn.
    Dawn,
    /// Daylight; the timer ends at dusk.
    AwaitingDusk,
    /// Night; the timer ends at dawn.
    AwaitingDawn,
}

/// The day-boundary process of one blob.
pub struct SleepProcess {
    blob: BlobId,
    name: String,
    rhythm: DayRhythm,
    state: SleepState,
    /// When the current timer is due. Used to re-arm after a stray interrupt.
    wake_at: SimTime,
}

impl SleepProcess {
    pub fn new(blob: BlobId, rhythm: DayRhythm) -> Self {
        Self {
            blob,
            name: format!("sleep-{}", blob.0),
            rhythm,
            state: SleepState::Dawn,
            wake_at: 0,
        }
    }

    fn hold(&mut self, state: SleepState, delay: SimTime, now: SimTime) -> Step {
        self.state = state;
        self.wake_at = now.saturating_add(delay);
        Step::Hold(delay)
    }

    fn dusk(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        let now = ctx.now();
        let blob = habitat.blob_mut(self.blob)?;

        if blob.is_hunting() {
            if let Some(hunt) = blob.hunt_process() {
                ctx.interrupt(hunt, InterruptReason::Nightfall);
            }
            blob.set_hunting(false);
        }

        let eaten = blob.food_eaten_today();
        let required = blob.food_requirement();
        let was_alive = blob.is_alive();
        let alive = blob.end_day(now);

        if alive {
            ctx.emit(SimEvent::Survived { blob: self.blob, eaten });
        } else if was_alive {
            debug!(blob = self.blob.0, at = now, eaten, required, "blob starved");
            ctx.emit(SimEvent::Died {
                blob: self.blob,
                eaten,
                required,
            });
        }

        if !alive {
            return Ok(Step::Terminate);
        }
        Ok(self.hold(SleepState::AwaitingDawn, self.rhythm.nighttime, now))
    }
}

impl Process<Habitat> for SleepProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, wake: Wake, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        let now = ctx.now();
        if let Wake::Interrupted(reason) = wake {
            // Not preemptible: keep the original schedule.
            debug!(blob = self.blob.0, at = now, ?reason, "sleep ignores interrupt");
            return Ok(Step::Hold(self.wake_at.saturating_sub(now)));
        }

        match self.state {
            SleepState::Dawn | SleepState::AwaitingDawn => {
                if !habitat.blob(self.blob)?.is_alive() {
                    return Ok(Step::Terminate);
                }
                Ok(self.hold(SleepState::AwaitingDusk, self.rhythm.daylight, now))
            }
            SleepState::AwaitingDusk => self.dusk(habitat, ctx),
        }
    }
}
