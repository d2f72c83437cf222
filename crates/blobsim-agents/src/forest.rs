//! Forest: the environment's day/night cycle.
//!
//! The forest alternates daylight and night forever. At every dusk it
//! grows `production_rate` units of food in a single `put`, which also
//! serves anyone queued on the container. The day-start and nightfall
//! reports are the only other side effects.

use crate::habitat::Habitat;
use blobsim_core::error::Result;
use blobsim_core::process::{Process, ProcessContext, Step};
use blobsim_core::types::{DayRhythm, Phase, SimEvent, SimTime, Wake};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForestState {
    /// The next activation starts a day.
    Dawn,
    /// Daylight; the timer ends at dusk.
    Daylight,
}

/// The environment process that owns the day/night rhythm.
pub struct ForestCycle {
    rhythm: DayRhythm,
    production_rate: u64,
    state: ForestState,
    wake_at: SimTime,
}

impl ForestCycle {
    pub fn new(rhythm: DayRhythm, production_rate: u64) -> Self {
        Self {
            rhythm,
            production_rate,
            state: ForestState::Dawn,
            wake_at: 0,
        }
    }

    fn hold(&mut self, state: ForestState, delay: SimTime, now: SimTime) -> Step {
        self.state = state;
        self.wake_at = now.saturating_add(delay);
        Step::Hold(delay)
    }

    fn sunrise(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Step {
        let now = ctx.now();
        let day = self.rhythm.day_of(now);
        let food_level = habitat.food().level();
        habitat.set_phase(Phase::Day);
        ctx.emit(SimEvent::DayStarted { day, food_level });
        info!(day, at = now, food_level, "day started");
        self.hold(ForestState::Daylight, self.rhythm.daylight, now)
    }

    fn sunset(&mut self, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        let now = ctx.now();
        let day = self.rhythm.day_of(now);
        habitat.set_phase(Phase::Night);

        let alive = habitat.alive_count();
        let before = habitat.food().level();
        ctx.emit(SimEvent::NightFell {
            day,
            alive,
            food_level: before,
        });
        info!(day, at = now, alive, food_level = before, "night fell");

        // Growth beyond capacity is lost.
        let added = self
            .production_rate
            .min(habitat.food().capacity().saturating_sub(before));
        let served = habitat.food_mut().put(self.production_rate)?;
        let level = habitat.food().level();
        debug!(added, served = served.len(), level, "food grown");
        ctx.grant(served);
        ctx.emit(SimEvent::FoodGrown { added, level });

        Ok(self.hold(ForestState::Dawn, self.rhythm.nighttime, now))
    }
}

impl Process<Habitat> for ForestCycle {
    fn name(&self) -> &str {
        "forest"
    }

    fn resume(&mut self, wake: Wake, habitat: &mut Habitat, ctx: &mut ProcessContext) -> Result<Step> {
        if let Wake::Interrupted(reason) = wake {
            debug!(at = ctx.now(), ?reason, "forest ignores interrupt");
            return Ok(Step::Hold(self.wake_at.saturating_sub(ctx.now())));
        }
        match self.state {
            ForestState::Dawn => Ok(self.sunrise(habitat, ctx)),
            ForestState::Daylight => self.sunset(habitat, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobsim_core::container::FoodContainer;
    use blobsim_core::types::ProcessId;

    fn habitat(capacity: u64, food: u64) -> Habitat {
        Habitat::new(FoodContainer::new(capacity, food).unwrap(), Box::new(|| 1u64))
    }

    #[test]
    fn grows_food_at_dusk() {
        let mut h = habitat(1000, 0);
        let mut forest = ForestCycle::new(DayRhythm::new(720, 720), 70);

        let mut ctx = ProcessContext::new(0, ProcessId(0));
        assert_eq!(forest.resume(Wake::Start, &mut h, &mut ctx).unwrap(), Step::Hold(720));
        assert_eq!(h.phase(), Phase::Day);
        assert_eq!(h.food().level(), 0);

        let mut ctx = ProcessContext::new(720, ProcessId(0));
        assert_eq!(forest.resume(Wake::Timer, &mut h, &mut ctx).unwrap(), Step::Hold(720));
        assert_eq!(h.phase(), Phase::Night);
        assert_eq!(h.food().level(), 70);
        let events = ctx.into_effects().events;
        assert!(events.contains(&SimEvent::FoodGrown { added: 70, level: 70 }));
    }

    #[test]
    fn growth_is_clipped_at_capacity() {
        let mut h = habitat(100, 60);
        let mut forest = ForestCycle::new(DayRhythm::new(10, 10), 70);
        let mut ctx = ProcessContext::new(0, ProcessId(0));
        forest.resume(Wake::Start, &mut h, &mut ctx).unwrap();

        let mut ctx = ProcessContext::new(10, ProcessId(0));
        forest.resume(Wake::Timer, &mut h, &mut ctx).unwrap();
        assert_eq!(h.food().level(), 100);
        assert!(ctx
            .into_effects()
            .events
            .contains(&SimEvent::FoodGrown { added: 40, level: 100 }));
    }

    #[test]
    fn growth_serves_queued_requests() {
        let mut h = habitat(100, 0);
        h.food_mut().get(3, ProcessId(7)).unwrap();
        let mut forest = ForestCycle::new(DayRhythm::new(10, 10), 5);
        let mut ctx = ProcessContext::new(0, ProcessId(0));
        forest.resume(Wake::Start, &mut h, &mut ctx).unwrap();

        let mut ctx = ProcessContext::new(10, ProcessId(0));
        forest.resume(Wake::Timer, &mut h, &mut ctx).unwrap();
        assert_eq!(h.food().level(), 2);
        let effects = ctx.into_effects();
        assert_eq!(effects.grants, vec![ProcessId(7)]);
        assert!(effects.events.contains(&SimEvent::FoodGrown { added: 5, level: 2 }));
    }

    #[test]
    fn day_index_follows_the_clock() {
        let mut h = habitat(100, 0);
        let mut forest = ForestCycle::new(DayRhythm::new(10, 10), 5);
        let mut ctx = ProcessContext::new(40, ProcessId(0));
        forest.resume(Wake::Start, &mut h, &mut ctx).unwrap();
        assert_eq!(
            ctx.into_effects().events,
            vec![SimEvent::DayStarted { day: 2, food_level: 0 }]
        );
    }
}
