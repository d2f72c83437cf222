//! Per-day census derived from the event history.
//!
//! Nothing here touches the live simulation: every number is recomputed
//! from the `(time, SimEvent)` log the kernel keeps, so a census can be
//! taken from a finished run as well as from one still in flight.

use blobsim_core::types::{DayRhythm, SimEvent, SimTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// What happened during one day/night cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyCensus {
    /// Zero-based day index.
    pub day: u64,
    /// Food in the forest when the day began.
    pub food_at_dawn: Option<u64>,
    /// Units eaten during the day.
    pub meals: u64,
    /// Searches that ended with an empty forest.
    pub failed_forages: u64,
    /// Hunts cut short by nightfall.
    pub interrupted_hunts: u64,
    /// Living blobs when night fell, before survival was judged.
    pub alive_at_dusk: Option<usize>,
    /// Food left when night fell.
    pub food_at_dusk: Option<u64>,
    /// Food after the night's growth.
    pub food_after_growth: Option<u64>,
    /// Blobs that ate enough.
    pub survivors: usize,
    /// Blobs that starved.
    pub deaths: usize,
}

/// Build one census entry per day seen in `history`, ordered by day.
pub fn daily_census(history: &[(SimTime, SimEvent)], rhythm: DayRhythm) -> Vec<DailyCensus> {
    let mut days: BTreeMap<u64, DailyCensus> = BTreeMap::new();

    for (at, event) in history {
        let day = rhythm.day_of(*at);
        let entry = days.entry(day).or_insert_with(|| DailyCensus {
            day,
            ..DailyCensus::default()
        });
        match event {
            SimEvent::DayStarted { food_level, .. } => entry.food_at_dawn = Some(*food_level),
            SimEvent::Ate { .. } => entry.meals += 1,
            SimEvent::ForageFailed { .. } => entry.failed_forages += 1,
            SimEvent::HuntInterrupted { .. } => entry.interrupted_hunts += 1,
            SimEvent::NightFell {
                alive, food_level, ..
            } => {
                entry.alive_at_dusk = Some(*alive);
                entry.food_at_dusk = Some(*food_level);
            }
            SimEvent::FoodGrown { level, .. } => entry.food_after_growth = Some(*level),
            SimEvent::Survived { .. } => entry.survivors += 1,
            SimEvent::Died { .. } => entry.deaths += 1,
            SimEvent::HuntStarted { .. }
            | SimEvent::InterruptMissed { .. }
            | SimEvent::ProcessTerminated { .. } => {}
        }
    }

    days.into_values().collect()
}

/// Total food the forest grew over the whole history.
pub fn total_growth(history: &[(SimTime, SimEvent)]) -> u64 {
    history
        .iter()
        .map(|(_, event)| match event {
            SimEvent::FoodGrown { added, .. } => *added,
            _ => 0,
        })
        .sum()
}
