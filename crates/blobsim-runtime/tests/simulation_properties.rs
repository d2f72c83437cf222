//! End-to-end properties of the blob simulation.

use blobsim_agents::sampler::{FixedForaging, ScriptedForaging};
use blobsim_core::types::*;
use blobsim_runtime::config::SimulationConfig;
use blobsim_runtime::kernel::DispatchRecord;
use blobsim_runtime::simulation::Simulation;

fn config(population: usize, daylight: SimTime, nighttime: SimTime) -> SimulationConfig {
    SimulationConfig::default()
        .with_population(population)
        .with_rhythm(daylight, nighttime)
        .with_days(1)
}

fn dispatched_at(sim: &Simulation, at: SimTime) -> Vec<(usize, Wake)> {
    sim.trace()
        .iter()
        .filter(|r| r.at == at)
        .map(|r| (r.process.0, r.wake.clone()))
        .collect()
}

#[test]
fn level_stays_within_capacity_and_death_is_monotone() {
    let config = SimulationConfig::default().with_days(4).with_seed(3);
    let capacity = config.capacity;
    let mut sim = Simulation::new(config).unwrap();
    let horizon = sim.horizon().unwrap();

    let mut dead: Vec<bool> = vec![false; sim.blobs().len()];
    let mut t = 0;
    while t <= horizon {
        sim.run_until(t).unwrap();
        assert!(sim.food_level() <= capacity, "level {} above capacity at t={}", sim.food_level(), t);
        for (i, blob) in sim.blobs().iter().enumerate() {
            if dead[i] {
                assert!(!blob.is_alive(), "blob {} came back to life at t={}", i, t);
            }
            dead[i] = !blob.is_alive();
        }
        t += 10;
    }
}

#[test]
fn daily_meal_count_resets_at_every_dusk() {
    let config = SimulationConfig::default().with_days(3).with_seed(11);
    let rhythm = config.rhythm();
    let mut sim = Simulation::new(config).unwrap();

    for day in 0..3 {
        let dusk = day * rhythm.day_length() + rhythm.daylight;
        sim.run_until(dusk).unwrap();
        for blob in sim.blobs() {
            assert_eq!(
                blob.food_eaten_today(),
                0,
                "{} still has meals counted after dusk of day {}",
                blob.name(),
                day
            );
            assert!(!blob.is_hunting(), "{} is out hunting at night", blob.name());
        }
    }
}

#[test]
fn default_run_cannot_feed_more_blobs_than_there_is_food() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.run_day().unwrap();
    assert!(sim.alive_count() <= 70, "{} blobs survived on 70 units", sim.alive_count());

    let report = sim.run().unwrap();
    assert_eq!(report.initial_population, 100);
    assert!(report.survivors <= 70);
    assert_eq!(report.census.len(), 2);
    assert!(report.census[0].meals <= 70);
    assert_eq!(report.survivors + report.deaths(), 100);
}

#[test]
fn same_instant_events_dispatch_in_insertion_order() {
    // Forest, then per blob its sleep and hunt, all due at t=100.
    let run = || {
        let mut sim =
            Simulation::with_sampler(config(2, 100, 100), Box::new(FixedForaging(100))).unwrap();
        sim.run_until(100).unwrap();
        dispatched_at(&sim, 100)
    };

    let first = run();
    assert_eq!(
        first,
        vec![
            (0, Wake::Timer),
            (1, Wake::Timer),
            (2, Wake::Interrupted(InterruptReason::Nightfall)),
            (3, Wake::Timer),
            (4, Wake::Interrupted(InterruptReason::Nightfall)),
        ]
    );
    assert_eq!(first, run(), "dispatch order differs between identical runs");
}

#[test]
fn identical_inputs_give_identical_runs() {
    let config = SimulationConfig::default().with_days(3).with_seed(42);
    let mut a = Simulation::new(config.clone()).unwrap();
    let mut b = Simulation::new(config).unwrap();
    let ra = a.run().unwrap();
    let rb = b.run().unwrap();

    assert_eq!(ra.blobs, rb.blobs);
    assert_eq!(ra.food_level, rb.food_level);
    assert_eq!(ra.census, rb.census);
    let ta: Vec<&DispatchRecord> = a.trace().iter().collect();
    let tb: Vec<&DispatchRecord> = b.trace().iter().collect();
    assert_eq!(ta, tb);
    assert_ne!(ra.run_id, rb.run_id);
}

#[test]
fn interrupted_hunt_eats_nothing_and_resumes_after_the_night() {
    // One blob, one unit of food. It eats at t=10, rests until 30, searches
    // until 50 and finds nothing, then starts a search due at 61. Night
    // falls at 60.
    let sampler = ScriptedForaging::new(vec![10, 20, 11, 5]);
    let config = config(1, 60, 100).with_initial_food(1).with_days(2);
    let mut sim = Simulation::with_sampler(config, Box::new(sampler)).unwrap();
    let hunt = sim.blob_processes()[0].hunt;

    sim.run_until(59).unwrap();
    assert_eq!(sim.kernel().pending_timer(hunt).map(|h| h.due), Some(61));
    assert_eq!(sim.blobs()[0].total_eaten(), 1);

    sim.run_until(159).unwrap();
    assert_eq!(sim.blobs()[0].total_eaten(), 1, "ate during the interrupted window");
    assert!(sim.blobs()[0].is_alive());
    assert!(
        !sim.trace().iter().any(|r| r.process == hunt && r.at == 61),
        "the cancelled search timer fired"
    );
    let hunt_wakes: Vec<_> = sim
        .trace()
        .iter()
        .filter(|r| r.process == hunt && r.at > 50)
        .map(|r| (r.at, r.wake.clone()))
        .collect();
    assert_eq!(hunt_wakes, vec![(60, Wake::Interrupted(InterruptReason::Nightfall))]);

    sim.run_until(160).unwrap();
    assert_eq!(dispatched_at(&sim, 160).iter().filter(|(p, _)| *p == hunt.0).count(), 1);
    assert!(sim.blobs()[0].is_hunting());
    assert!(sim
        .history()
        .iter()
        .any(|(at, e)| *at == 160 && *e == SimEvent::HuntStarted { blob: BlobId(0) }));
}

#[test]
fn blob_that_never_finishes_a_search_starves_at_first_dusk() {
    let config = config(1, 100, 100);
    let mut sim = Simulation::with_sampler(config, Box::new(FixedForaging(150))).unwrap();
    let report = sim.run().unwrap();

    let blob = &report.blobs[0];
    assert!(!blob.is_alive());
    assert_eq!(blob.died_at(), Some(100));
    assert_eq!(blob.total_eaten(), 0);
    assert_eq!(report.survivors, 0);

    let procs = sim.blob_processes()[0];
    assert_eq!(sim.kernel().process_state(procs.sleep), Some(ProcessState::Terminated));
    assert_eq!(sim.kernel().process_state(procs.hunt), Some(ProcessState::Terminated));
}

#[test]
fn one_night_grows_the_production_rate() {
    let grown = config(0, 100, 100).with_capacity(1000).with_initial_food(0);
    let mut sim = Simulation::new(grown).unwrap();
    sim.run_until(100).unwrap();
    assert_eq!(sim.food_level(), 70);

    let clipped = config(0, 100, 100).with_capacity(100).with_initial_food(60);
    let mut sim = Simulation::new(clipped).unwrap();
    sim.run_until(100).unwrap();
    assert_eq!(sim.food_level(), 100);
}

#[test]
fn empty_forest_skips_the_meal() {
    let config = config(1, 100, 100)
        .with_initial_food(0)
        .with_production_rate(0);
    let mut sim = Simulation::with_sampler(config, Box::new(FixedForaging(10))).unwrap();

    sim.run_until(10).unwrap();
    assert_eq!(sim.blobs()[0].food_eaten_today(), 0);
    assert_eq!(sim.food_level(), 0);
    assert!(sim
        .history()
        .iter()
        .any(|(at, e)| *at == 10 && *e == SimEvent::ForageFailed { blob: BlobId(0) }));
    assert!(sim.blobs()[0].is_hunting(), "the blob should keep searching");

    sim.run_until(100).unwrap();
    assert!(!sim.blobs()[0].is_alive());
}

#[test]
fn census_follows_the_day_reports() {
    let config = config(2, 100, 100).with_initial_food(1);
    let mut sim = Simulation::with_sampler(config, Box::new(FixedForaging(10))).unwrap();
    let report = sim.run().unwrap();

    let day = &report.census[0];
    assert_eq!(day.food_at_dawn, Some(1));
    assert_eq!(day.meals, 1);
    assert_eq!(day.alive_at_dusk, Some(2));
    assert_eq!(day.food_at_dusk, Some(0));
    assert_eq!(day.food_after_growth, Some(70));
    assert_eq!(day.survivors, 1);
    assert_eq!(day.deaths, 1);
    assert_eq!(report.survivors, 1);
}
