//! # Simulation
//!
//! Owns the store, the RNG, the simulated clock and both engines. One tick
//! advances the clock, moves every entity, then resolves collisions at the
//! new time.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rochambeau_core::{ComponentTag, Entity, EntityStore, SimTime};
use tracing::{debug, info};

use crate::collision::{CollisionResolver, Conversion};
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::population::{self, KindCounts, SpawnParams};
use crate::steering::SteeringEngine;

/// Outcome of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Ticks completed, including this one.
    pub tick: u64,
    /// Simulated time the tick resolved at.
    pub now: SimTime,
    /// Entities that moved.
    pub moved: usize,
    /// Conversions applied.
    pub conversions: Vec<Conversion>,
    /// Overlapping pairs held back by a cooldown.
    pub blocked_by_cooldown: usize,
    /// Population after the tick.
    pub counts: KindCounts,
}

/// A running Rock-Paper-Scissors population.
#[derive(Debug)]
pub struct Simulation {
    store: EntityStore,
    rng: ChaCha8Rng,
    params: SpawnParams,
    steering: SteeringEngine,
    collisions: CollisionResolver,
    tick_interval_ms: u64,
    now: SimTime,
    tick_count: u64,
    seed: Option<u64>,
}

impl Simulation {
    /// Builds and populates a simulation from `config`.
    ///
    /// Seeds from `population.seed`, or from the wall clock when unset.
    ///
    /// # Errors
    ///
    /// [`crate::SimError::Config`] if `config` fails validation.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        let seed = config.population.seed.unwrap_or_else(wall_clock_seed);
        let mut sim = Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))?;
        sim.seed = Some(seed);
        info!(seed, count = config.population.count, "simulation initialized");
        Ok(sim)
    }

    /// Builds and populates a simulation drawing from `rng`.
    ///
    /// # Errors
    ///
    /// [`crate::SimError::Config`] if `config` fails validation.
    pub fn with_rng(config: &SimConfig, mut rng: ChaCha8Rng) -> SimResult<Self> {
        config.validate()?;
        let params = config.spawn_params();
        let store = population::initialize(&params, &mut rng)?;
        Ok(Self {
            store,
            rng,
            params,
            steering: SteeringEngine::new(params.bounds, params.footprint),
            collisions: CollisionResolver::new(params.footprint),
            tick_interval_ms: config.schedule.tick_interval_ms,
            now: SimTime::ZERO,
            tick_count: 0,
            seed: None,
        })
    }

    /// Runs one tick: advance the clock, steer, resolve collisions.
    ///
    /// # Errors
    ///
    /// Propagates store errors from either engine.
    pub fn tick(&mut self) -> SimResult<TickReport> {
        self.now = self.now.advanced(self.tick_interval_ms);
        let steering = self.steering.update(&mut self.store)?;
        let collisions = self.collisions.resolve(&mut self.store, self.now)?;
        self.tick_count += 1;

        let counts = population::counts(&self.store);
        debug!(
            tick = self.tick_count,
            moved = steering.moved,
            conversions = collisions.conversions.len(),
            %counts,
            "tick"
        );
        Ok(TickReport {
            tick: self.tick_count,
            now: self.now,
            moved: steering.moved,
            conversions: collisions.conversions,
            blocked_by_cooldown: collisions.blocked_by_cooldown,
            counts,
        })
    }

    /// Replaces the population with a fresh random one.
    ///
    /// The clock and tick count keep running, so cooldowns stay comparable.
    ///
    /// # Errors
    ///
    /// Propagates store errors from spawning.
    pub fn reset(&mut self) -> SimResult<()> {
        population::reset(&mut self.store, &self.params, &mut self.rng)?;
        info!(tick = self.tick_count, count = self.params.count, "population reset");
        Ok(())
    }

    /// Live entities per kind.
    #[must_use]
    pub fn counts(&self) -> KindCounts {
        population::counts(&self.store)
    }

    /// Every live entity with its attached components.
    #[must_use]
    pub fn dump(&self) -> Vec<(Entity, Vec<ComponentTag>)> {
        population::dump(&self.store)
    }

    /// Read access for presentation.
    #[must_use]
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> SimTime {
        self.now
    }

    /// Ticks completed.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seed used, if built through [`Self::new`].
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rochambeau_core::{Kind, Position};

    fn seeded(count: usize, seed: u64) -> Simulation {
        let mut config = SimConfig::default();
        config.population.count = count;
        config.population.seed = Some(seed);
        Simulation::new(&config).unwrap()
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut sim = seeded(10, 1);
        assert_eq!(sim.now(), SimTime::ZERO);
        let report = sim.tick().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.now, SimTime(30));
        sim.tick().unwrap();
        assert_eq!(sim.now(), SimTime(60));
        assert_eq!(sim.tick_count(), 2);
        assert_eq!(sim.seed(), Some(1));
    }

    #[test]
    fn test_tick_conserves_population() {
        let mut sim = seeded(50, 2);
        for _ in 0..100 {
            let report = sim.tick().unwrap();
            assert_eq!(report.counts.total(), 50);
        }
        assert_eq!(sim.store().len(), 50);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = seeded(40, 11);
        let mut b = seeded(40, 11);
        for _ in 0..50 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
        }
    }

    #[test]
    fn test_reset_keeps_count() {
        let mut sim = seeded(25, 5);
        sim.tick().unwrap();
        sim.reset().unwrap();
        assert_eq!(sim.counts().total(), 25);
        assert_eq!(sim.dump().len(), 25);
        assert_eq!(sim.now(), SimTime(30));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::default();
        config.schedule.tick_interval_ms = 0;
        assert!(Simulation::new(&config).is_err());
    }

    #[test]
    fn test_every_entity_has_kind_and_position() {
        let sim = seeded(30, 8);
        for (_, tags) in sim.dump() {
            assert!(tags.contains(&ComponentTag::Position));
            assert!(tags.contains(&ComponentTag::Cooldown));
            let kinds = tags
                .iter()
                .filter(|tag| Kind::ALL.iter().any(|kind| kind.tag() == **tag))
                .count();
            assert_eq!(kinds, 1);
        }
        assert_eq!(sim.store().view::<(Position, Kind)>().count(), 30);
    }
}
