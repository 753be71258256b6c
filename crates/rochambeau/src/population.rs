//! # Population Lifecycle
//!
//! Spawning, resetting and counting. Every spawned entity gets a uniform
//! random kind, a uniform random position with its whole footprint inside
//! the world, and an expired cooldown.

use std::fmt;

use rand::Rng;
use rochambeau_core::{
    ComponentTag, Cooldown, EcsResult, Entity, EntityStore, Kind, Position,
};
use tracing::debug;

use crate::geometry::{Footprint, WorldBounds};

/// What initialize and reset spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnParams {
    /// Number of entities.
    pub count: usize,
    /// World size.
    pub bounds: WorldBounds,
    /// Entity footprint.
    pub footprint: Footprint,
    /// Cooldown interval given to every entity.
    pub cooldown_ms: u64,
}

/// Number of live entities of each kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KindCounts {
    /// Rocks.
    pub rock: usize,
    /// Papers.
    pub paper: usize,
    /// Scissors.
    pub scissors: usize,
}

impl KindCounts {
    /// Sum over every kind.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// Count for one kind.
    #[must_use]
    pub const fn get(&self, kind: Kind) -> usize {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    fn increment(&mut self, kind: Kind) {
        match kind {
            Kind::Rock => self.rock += 1,
            Kind::Paper => self.paper += 1,
            Kind::Scissors => self.scissors += 1,
        }
    }

    /// The only kind left, if the population is non-empty and uniform.
    #[must_use]
    pub fn settled(&self) -> Option<Kind> {
        let mut present = Kind::ALL.into_iter().filter(|&kind| self.get(kind) > 0);
        match (present.next(), present.next()) {
            (Some(kind), None) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rock={} paper={} scissors={}",
            self.rock, self.paper, self.scissors
        )
    }
}

/// Creates a store sized for `params.count` and fills it.
///
/// # Errors
///
/// Propagates store errors from spawning.
pub fn initialize<R: Rng + ?Sized>(params: &SpawnParams, rng: &mut R) -> EcsResult<EntityStore> {
    let mut store = EntityStore::with_capacity(params.count);
    populate(&mut store, params, rng)?;
    Ok(store)
}

/// Spawns `params.count` entities into `store`.
///
/// # Errors
///
/// [`rochambeau_core::EcsError::CapacityExhausted`] if the store cannot
/// hold them all. Entities spawned before the failure remain.
pub fn populate<R: Rng + ?Sized>(
    store: &mut EntityStore,
    params: &SpawnParams,
    rng: &mut R,
) -> EcsResult<()> {
    let max = params.bounds.max_position(params.footprint);
    for _ in 0..params.count {
        let position = Position::new(rng.gen_range(0..=max.x), rng.gen_range(0..=max.y));
        let kind = Kind::from_index(rng.gen_range(0..Kind::ALL.len()));
        store.create([
            position.into(),
            kind.into(),
            Cooldown::new(params.cooldown_ms).into(),
        ])?;
    }
    debug!(count = params.count, "population spawned");
    Ok(())
}

/// Erases every entity, then spawns a fresh population.
///
/// Handles from before the reset are stale afterwards.
///
/// # Errors
///
/// Same as [`populate`].
pub fn reset<R: Rng + ?Sized>(
    store: &mut EntityStore,
    params: &SpawnParams,
    rng: &mut R,
) -> EcsResult<()> {
    store.clear();
    populate(store, params, rng)
}

/// Counts live entities by kind.
#[must_use]
pub fn counts(store: &EntityStore) -> KindCounts {
    let mut counts = KindCounts::default();
    for (_, (kind,)) in store.view::<(Kind,)>().iter() {
        counts.increment(kind);
    }
    counts
}

/// Every live entity with its attached components.
#[must_use]
pub fn dump(store: &EntityStore) -> Vec<(Entity, Vec<ComponentTag>)> {
    store.dump()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(count: usize) -> SpawnParams {
        SpawnParams {
            count,
            bounds: WorldBounds::new(960, 480),
            footprint: Footprint::new(40, 40),
            cooldown_ms: 500,
        }
    }

    #[test]
    fn test_initialize_spawns_count_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = params(100);
        let store = initialize(&p, &mut rng).unwrap();

        assert_eq!(store.len(), 100);
        assert_eq!(counts(&store).total(), 100);
        for (_, (position, cooldown)) in store.view::<(Position, Cooldown)>().iter() {
            assert!(p.bounds.contains(*position, p.footprint));
            assert_eq!(cooldown.duration_ms, 500);
            assert_eq!(cooldown.last_transition, None);
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = initialize(&params(30), &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = initialize(&params(30), &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let snapshot = |store: &EntityStore| -> Vec<(Position, Kind)> {
            store
                .view::<(Position, Kind)>()
                .iter()
                .map(|(_, (position, kind))| (*position, kind))
                .collect()
        };
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_reset_replaces_population() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let p = params(20);
        let mut store = initialize(&p, &mut rng).unwrap();
        let before: Vec<Entity> = store.entities().collect();

        reset(&mut store, &p, &mut rng).unwrap();

        assert_eq!(counts(&store).total(), 20);
        assert!(before.iter().all(|&entity| !store.is_alive(entity)));
    }

    #[test]
    fn test_populate_past_capacity_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut store = EntityStore::with_capacity(5);
        assert!(populate(&mut store, &params(6), &mut rng).is_err());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_empty_population() {
        let store = initialize(&params(0), &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
        assert!(store.is_empty());
        assert_eq!(counts(&store), KindCounts::default());
        assert!(dump(&store).is_empty());
    }

    #[test]
    fn test_settled() {
        let uniform = KindCounts { rock: 0, paper: 7, scissors: 0 };
        assert_eq!(uniform.settled(), Some(Kind::Paper));
        let mixed = KindCounts { rock: 1, paper: 7, scissors: 0 };
        assert_eq!(mixed.settled(), None);
        assert_eq!(KindCounts::default().settled(), None);
        assert_eq!(mixed.to_string(), "rock=1 paper=7 scissors=0");
    }
}
