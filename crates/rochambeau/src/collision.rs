//! # Collision Resolution
//!
//! Runs one pass per `(predator, prey)` pair of the conversion cycle. A
//! predator converts an overlapping prey when neither is cooling down; the
//! prey takes the predator's kind and both cooldowns restart.
//!
//! Membership for a pass is taken when the pass starts, but every candidate's
//! kind is checked again before converting, so an entity converted earlier in
//! the same pass is skipped. A predator stops hunting for the rest of the
//! pass once it converts, since its cooldown has just restarted.

use rochambeau_core::{Cooldown, EcsResult, Entity, EntityStore, Kind, Position, SimTime};
use tracing::{debug, trace};

use crate::geometry::Footprint;
use crate::rules::CONVERSION_CYCLE;

/// A single conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// The converting entity.
    pub predator: Entity,
    /// The converted entity.
    pub prey: Entity,
    /// The prey's kind before conversion.
    pub from: Kind,
    /// The prey's kind after conversion, equal to the predator's.
    pub to: Kind,
}

/// Outcome of one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Conversions applied, in order.
    pub conversions: Vec<Conversion>,
    /// Overlapping predator/prey pairs held back by a cooldown.
    pub blocked_by_cooldown: usize,
}

/// Applies the conversion rules to overlapping entities.
#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    footprint: Footprint,
}

impl CollisionResolver {
    /// Creates a resolver for entities of `footprint`.
    #[must_use]
    pub const fn new(footprint: Footprint) -> Self {
        Self { footprint }
    }

    /// Resolves every pair kind at simulated time `now`.
    ///
    /// # Errors
    ///
    /// Propagates store errors, which indicate a broken store invariant.
    pub fn resolve(&self, store: &mut EntityStore, now: SimTime) -> EcsResult<CollisionReport> {
        let mut report = CollisionReport::default();
        for (predator_kind, prey_kind) in CONVERSION_CYCLE {
            self.resolve_pair(store, predator_kind, prey_kind, now, &mut report)?;
        }
        Ok(report)
    }

    fn resolve_pair(
        &self,
        store: &mut EntityStore,
        predator_kind: Kind,
        prey_kind: Kind,
        now: SimTime,
        report: &mut CollisionReport,
    ) -> EcsResult<()> {
        let predators = members(store, predator_kind);
        let prey = members(store, prey_kind);
        trace!(
            predator = ?predator_kind,
            prey = ?prey_kind,
            predators = predators.len(),
            candidates = prey.len(),
            "collision pass"
        );
        if predators.is_empty() || prey.is_empty() {
            return Ok(());
        }

        for predator in predators {
            let hunter_at = store.get::<Position>(predator)?;
            for &target in &prey {
                if store.kind_of(target)? != prey_kind {
                    continue;
                }
                let target_at = store.get::<Position>(target)?;
                if !self.footprint.overlaps(hunter_at, target_at) {
                    continue;
                }
                let ready = store.get::<Cooldown>(predator)?.expired(now)
                    && store.get::<Cooldown>(target)?.expired(now);
                if !ready {
                    report.blocked_by_cooldown += 1;
                    continue;
                }

                store.add(target, predator_kind)?;
                store.get_mut::<Cooldown>(predator)?.reset(now);
                store.get_mut::<Cooldown>(target)?.reset(now);
                debug!(
                    %predator,
                    prey = %target,
                    from = ?prey_kind,
                    to = ?predator_kind,
                    at_ms = now.as_millis(),
                    "conversion"
                );
                report.conversions.push(Conversion {
                    predator,
                    prey: target,
                    from: prey_kind,
                    to: predator_kind,
                });
                break;
            }
        }
        Ok(())
    }
}

/// Live entities of `kind` carrying everything a collision needs.
fn members(store: &EntityStore, kind: Kind) -> Vec<Entity> {
    store
        .view::<(Position, Cooldown, Kind)>()
        .iter()
        .filter(|(_, (_, _, candidate))| *candidate == kind)
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(store: &mut EntityStore, x: i32, y: i32, kind: Kind) -> Entity {
        store
            .create([Position::new(x, y).into(), kind.into(), Cooldown::new(500).into()])
            .unwrap()
    }

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(Footprint::new(40, 40))
    }

    #[test]
    fn test_rock_converts_overlapping_scissors() {
        let mut store = EntityStore::with_capacity(4);
        let rock = spawn(&mut store, 10, 10, Kind::Rock);
        let scissors = spawn(&mut store, 10, 10, Kind::Scissors);
        let now = SimTime(1_000);

        let report = resolver().resolve(&mut store, now).unwrap();

        assert_eq!(report.conversions.len(), 1);
        assert_eq!(
            report.conversions[0],
            Conversion { predator: rock, prey: scissors, from: Kind::Scissors, to: Kind::Rock }
        );
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Rock);
        assert_eq!(store.kind_of(rock).unwrap(), Kind::Rock);
        assert_eq!(store.get::<Cooldown>(rock).unwrap().last_transition, Some(now));
        assert_eq!(store.get::<Cooldown>(scissors).unwrap().last_transition, Some(now));
    }

    #[test]
    fn test_active_cooldown_blocks_conversion() {
        let mut store = EntityStore::with_capacity(4);
        let rock = spawn(&mut store, 10, 10, Kind::Rock);
        let scissors = spawn(&mut store, 10, 10, Kind::Scissors);
        store.get_mut::<Cooldown>(rock).unwrap().reset(SimTime(900));

        let report = resolver().resolve(&mut store, SimTime(1_000)).unwrap();

        assert!(report.conversions.is_empty());
        assert_eq!(report.blocked_by_cooldown, 1);
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Scissors);
    }

    #[test]
    fn test_cooldown_boundary_is_strict() {
        let mut store = EntityStore::with_capacity(4);
        let rock = spawn(&mut store, 0, 0, Kind::Rock);
        let scissors = spawn(&mut store, 0, 0, Kind::Scissors);
        store.get_mut::<Cooldown>(rock).unwrap().reset(SimTime(0));

        resolver().resolve(&mut store, SimTime(500)).unwrap();
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Scissors);

        resolver().resolve(&mut store, SimTime(501)).unwrap();
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Rock);
    }

    #[test]
    fn test_same_kind_never_converts() {
        let mut store = EntityStore::with_capacity(4);
        spawn(&mut store, 10, 10, Kind::Paper);
        spawn(&mut store, 10, 10, Kind::Paper);

        let report = resolver().resolve(&mut store, SimTime(1_000)).unwrap();

        assert!(report.conversions.is_empty());
        assert_eq!(report.blocked_by_cooldown, 0);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let mut store = EntityStore::with_capacity(4);
        spawn(&mut store, 0, 0, Kind::Rock);
        let scissors = spawn(&mut store, 40, 0, Kind::Scissors);

        resolver().resolve(&mut store, SimTime(1_000)).unwrap();
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Scissors);
    }

    #[test]
    fn test_converted_prey_skipped_within_pass() {
        let mut store = EntityStore::with_capacity(4);
        let first = spawn(&mut store, 0, 0, Kind::Rock);
        let second = spawn(&mut store, 0, 0, Kind::Rock);
        let scissors = spawn(&mut store, 0, 0, Kind::Scissors);

        let report = resolver().resolve(&mut store, SimTime(1_000)).unwrap();

        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.conversions[0].predator, first);
        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Rock);
        // The second rock never met the scissors as prey and never cooled down.
        assert_eq!(store.get::<Cooldown>(second).unwrap().last_transition, None);
    }

    #[test]
    fn test_converted_entity_not_converted_again_same_tick() {
        let mut store = EntityStore::with_capacity(4);
        // Rock converts the scissors in the first pass. The new rock's
        // cooldown then shields it from the paper in the third pass.
        spawn(&mut store, 0, 0, Kind::Rock);
        let scissors = spawn(&mut store, 0, 0, Kind::Scissors);
        spawn(&mut store, 30, 30, Kind::Paper);

        let report = resolver().resolve(&mut store, SimTime(1_000)).unwrap();

        assert_eq!(store.kind_of(scissors).unwrap(), Kind::Rock);
        assert_eq!(report.conversions.len(), 1);
        assert_eq!(report.blocked_by_cooldown, 2);
    }

    #[test]
    fn test_population_conserved() {
        let mut store = EntityStore::with_capacity(16);
        for i in 0..12 {
            spawn(&mut store, (i % 4) * 10, (i / 4) * 10, Kind::from_index(i as usize));
        }
        let before = store.len();
        for step in 1..=20 {
            resolver().resolve(&mut store, SimTime(step * 300)).unwrap();
            assert_eq!(store.len(), before);
            assert_eq!(store.view::<(Kind,)>().count(), before);
        }
    }
}
