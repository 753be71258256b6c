//! # Steering
//!
//! Each tick every entity takes one unit step per axis: toward the nearest
//! entity of its prey kind, and away from the nearest entity of its predator
//! kind. The two pulls are summed, so an entity squeezed between prey and
//! predator on the same side stays put on that axis.
//!
//! Entities move one at a time in slot order and later entities see earlier
//! entities' new positions.

use rochambeau_core::{EcsResult, Entity, EntityStore, Kind, Position};
use tracing::trace;

use crate::geometry::{Footprint, WorldBounds};

/// Closest entity of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nearest {
    /// Its handle.
    pub entity: Entity,
    /// Its position.
    pub position: Position,
    /// Squared distance from the search origin.
    pub distance_squared: u128,
}

/// Finds the entity of `kind` closest to `origin`.
///
/// Ties go to the first entity in slot order. An entity standing on `origin`
/// is a candidate like any other.
#[must_use]
pub fn nearest(store: &EntityStore, origin: Position, kind: Kind) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for (entity, (position, candidate)) in store.view::<(Position, Kind)>().iter() {
        if candidate != kind {
            continue;
        }
        let distance_squared = origin.distance_squared(*position);
        if best.map_or(true, |b| distance_squared < b.distance_squared) {
            best = Some(Nearest {
                entity,
                position: *position,
                distance_squared,
            });
        }
    }
    best
}

/// -1, 0 or +1 toward `to`.
#[inline]
fn unit_toward(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// Outcome of one steering pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SteeringReport {
    /// Entities whose position changed.
    pub moved: usize,
}

/// Moves every entity one step per tick.
#[derive(Clone, Copy, Debug)]
pub struct SteeringEngine {
    max: Position,
}

impl SteeringEngine {
    /// Creates an engine keeping every footprint inside `bounds`.
    #[must_use]
    pub fn new(bounds: WorldBounds, footprint: Footprint) -> Self {
        Self {
            max: bounds.max_position(footprint),
        }
    }

    /// Largest position an entity may be moved to.
    #[must_use]
    pub const fn max_position(&self) -> Position {
        self.max
    }

    /// Per-axis step for an entity of `kind` at `origin`, each component in
    /// `-2..=2`.
    #[must_use]
    pub fn heading(store: &EntityStore, origin: Position, kind: Kind) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if let Some(prey) = nearest(store, origin, kind.prey()) {
            dx += unit_toward(origin.x, prey.position.x);
            dy += unit_toward(origin.y, prey.position.y);
        }
        if let Some(predator) = nearest(store, origin, kind.predator()) {
            dx -= unit_toward(origin.x, predator.position.x);
            dy -= unit_toward(origin.y, predator.position.y);
        }
        (dx, dy)
    }

    /// Applies one step to every entity with a position and a kind, then
    /// clamps it to the world.
    ///
    /// # Errors
    ///
    /// Propagates store errors, which indicate a broken store invariant.
    pub fn update(&self, store: &mut EntityStore) -> EcsResult<SteeringReport> {
        let movers: Vec<(Entity, Kind)> = store
            .view::<(Position, Kind)>()
            .iter()
            .map(|(entity, (_, kind))| (entity, kind))
            .collect();

        let mut report = SteeringReport::default();
        for (entity, kind) in movers {
            let origin = store.get::<Position>(entity)?;
            let (dx, dy) = Self::heading(store, origin, kind);
            let next = Position::new(origin.x.saturating_add(dx), origin.y.saturating_add(dy))
                .clamped(self.max.x, self.max.y);
            if next != origin {
                *store.get_mut::<Position>(entity)? = next;
                report.moved += 1;
                trace!(%entity, ?kind, x = next.x, y = next.y, "moved");
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rochambeau_core::Cooldown;

    fn spawn(store: &mut EntityStore, x: i32, y: i32, kind: Kind) -> Entity {
        store
            .create([Position::new(x, y).into(), kind.into(), Cooldown::default().into()])
            .unwrap()
    }

    fn engine() -> SteeringEngine {
        SteeringEngine::new(WorldBounds::new(960, 480), Footprint::new(40, 40))
    }

    #[test]
    fn test_nearest_picks_closest_of_kind() {
        let mut store = EntityStore::with_capacity(8);
        let near = spawn(&mut store, 5, 5, Kind::Scissors);
        spawn(&mut store, 100, 100, Kind::Scissors);
        spawn(&mut store, 1, 1, Kind::Paper);

        let found = nearest(&store, Position::new(0, 0), Kind::Scissors).unwrap();
        assert_eq!(found.entity, near);
        assert_eq!(found.distance_squared, 50);
        assert!(nearest(&store, Position::new(0, 0), Kind::Rock).is_none());
    }

    #[test]
    fn test_nearest_handles_extreme_coordinates() {
        let mut store = EntityStore::with_capacity(8);
        spawn(&mut store, i32::MAX, i32::MAX, Kind::Paper);
        let middle = spawn(&mut store, 0, 0, Kind::Paper);

        let found = nearest(&store, Position::new(i32::MIN, i32::MIN), Kind::Paper).unwrap();
        assert_eq!(found.entity, middle);
        assert_eq!(found.distance_squared, 2 * (1_u128 << 62));
    }

    #[test]
    fn test_nearest_tie_goes_to_first_slot() {
        let mut store = EntityStore::with_capacity(8);
        let first = spawn(&mut store, 10, 0, Kind::Paper);
        spawn(&mut store, 0, 10, Kind::Paper);
        assert_eq!(nearest(&store, Position::new(0, 0), Kind::Paper).unwrap().entity, first);
    }

    #[test]
    fn test_rock_steps_toward_nearest_scissors() {
        let mut store = EntityStore::with_capacity(8);
        let rock = spawn(&mut store, 0, 0, Kind::Rock);
        spawn(&mut store, 5, 5, Kind::Scissors);
        spawn(&mut store, 100, 100, Kind::Scissors);

        let origin = store.get::<Position>(rock).unwrap();
        assert_eq!(SteeringEngine::heading(&store, origin, Kind::Rock), (1, 1));

        engine().update(&mut store).unwrap();
        assert_eq!(store.get::<Position>(rock).unwrap(), Position::new(1, 1));
    }

    #[test]
    fn test_flees_predator() {
        let mut store = EntityStore::with_capacity(8);
        let rock = spawn(&mut store, 50, 50, Kind::Rock);
        spawn(&mut store, 60, 40, Kind::Paper);

        let origin = store.get::<Position>(rock).unwrap();
        assert_eq!(SteeringEngine::heading(&store, origin, Kind::Rock), (-1, 1));
    }

    #[test]
    fn test_lone_entity_does_not_move() {
        let mut store = EntityStore::with_capacity(2);
        let rock = spawn(&mut store, 50, 50, Kind::Rock);
        let report = engine().update(&mut store).unwrap();
        assert_eq!(report.moved, 0);
        assert_eq!(store.get::<Position>(rock).unwrap(), Position::new(50, 50));
    }

    #[test]
    fn test_positions_clamped_at_corners() {
        let mut store = EntityStore::with_capacity(8);
        // Each rock is pushed outward by a paper sitting inside the world.
        let low = spawn(&mut store, 0, 0, Kind::Rock);
        spawn(&mut store, 5, 5, Kind::Paper);
        let high = spawn(&mut store, 920, 440, Kind::Rock);
        spawn(&mut store, 900, 400, Kind::Paper);

        let steering = engine();
        assert_eq!(steering.max_position(), Position::new(920, 440));
        steering.update(&mut store).unwrap();

        assert_eq!(store.get::<Position>(low).unwrap(), Position::new(0, 0));
        assert_eq!(store.get::<Position>(high).unwrap(), Position::new(920, 440));
    }

    #[test]
    fn test_many_ticks_stay_in_bounds() {
        let mut store = EntityStore::with_capacity(9);
        for i in 0..9 {
            spawn(&mut store, (i * 113) % 921, (i * 59) % 441, Kind::from_index(i as usize));
        }
        let steering = engine();
        for _ in 0..200 {
            steering.update(&mut store).unwrap();
        }
        let max = steering.max_position();
        for (_, (position,)) in store.view::<(Position,)>().iter() {
            assert!((0..=max.x).contains(&position.x));
            assert!((0..=max.y).contains(&position.y));
        }
    }

    #[test]
    fn test_later_movers_see_earlier_moves() {
        let mut store = EntityStore::with_capacity(4);
        // The rock moves first; the scissors then flees from its new position.
        spawn(&mut store, 10, 10, Kind::Rock);
        let scissors = spawn(&mut store, 11, 20, Kind::Scissors);

        engine().update(&mut store).unwrap();
        // Rock moved to (11, 11), so the scissors sees it straight above.
        assert_eq!(store.get::<Position>(scissors).unwrap(), Position::new(11, 21));
    }
}
