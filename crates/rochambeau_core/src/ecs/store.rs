//! # Entity Store
//!
//! The canonical container for every live entity and its components.
//! All slots are allocated at creation; erased slots go back on a free list
//! and come back with a bumped generation.

use super::component::{
    ColumnComponent, Component, ComponentTag, ComponentValue, Kind, Signature,
};
use super::entity::{Entity, EntityRecord};
use super::query::{Query, Row, RowMut};
use super::storage::Columns;
use super::view::{View, ViewMut};
use crate::error::{EcsError, EcsResult};

/// Owns entity identity and raw component storage.
///
/// The store has a fixed capacity set at creation.
///
/// ```rust,ignore
/// let mut store = EntityStore::with_capacity(100);
/// let rock = store.create([
///     Position::new(10, 10).into(),
///     Kind::Rock.into(),
///     Cooldown::new(500).into(),
/// ])?;
/// ```
#[derive(Clone, Debug)]
pub struct EntityStore {
    records: Box<[EntityRecord]>,
    free_indices: Vec<u32>,
    alive_count: usize,
    columns: Columns,
}

impl EntityStore {
    /// Creates a store with `capacity` pre-allocated slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity exceeds `u32::MAX`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let Ok(slots) = u32::try_from(capacity) else {
            panic!("Capacity cannot exceed u32::MAX");
        };

        let records = (0..slots)
            .map(EntityRecord::vacant)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        // Popped from the back, so slot 0 is handed out first
        let free_indices: Vec<u32> = (0..slots).rev().collect();

        Self {
            records,
            free_indices,
            alive_count: 0,
            columns: Columns::new(capacity),
        }
    }

    /// Maximum number of simultaneously live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.alive_count
    }

    /// True if no entity is alive.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Creates an entity from a complete component set.
    ///
    /// The set must hold exactly one Position, one Kind and one Cooldown.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidComponentSet`] if a component is missing or repeated
    /// - [`EcsError::CapacityExhausted`] if every slot is in use
    pub fn create<I>(&mut self, components: I) -> EcsResult<Entity>
    where
        I: IntoIterator<Item = ComponentValue>,
    {
        let components: Vec<ComponentValue> = components.into_iter().collect();
        validate_component_set(&components)?;

        let Some(index) = self.free_indices.pop() else {
            return Err(EcsError::CapacityExhausted {
                capacity: self.capacity(),
            });
        };

        let idx = index as usize;
        let Some(record) = self.records.get_mut(idx) else {
            return Err(EcsError::CapacityExhausted {
                capacity: self.records.len(),
            });
        };

        // The slot's generation was bumped when its previous occupant was erased
        let id = record.id;
        *record = EntityRecord::new(id);

        let mut signature = Signature::EMPTY;
        for component in components {
            let columns = &mut self.columns;
            match component {
                ComponentValue::Position(value) => value.attach(&mut signature, columns, idx),
                ComponentValue::Kind(value) => value.attach(&mut signature, columns, idx),
                ComponentValue::Cooldown(value) => value.attach(&mut signature, columns, idx),
            }
        }
        record.signature = signature;
        self.alive_count += 1;

        tracing::trace!(entity = %id, ?signature, "entity created");
        Ok(id)
    }

    /// Attaches or overwrites component `T`.
    ///
    /// Adding a [`Kind`] replaces the previous kind in a single step.
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if `entity` is not alive.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let idx = self.live_index(entity)?;
        let Some(record) = self.records.get_mut(idx) else {
            return Err(EcsError::StaleEntity(entity));
        };
        value.attach(&mut record.signature, &mut self.columns, idx);
        Ok(())
    }

    /// Detaches component `T`. A no-op if it is not attached.
    ///
    /// Removing a [`Kind`] leaves the entity kindless until the caller adds a
    /// new one; the store never picks a default.
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if `entity` is not alive.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        let idx = self.live_index(entity)?;
        let Some(record) = self.records.get_mut(idx) else {
            return Err(EcsError::StaleEntity(entity));
        };
        T::detach(&mut record.signature, &mut self.columns, idx);
        Ok(())
    }

    /// Reads component `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::StaleEntity`] if `entity` is not alive
    /// - [`EcsError::MissingComponent`] if it does not carry `T`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<T> {
        let record = self.record(entity)?;
        let idx = entity.index() as usize;
        T::read(record.signature, &self.columns, idx).ok_or(EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        })
    }

    /// Borrows column component `T` mutably.
    ///
    /// # Errors
    ///
    /// - [`EcsError::StaleEntity`] if `entity` is not alive
    /// - [`EcsError::MissingComponent`] if it does not carry `T`
    pub fn get_mut<T: ColumnComponent>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let record = self.record(entity)?;
        let missing = EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        };
        if !record.signature.contains(T::TAG) {
            return Err(missing);
        }
        T::column_mut(&mut self.columns)
            .get_mut(entity.index() as usize)
            .ok_or(missing)
    }

    /// The entity's kind.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub fn kind_of(&self, entity: Entity) -> EcsResult<Kind> {
        self.get::<Kind>(entity)
    }

    /// True iff the entity currently carries every element of `Q`.
    ///
    /// ```rust,ignore
    /// store.has::<(Position, Rock)>(entity)?
    /// ```
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if `entity` is not alive.
    pub fn has<Q: Query>(&self, entity: Entity) -> EcsResult<bool> {
        Ok(Q::matches(self.record(entity)?.signature))
    }

    /// Checks if a handle names a live entity.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.record(entity).is_ok()
    }

    /// Erases the entity and all its components.
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if `entity` is not alive.
    pub fn erase(&mut self, entity: Entity) -> EcsResult<()> {
        let idx = self.live_index(entity)?;
        let Some(record) = self.records.get_mut(idx) else {
            return Err(EcsError::StaleEntity(entity));
        };

        record.alive = false;
        record.signature = Signature::EMPTY;
        // Bump now so any handle still held by a caller is stale from here on
        record.id = Entity::new(entity.index(), entity.generation().wrapping_add(1));
        self.columns.reset(idx);
        self.free_indices.push(entity.index());
        self.alive_count -= 1;

        tracing::trace!(entity = %entity, "entity erased");
        Ok(())
    }

    /// Erases every live entity. Capacity is kept and every old handle
    /// becomes stale.
    pub fn clear(&mut self) {
        let erased = self.alive_count;
        for record in self.records.iter_mut().filter(|record| record.alive) {
            record.alive = false;
            record.signature = Signature::EMPTY;
            record.id = Entity::new(record.id.index(), record.id.generation().wrapping_add(1));
        }
        self.columns.clear();

        let slots = self.records.len();
        self.free_indices.clear();
        self.free_indices.extend(
            (0..slots)
                .rev()
                .filter_map(|index| u32::try_from(index).ok()),
        );
        self.alive_count = 0;

        tracing::debug!(erased, "entity store cleared");
    }

    /// Handles of every live entity, in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.records
            .iter()
            .filter(|record| record.alive)
            .map(|record| record.id)
    }

    /// Read-only view over entities matching `Q`.
    #[must_use]
    pub const fn view<Q: Query>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Mutable view over entities matching `Q`.
    pub fn view_mut<Q: Query>(&mut self) -> ViewMut<'_, Q> {
        ViewMut::new(self)
    }

    /// Calls `f` with mutable borrows for every entity matching `Q`.
    ///
    /// The closure cannot reach the store, so entities cannot be created or
    /// erased mid-iteration.
    pub fn for_each<Q, F>(&mut self, f: F)
    where
        Q: Query,
        F: FnMut(Entity, Q::ItemMut<'_>),
    {
        self.view_mut::<Q>().for_each(f);
    }

    /// Every live entity with its attached component tags, in tag order.
    #[must_use]
    pub fn dump(&self) -> Vec<(Entity, Vec<ComponentTag>)> {
        self.records
            .iter()
            .filter(|record| record.alive)
            .map(|record| (record.id, record.signature.tags().collect()))
            .collect()
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (Entity, Row<'_>)> + '_ {
        self.records
            .iter()
            .zip(self.columns.positions.as_slice())
            .zip(self.columns.cooldowns.as_slice())
            .filter(|((record, _), _)| record.alive)
            .map(|((record, position), cooldown)| {
                (
                    record.id,
                    Row {
                        signature: record.signature,
                        position,
                        cooldown,
                    },
                )
            })
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = (Entity, RowMut<'_>)> + '_ {
        let Columns {
            positions,
            cooldowns,
        } = &mut self.columns;
        self.records
            .iter()
            .zip(positions.as_mut_slice().iter_mut())
            .zip(cooldowns.as_mut_slice().iter_mut())
            .filter(|((record, _), _)| record.alive)
            .map(|((record, position), cooldown)| {
                (record.id, RowMut::new(record.signature, position, cooldown))
            })
    }

    fn record(&self, entity: Entity) -> EcsResult<&EntityRecord> {
        if entity.is_null() {
            return Err(EcsError::StaleEntity(entity));
        }
        self.records
            .get(entity.index() as usize)
            .filter(|record| record.holds(entity))
            .ok_or(EcsError::StaleEntity(entity))
    }

    fn live_index(&self, entity: Entity) -> EcsResult<usize> {
        self.record(entity).map(|_| entity.index() as usize)
    }
}

fn validate_component_set(components: &[ComponentValue]) -> EcsResult<()> {
    const REQUIRED: [&str; 3] = ["Position", "Kind", "Cooldown"];

    let mut seen = [0usize; 3];
    for component in components {
        let slot = match component {
            ComponentValue::Position(_) => 0,
            ComponentValue::Kind(_) => 1,
            ComponentValue::Cooldown(_) => 2,
        };
        if let Some(count) = seen.get_mut(slot) {
            *count += 1;
        }
    }

    let missing: Vec<&'static str> = REQUIRED
        .into_iter()
        .zip(seen)
        .filter(|(_, count)| *count == 0)
        .map(|(name, _)| name)
        .collect();
    let duplicated: Vec<&'static str> = REQUIRED
        .into_iter()
        .zip(seen)
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() && duplicated.is_empty() {
        Ok(())
    } else {
        Err(EcsError::InvalidComponentSet {
            missing,
            duplicated,
        })
    }
}
