//! # Component Storage
//!
//! Pre-allocated, dense component columns.
//!
//! - All slots are allocated when the store is created
//! - Access is O(1) via entity index
//! - Iteration is cache-friendly (contiguous memory)
//!
//! A column slot holds a meaningful value only while the owning entity's
//! signature carries the column's tag; otherwise it holds `C::default()`.

use super::component::{Cooldown, Position};

/// Pre-allocated storage for a single component type.
///
/// ```rust,ignore
/// let mut storage: ComponentStorage<Position> = ComponentStorage::new(1_000);
/// storage.set(0, Position::new(1, 2));
/// ```
#[derive(Clone, Debug)]
pub struct ComponentStorage<C: Copy + Default> {
    data: Box<[C]>,
}

impl<C: Copy + Default> ComponentStorage<C> {
    /// Creates a column with `capacity` default-initialised slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![C::default(); capacity].into_boxed_slice(),
        }
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Gets a component by entity index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets a mutable component by entity index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Overwrites the slot at `index`.
    ///
    /// Returns `false` if `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, component: C) -> bool {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = component;
            true
        } else {
            false
        }
    }

    /// All slots.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// All slots, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// Resets a slot to its default value.
    #[inline]
    pub fn reset(&mut self, index: usize) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = C::default();
        }
    }

    /// Resets every slot to its default value. No memory is freed.
    pub fn clear(&mut self) {
        self.data.fill(C::default());
    }
}

/// The store's column set, one column per column component.
///
/// Only the store can build or reach one, so component hooks taking a
/// `Columns` cannot be driven from outside the crate.
#[derive(Clone, Debug)]
pub struct Columns {
    pub(crate) positions: ComponentStorage<Position>,
    pub(crate) cooldowns: ComponentStorage<Cooldown>,
}

impl Columns {
    /// Allocates every column with `capacity` slots.
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            positions: ComponentStorage::new(capacity),
            cooldowns: ComponentStorage::new(capacity),
        }
    }

    /// Resets every column slot at `index`.
    pub(crate) fn reset(&mut self, index: usize) {
        self.positions.reset(index);
        self.cooldowns.reset(index);
    }

    /// Resets every column.
    pub(crate) fn clear(&mut self) {
        self.positions.clear();
        self.cooldowns.clear();
    }
}
