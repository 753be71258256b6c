//! # Component Views
//!
//! A view is a typed cursor over every live entity matching a [`Query`].
//! Views cache nothing: each call to [`View::iter`] walks the store as it is
//! at that moment, so membership always reflects the latest `add`/`remove`.
//!
//! Iteration order is slot order. It is stable within a call but callers must
//! not rely on it for correctness.

use std::marker::PhantomData;

use super::entity::Entity;
use super::query::Query;
use super::store::EntityStore;

/// Read-only view over entities matching `Q`.
pub struct View<'s, Q: Query> {
    store: &'s EntityStore,
    _query: PhantomData<fn() -> Q>,
}

impl<'s, Q: Query> View<'s, Q> {
    pub(crate) const fn new(store: &'s EntityStore) -> Self {
        Self {
            store,
            _query: PhantomData,
        }
    }

    /// Enumerates every matching entity as of this call.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, Q::Item<'s>)> + 's {
        let store: &'s EntityStore = self.store;
        store
            .rows()
            .filter_map(|(entity, row)| Q::fetch(&row).map(|item| (entity, item)))
    }

    /// Number of matching entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store
            .rows()
            .filter(|(_, row)| Q::matches(row.signature))
            .count()
    }

    /// True if nothing matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self
            .store
            .rows()
            .any(|(_, row)| Q::matches(row.signature))
    }

    /// Handles of every matching entity, collected now.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.store
            .rows()
            .filter(|(_, row)| Q::matches(row.signature))
            .map(|(entity, _)| entity)
            .collect()
    }
}

/// Mutable view over entities matching `Q`.
///
/// Holding the store mutably for the view's lifetime rules out creating or
/// erasing entities while iterating.
pub struct ViewMut<'s, Q: Query> {
    store: &'s mut EntityStore,
    _query: PhantomData<fn() -> Q>,
}

impl<'s, Q: Query> ViewMut<'s, Q> {
    pub(crate) fn new(store: &'s mut EntityStore) -> Self {
        Self {
            store,
            _query: PhantomData,
        }
    }

    /// Enumerates every matching entity with mutable component borrows.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, Q::ItemMut<'_>)> + '_ {
        self.store
            .rows_mut()
            .filter_map(|(entity, row)| Q::fetch_mut(row).map(|item| (entity, item)))
    }

    /// Calls `f` for every matching entity.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(Entity, Q::ItemMut<'_>),
    {
        for (entity, item) in self.iter_mut() {
            f(entity, item);
        }
    }
}
