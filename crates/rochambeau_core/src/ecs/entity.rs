//! # Entity Management
//!
//! Entities are lightweight handles consisting of:
//! - An index into component columns
//! - A generation counter so a handle to an erased entity is detectably stale

use super::component::Signature;

/// Opaque handle identifying one entity.
///
/// The handle is split into two parts:
/// - Lower 32 bits: Index into component columns
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid handle. Never handed out by the store.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this handle is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Per-slot bookkeeping: the handle currently living in the slot and the
/// bitmask of components attached to it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntityRecord {
    /// Handle of the entity occupying (or last occupying) this slot.
    pub(crate) id: Entity,
    /// Attached components.
    pub(crate) signature: Signature,
    /// Whether this slot is currently alive.
    pub(crate) alive: bool,
}

impl EntityRecord {
    /// Creates a live record with no components.
    #[inline]
    #[must_use]
    pub(crate) const fn new(id: Entity) -> Self {
        Self {
            id,
            signature: Signature::EMPTY,
            alive: true,
        }
    }

    /// Creates a dead slot whose next occupant starts at generation 0.
    #[inline]
    #[must_use]
    pub(crate) const fn vacant(index: u32) -> Self {
        Self {
            id: Entity::new(index, 0),
            signature: Signature::EMPTY,
            alive: false,
        }
    }

    /// True if `handle` names the entity currently alive in this slot.
    #[inline]
    #[must_use]
    pub(crate) fn holds(&self, handle: Entity) -> bool {
        self.alive && self.id == handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentTag;

    #[test]
    fn test_entity_roundtrip() {
        let id = Entity::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert!(!id.is_null());
        assert!(Entity::default().is_null());
    }

    #[test]
    fn test_record_holds_only_matching_generation() {
        let record = EntityRecord::new(Entity::new(3, 1));
        assert!(record.holds(Entity::new(3, 1)));
        assert!(!record.holds(Entity::new(3, 0)));

        let vacant = EntityRecord::vacant(3);
        assert!(!vacant.holds(vacant.id));
        assert!(!vacant.signature.contains(ComponentTag::Position));
    }

    #[test]
    fn test_display_shows_index_and_generation() {
        assert_eq!(Entity::new(7, 2).to_string(), "7v2");
    }
}
