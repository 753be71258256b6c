//! # Store Error Types
//!
//! Contract violations reported by the entity store. They indicate a bug in
//! the calling engine, not bad input, and are expected to abort the tick.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors raised by [`crate::EntityStore`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The handle names an erased or never-created entity.
    #[error("stale entity handle {0}")]
    StaleEntity(Entity),

    /// `create` was given an incomplete or ambiguous component set.
    #[error("invalid component set: missing {missing:?}, duplicated {duplicated:?}")]
    InvalidComponentSet {
        /// Required components that were not supplied.
        missing: Vec<&'static str>,
        /// Components supplied more than once.
        duplicated: Vec<&'static str>,
    },

    /// Every pre-allocated slot is in use.
    #[error("entity store full: capacity {capacity}")]
    CapacityExhausted {
        /// The store's fixed capacity.
        capacity: usize,
    },

    /// The entity is alive but does not carry the requested component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The entity queried.
        entity: Entity,
        /// Name of the absent component type.
        component: &'static str,
    },
}

/// Result type for store operations.
pub type EcsResult<T> = Result<T, EcsError>;
