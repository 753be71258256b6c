//! # Entity Component System
//!
//! A closed-set ECS: the component types are known at compile time, so
//! storage is a fixed set of typed columns instead of type-erased maps.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated at store creation
//! - Components are stored in dense arrays indexed by slot
//! - Entity handles are slot indices with generation counters
//! - Membership is a per-entity bitmask; Kind is three exclusive bits of it
//! - No dynamic dispatch

mod component;
mod entity;
mod query;
mod storage;
mod store;
mod view;

pub(crate) mod sealed {
    /// Closes [`super::Component`], [`super::Fetch`] and [`super::Query`] to
    /// the types defined in this crate.
    pub trait Sealed {}
}

pub use component::{
    ColumnComponent, Component, ComponentTag, ComponentValue, Cooldown, Kind, Paper, Position,
    Rock, Scissors, Signature, SimTime, DEFAULT_COOLDOWN_MS,
};
pub use entity::Entity;
pub use query::{Fetch, Query};
pub use store::EntityStore;
pub use view::{View, ViewMut};
