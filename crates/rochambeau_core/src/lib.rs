//! # Rochambeau Core
//!
//! Entity store for the Rock-Paper-Scissors population simulation:
//! - Generational entity handles, so a stale handle is an error instead of
//!   silently aliasing a new entity
//! - Dense, pre-allocated component columns plus a membership bitmask
//! - Typed, recomputed-on-demand views over the closed component set
//!
//! ## Architecture Rules
//!
//! 1. **The store owns the invariants** - exactly one kind per entity is a
//!    property of the storage layout, not a convention callers must follow
//! 2. **No rules here** - predator/prey semantics live in the `rochambeau` crate
//! 3. **No hidden caches** - views re-derive membership on every call
//!
//! ## Example
//!
//! ```rust,ignore
//! use rochambeau_core::{Cooldown, EntityStore, Kind, Position, Rock};
//!
//! let mut store = EntityStore::with_capacity(100);
//! store.create([Position::new(10, 10).into(), Kind::Rock.into(), Cooldown::new(500).into()])?;
//! for (entity, (position, _)) in store.view::<(Position, Rock)>().iter() {
//!     // ...
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    ColumnComponent, Component, ComponentTag, ComponentValue, Cooldown, Entity, EntityStore, Fetch,
    Kind, Paper, Position, Query, Rock, Scissors, Signature, SimTime, View, ViewMut,
    DEFAULT_COOLDOWN_MS,
};
pub use error::{EcsError, EcsResult};
