//! # Rochambeau
//!
//! Rock-Paper-Scissors population simulation on top of `rochambeau_core`:
//! - Steering: every entity chases its nearest prey and flees its nearest
//!   predator, one grid unit per axis per tick
//! - Collision: an overlapping predator converts its prey, gated by a
//!   per-entity cooldown
//! - Driver: real-time or unthrottled ticking under external control
//!
//! ## Architecture Rules
//!
//! 1. **Engines are stateless** - all simulation state lives in the store
//! 2. **Simulated time only** - cooldowns compare [`SimTime`], never wall time
//! 3. **Explicit randomness** - the RNG is owned by [`Simulation`] and seeded
//!    from config, so a seeded run is reproducible
//!
//! ## Example
//!
//! ```rust,ignore
//! use rochambeau::{Driver, SimConfig, Simulation};
//!
//! let config = SimConfig::load("config/default.toml")?;
//! let mut sim = Simulation::new(&config)?;
//! let (mut driver, controls) = Driver::new(config.schedule);
//! let summary = driver.run(&mut sim)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collision;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod population;
pub mod rules;
pub mod simulation;
pub mod steering;

pub use collision::{CollisionReport, CollisionResolver, Conversion};
pub use config::{
    EntityConfig, Pacing, PopulationConfig, ScheduleConfig, SimConfig, WorldConfig,
};
pub use driver::{ControlSignal, Driver, RunState, RunSummary, TickLoop, TickStats};
pub use error::{ConfigError, SimError, SimResult};
pub use geometry::{Footprint, WorldBounds};
pub use population::{counts, dump, initialize, populate, reset, KindCounts, SpawnParams};
pub use rules::{predator_of, prey_of, CONVERSION_CYCLE};
pub use simulation::{Simulation, TickReport};
pub use steering::{nearest, Nearest, SteeringEngine, SteeringReport};

pub use rochambeau_core::{Entity, EntityStore, Kind, Position, SimTime};
