//! # Simulation Configuration
//!
//! Every tunable lives in one TOML document. All sections and keys are
//! optional; a missing key takes the default below.
//!
//! ```toml
//! [world]
//! width = 960
//! height = 480
//!
//! [entity]
//! width = 40
//! height = 40
//! cooldown_ms = 500
//!
//! [population]
//! count = 100
//! # seed = 42
//!
//! [schedule]
//! tick_interval_ms = 30
//! report_every = 100
//! max_ticks = 0
//! stop_when_settled = true
//! pacing = "realtime"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Footprint, WorldBounds};
use crate::population::SpawnParams;

/// Default world width.
pub const DEFAULT_WORLD_WIDTH: u32 = 960;
/// Default world height.
pub const DEFAULT_WORLD_HEIGHT: u32 = 480;
/// Default entity footprint edge.
pub const DEFAULT_ENTITY_SIZE: u32 = 40;
/// Default population size.
pub const DEFAULT_POPULATION: usize = 100;
/// Default simulated milliseconds per tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// World size.
    pub world: WorldConfig,
    /// Per-entity geometry and cooldown.
    pub entity: EntityConfig,
    /// Initial population.
    pub population: PopulationConfig,
    /// Tick scheduling.
    pub schedule: ScheduleConfig,
}

/// `[world]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Width in grid units.
    pub width: u32,
    /// Height in grid units.
    pub height: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
        }
    }
}

/// `[entity]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityConfig {
    /// Footprint width.
    pub width: u32,
    /// Footprint height.
    pub height: u32,
    /// Minimum simulated milliseconds between conversions of one entity.
    pub cooldown_ms: u64,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_ENTITY_SIZE,
            height: DEFAULT_ENTITY_SIZE,
            cooldown_ms: rochambeau_core::DEFAULT_COOLDOWN_MS,
        }
    }
}

/// `[population]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Number of entities spawned by initialize and reset.
    pub count: usize,
    /// RNG seed. Seeded from the wall clock when absent.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_POPULATION,
            seed: None,
        }
    }
}

/// How the driver spaces ticks in wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// One tick per `tick_interval_ms` of wall-clock time.
    #[default]
    RealTime,
    /// Ticks back to back. Simulated time still advances by the interval.
    Unthrottled,
}

/// `[schedule]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Simulated milliseconds per tick.
    pub tick_interval_ms: u64,
    /// Log a population report every N ticks. 0 disables reports.
    pub report_every: u64,
    /// Stop after this many ticks. 0 runs until settled or terminated.
    pub max_ticks: u64,
    /// Stop once a single kind remains.
    pub stop_when_settled: bool,
    /// Wall-clock pacing.
    pub pacing: Pacing,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            report_every: 100,
            max_ticks: 0,
            stop_when_settled: true,
            pacing: Pacing::RealTime,
        }
    }
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that the values describe a runnable world.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(ConfigError::Invalid("world dimensions must be non-zero".into()));
        }
        if self.entity.width == 0 || self.entity.height == 0 {
            return Err(ConfigError::Invalid("entity footprint must be non-zero".into()));
        }
        if self.entity.width > self.world.width || self.entity.height > self.world.height {
            return Err(ConfigError::Invalid(format!(
                "entity footprint {}x{} does not fit in world {}x{}",
                self.entity.width, self.entity.height, self.world.width, self.world.height
            )));
        }
        if i32::try_from(self.world.width).is_err() || i32::try_from(self.world.height).is_err() {
            return Err(ConfigError::Invalid("world dimensions exceed i32::MAX".into()));
        }
        if u32::try_from(self.population.count).is_err() {
            return Err(ConfigError::Invalid("population.count exceeds u32::MAX".into()));
        }
        if self.schedule.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("schedule.tick_interval_ms must be non-zero".into()));
        }
        Ok(())
    }

    /// World bounds.
    #[must_use]
    pub const fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world.width, self.world.height)
    }

    /// Entity footprint.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.entity.width, self.entity.height)
    }

    /// Spawn parameters for initialize and reset.
    #[must_use]
    pub const fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            count: self.population.count,
            bounds: self.bounds(),
            footprint: self.footprint(),
            cooldown_ms: self.entity.cooldown_ms,
        }
    }
}
