//! # Simulation Error Types

use std::path::PathBuf;

use rochambeau_core::EcsError;
use thiserror::Error;

/// Errors loading or validating a [`crate::SimConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parse but cannot describe a runnable world.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by the simulation.
///
/// Store errors are contract violations inside an engine and end the tick.
#[derive(Error, Debug)]
pub enum SimError {
    /// The entity store rejected an operation.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
