//! Session configuration and its text form.

use std::{fs, path::Path, time::Duration};

use rogue_grid_core::{BlockingLayer, ConfigurationIssue};
use rogue_grid_system_generation::Config as LevelConfig;
use rogue_grid_world::{DEFAULT_ENEMY_BLOCKING, DEFAULT_MOVE_TIME, DEFAULT_PLAYER_BLOCKING};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when a configuration does not name one.
pub const DEFAULT_SEED: u64 = 0x5eed_2d6f_6775_6521;

/// Level the first call to [`crate::Session::start`] generates.
pub const DEFAULT_STARTING_LEVEL: i32 = 3;

/// Problems found while loading or validating a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The move time is zero, negative, or not a finite number.
    #[error("move time must be finite and positive, got {0} seconds")]
    MoveTime(f32),
    /// The starting level is below one.
    #[error("starting level must be at least 1, got {0}")]
    StartingLevel(i32),
    /// The level section failed validation.
    #[error("invalid level configuration: {0}")]
    Level(#[from] ConfigurationIssue),
    /// The text is not valid TOML for this surface.
    #[error("failed to parse session configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration file could not be read.
    #[error("failed to read session configuration from {path}")]
    Io {
        /// File that was requested.
        path: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

/// Actor speed and collision rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Seconds an actor needs to cross one cell.
    pub move_time_secs: f32,
    /// Categories that stop the player.
    pub player_blocking: BlockingLayer,
    /// Categories that stop enemies.
    pub enemy_blocking: BlockingLayer,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_time_secs: DEFAULT_MOVE_TIME.as_secs_f32(),
            player_blocking: DEFAULT_PLAYER_BLOCKING,
            enemy_blocking: DEFAULT_ENEMY_BLOCKING,
        }
    }
}

impl MovementConfig {
    /// Move time as a duration, rejecting non-finite and non-positive values.
    pub fn move_time(&self) -> Result<Duration, ConfigError> {
        let seconds = self.move_time_secs;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ConfigError::MoveTime(seconds));
        }
        Duration::try_from_secs_f32(seconds).map_err(|_| ConfigError::MoveTime(seconds))
    }
}

/// Everything a [`crate::Session`] needs to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Board shape and placement tuning.
    pub level: LevelConfig,
    /// Actor speed and collision rules.
    pub movement: MovementConfig,
    /// Seed of the generator's random stream.
    pub seed: u64,
    /// Level generated by the first start.
    pub starting_level: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            movement: MovementConfig::default(),
            seed: DEFAULT_SEED,
            starting_level: DEFAULT_STARTING_LEVEL,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        let _ = self.movement.move_time()?;
        if self.starting_level < 1 {
            return Err(ConfigError::StartingLevel(self.starting_level));
        }
        Ok(())
    }
}
