#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Explicit session context that ties generation, world and movement together.
//!
//! A [`Session`] owns one [`GridGenerator`], one [`World`] and one
//! [`Movement`] system. It generates levels, loads them into the world, and
//! pumps every command's events through the movement system so callers get
//! both the raw events and the resulting interactions in a single [`Report`].

mod config;

use std::time::Duration;

use log::{debug, info, warn};
use rogue_grid_core::{ActorId, BoardGenerationError, Command, Direction, Event};
use rogue_grid_system_generation::GridGenerator;
use rogue_grid_system_movement::{Interaction, Movement};
use rogue_grid_world::{self as world, query, World};
use thiserror::Error;

pub use config::{
    ConfigError, MovementConfig, SessionConfig, DEFAULT_SEED, DEFAULT_STARTING_LEVEL,
};

/// Failures surfaced by a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Level generation failed; the previously loaded level is untouched.
    #[error(transparent)]
    Generation(#[from] BoardGenerationError),
}

/// Everything produced by a single session call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// World events in emission order.
    pub events: Vec<Event>,
    /// Reactions to blocked moves found among `events`.
    pub interactions: Vec<Interaction>,
}

/// Owns the generator, the world and the movement system for one run.
#[derive(Debug)]
pub struct Session {
    generator: GridGenerator,
    world: World,
    movement: Movement,
    starting_level: i32,
    level: Option<i32>,
}

impl Session {
    /// Validates `config` and prepares an empty world.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let move_time = config.movement.move_time()?;

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureActors {
                move_time,
                player_blocking: config.movement.player_blocking,
                enemy_blocking: config.movement.enemy_blocking,
            },
            &mut events,
        );

        Ok(Self {
            generator: GridGenerator::new(config.level, config.seed),
            world,
            movement: Movement::default(),
            starting_level: config.starting_level,
            level: None,
        })
    }

    /// Generates and loads the configured starting level.
    pub fn start(&mut self) -> Result<Report, SessionError> {
        self.start_level(self.starting_level)
    }

    /// Generates `level` and loads it, replacing the current board.
    ///
    /// On failure the world keeps whatever level it had before.
    pub fn start_level(&mut self, level: i32) -> Result<Report, SessionError> {
        let board = self.generator.generate_level(level).map_err(|error| {
            warn!("keeping level {:?} after failed generation", self.level);
            error
        })?;
        info!("starting level {level}");
        self.level = Some(level);
        Ok(self.submit(Command::LoadBoard {
            board: Box::new(board),
        }))
    }

    /// Advances to the level after the current one, or starts the run.
    pub fn next_level(&mut self) -> Result<Report, SessionError> {
        let level = match self.level {
            Some(level) => level.saturating_add(1),
            None => self.starting_level,
        };
        self.start_level(level)
    }

    /// Applies `command` and routes its events through the movement system.
    pub fn submit(&mut self, command: Command) -> Report {
        let mut report = Report::default();
        world::apply(&mut self.world, command, &mut report.events);
        self.movement
            .handle(&report.events, &mut report.interactions);
        if !report.interactions.is_empty() {
            debug!("{} interactions", report.interactions.len());
        }
        report
    }

    /// Asks `actor` to step one cell in `direction`.
    pub fn attempt_move(&mut self, actor: ActorId, direction: Direction) -> Report {
        let (dx, dy) = direction.delta();
        self.submit(Command::AttemptMove { actor, dx, dy })
    }

    /// Advances every transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Report {
        self.submit(Command::Tick { dt })
    }

    /// Level currently loaded.
    #[must_use]
    pub const fn level(&self) -> Option<i32> {
        self.level
    }

    /// Read access to the world for use with [`rogue_grid_world::query`].
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Player actor of the current level.
    #[must_use]
    pub fn player(&self) -> Option<ActorId> {
        query::player(&self.world)
    }

    /// Movement system, for swapping block-reaction handlers.
    pub fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }
}
