#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rogue Grid.
//!
//! The world owns the active board, the collision layers derived from it, and
//! every [`GridActor`]. All mutation flows through [`apply`]; read access goes
//! through the [`query`] module.

mod actor;
mod occupancy;

use std::time::Duration;

use log::{debug, warn};
use rogue_grid_core::{
    ActorId, ActorKind, BlockingLayer, Cell, Command, Direction, Event, GeneratedBoard,
    MoveError, MoveRejection, OccupantCategory, OccupantId,
};

pub use actor::{GridActor, MoveOutcome, TransitState, ARRIVAL_EPSILON_SQ};
use occupancy::OccupancyLayer;

/// Time an actor needs to cross one cell unless reconfigured.
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_millis(100);

/// Categories that stop the player unless reconfigured.
pub const DEFAULT_PLAYER_BLOCKING: BlockingLayer = BlockingLayer::from_categories(&[
    OccupantCategory::OuterWall,
    OccupantCategory::InnerWall,
    OccupantCategory::Enemy,
    OccupantCategory::Exit,
]);

/// Categories that stop enemies unless reconfigured.
pub const DEFAULT_ENEMY_BLOCKING: BlockingLayer = BlockingLayer::from_categories(&[
    OccupantCategory::OuterWall,
    OccupantCategory::InnerWall,
    OccupantCategory::Enemy,
    OccupantCategory::Player,
]);

#[derive(Clone, Copy, Debug)]
struct ActorSettings {
    move_time: Duration,
    player_blocking: BlockingLayer,
    enemy_blocking: BlockingLayer,
}

impl ActorSettings {
    const fn blocking_for(&self, kind: ActorKind) -> BlockingLayer {
        match kind {
            ActorKind::Player => self.player_blocking,
            ActorKind::Enemy => self.enemy_blocking,
        }
    }
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            move_time: DEFAULT_MOVE_TIME,
            player_blocking: DEFAULT_PLAYER_BLOCKING,
            enemy_blocking: DEFAULT_ENEMY_BLOCKING,
        }
    }
}

/// Represents the authoritative Rogue Grid world state.
#[derive(Debug)]
pub struct World {
    board: Option<GeneratedBoard>,
    occupancy: OccupancyLayer,
    actors: Vec<GridActor>,
    settings: ActorSettings,
    next_actor: u32,
    next_occupant: u32,
    tick_index: u64,
}

impl World {
    /// Creates an empty world. Nothing moves until a board is loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: None,
            occupancy: OccupancyLayer::empty(),
            actors: Vec::new(),
            settings: ActorSettings::default(),
            next_actor: 0,
            next_occupant: 0,
            tick_index: 0,
        }
    }

    fn load_board(&mut self, board: GeneratedBoard, out_events: &mut Vec<Event>) {
        debug!(
            "loading level {} board ({}x{}, {} placements)",
            board.level(),
            board.columns(),
            board.rows(),
            board.placements().len()
        );

        self.occupancy = OccupancyLayer::from_board(&board);
        self.actors.clear();
        self.next_actor = 0;
        self.next_occupant = board.next_occupant_id().get();
        out_events.push(Event::BoardLoaded {
            level: board.level(),
            columns: board.columns(),
            rows: board.rows(),
        });

        let player_occupant = OccupantId::new(self.next_occupant);
        self.next_occupant += 1;
        self.spawn_actor(
            ActorKind::Player,
            player_occupant,
            board.player_start(),
            out_events,
        );

        let enemies: Vec<_> = board
            .placements_of(OccupantCategory::Enemy)
            .copied()
            .collect();
        for enemy in enemies {
            self.spawn_actor(ActorKind::Enemy, enemy.id, enemy.cell, out_events);
        }

        self.board = Some(board);
    }

    fn spawn_actor(
        &mut self,
        kind: ActorKind,
        occupant: OccupantId,
        cell: Cell,
        out_events: &mut Vec<Event>,
    ) {
        let id = ActorId::new(self.next_actor);
        let actor = GridActor::new(
            id,
            occupant,
            kind,
            cell,
            self.settings.move_time,
            self.settings.blocking_for(kind),
        );
        if !self.occupancy.occupy_actor(actor.as_occupant()) {
            warn!("skipping {kind:?} spawn on unavailable cell {cell:?}");
            return;
        }
        self.next_actor += 1;
        self.actors.push(actor);
        out_events.push(Event::ActorSpawned {
            actor: id,
            kind,
            cell,
        });
    }

    fn actor_index(&self, actor: ActorId) -> Option<usize> {
        self.actors.iter().position(|candidate| candidate.id() == actor)
    }

    fn despawn(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let mut actor = self.actors.remove(index);
        let _ = actor.cancel_transit();
        let _ = self.occupancy.vacate_actor(actor.cell(), actor.occupant());
        out_events.push(Event::ActorDespawned {
            actor: actor.id(),
            cell: actor.cell(),
        });
    }

    fn attempt_move(&mut self, actor: ActorId, dx: i32, dy: i32, out_events: &mut Vec<Event>) {
        let Some(index) = self.actor_index(actor) else {
            out_events.push(Event::MoveRejected {
                actor,
                reason: MoveRejection::UnknownActor,
            });
            return;
        };

        let (kind, occupant) = (self.actors[index].kind(), self.actors[index].occupant());
        let target = self.actors[index].cell().offset(dx, dy);
        if Direction::from_delta(dx, dy).is_some()
            && !self.actors[index].in_transit()
            && !self.occupancy.covers(target)
        {
            out_events.push(Event::MoveRejected {
                actor,
                reason: MoveRejection::OutOfBounds,
            });
            return;
        }

        // Actor slots hold one actor each, so another actor always blocks.
        let outcome = {
            let occupancy = &self.occupancy;
            self.actors[index].attempt_move(dx, dy, |cell, layer| {
                occupancy
                    .actor_at(cell)
                    .or_else(|| occupancy.blocker_at(cell, layer))
            })
        };

        match outcome {
            Err(MoveError::InvalidMoveRequest { .. }) => {
                out_events.push(Event::MoveRejected {
                    actor,
                    reason: MoveRejection::InvalidDelta,
                });
            }
            Ok(MoveOutcome::Rejected(reason)) => {
                out_events.push(Event::MoveRejected { actor, reason });
            }
            Ok(MoveOutcome::Blocked(blocker)) => {
                debug!(
                    "actor {} blocked by {:?} at {:?}",
                    actor.get(),
                    blocker.category,
                    blocker.cell
                );
                out_events.push(Event::MoveBlocked {
                    actor,
                    kind,
                    blocker,
                });
            }
            Ok(MoveOutcome::Started { from, to }) => {
                let relocated = self.occupancy.relocate_actor(occupant, from, to);
                debug_assert!(relocated, "actor {} lost its occupancy slot", actor.get());
                out_events.push(Event::MoveStarted { actor, from, to });
            }
        }
    }

    fn remove_occupant(&mut self, occupant: OccupantId, out_events: &mut Vec<Event>) {
        if let Some(index) = self
            .actors
            .iter()
            .position(|actor| actor.occupant() == occupant)
        {
            let snapshot = self.actors[index].as_occupant();
            self.despawn(index, out_events);
            out_events.push(Event::OccupantRemoved { occupant: snapshot });
            return;
        }

        match self.occupancy.remove_static(occupant) {
            Some(removed) => out_events.push(Event::OccupantRemoved { occupant: removed }),
            None => out_events.push(Event::OccupantRemovalRejected { occupant }),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadBoard { board } => world.load_board(*board, out_events),
        Command::ConfigureActors {
            move_time,
            player_blocking,
            enemy_blocking,
        } => {
            world.settings = ActorSettings {
                move_time,
                player_blocking,
                enemy_blocking,
            };
            for actor in world.actors.iter_mut() {
                actor.set_move_time(move_time);
                actor.set_blocking(world.settings.blocking_for(actor.kind()));
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            for actor in world.actors.iter_mut() {
                if let Some(cell) = actor.advance(dt) {
                    out_events.push(Event::MoveCompleted {
                        actor: actor.id(),
                        cell,
                    });
                }
            }
        }
        Command::AttemptMove { actor, dx, dy } => world.attempt_move(actor, dx, dy, out_events),
        Command::CancelTransit { actor } => match world.actor_index(actor) {
            Some(index) => {
                if let Some(cell) = world.actors[index].cancel_transit() {
                    out_events.push(Event::TransitCancelled { actor, cell });
                }
            }
            None => out_events.push(Event::MoveRejected {
                actor,
                reason: MoveRejection::UnknownActor,
            }),
        },
        Command::DespawnActor { actor } => match world.actor_index(actor) {
            Some(index) => world.despawn(index, out_events),
            None => out_events.push(Event::MoveRejected {
                actor,
                reason: MoveRejection::UnknownActor,
            }),
        },
        Command::RemoveOccupant { occupant } => world.remove_occupant(occupant, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use rogue_grid_core::{
        ActorId, ActorKind, ActorSnapshot, ActorView, BlockingLayer, Cell, GeneratedBoard,
        Occupant, OccupantCategory,
    };

    use super::World;

    /// Board loaded by the most recent `LoadBoard` command.
    #[must_use]
    pub fn board(world: &World) -> Option<&GeneratedBoard> {
        world.board.as_ref()
    }

    /// Snapshot of a single actor.
    #[must_use]
    pub fn actor(world: &World, id: ActorId) -> Option<ActorSnapshot> {
        world
            .actors
            .iter()
            .find(|actor| actor.id() == id)
            .map(|actor| actor.snapshot())
    }

    /// Captures a read-only view of every actor.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        ActorView::from_snapshots(world.actors.iter().map(|actor| actor.snapshot()).collect())
    }

    /// Identifier of the player actor, if one is spawned.
    #[must_use]
    pub fn player(world: &World) -> Option<ActorId> {
        world
            .actors
            .iter()
            .find(|actor| actor.kind() == ActorKind::Player)
            .map(|actor| actor.id())
    }

    /// Occupant on `cell` that is solid for `layer`, checking actors first.
    #[must_use]
    pub fn blocker_at(world: &World, cell: Cell, layer: BlockingLayer) -> Option<Occupant> {
        world.occupancy.blocker_at(cell, layer)
    }

    /// Topmost occupant on `cell`.
    #[must_use]
    pub fn occupant_at(world: &World, cell: Cell) -> Option<Occupant> {
        world.occupancy.top_at(cell)
    }

    /// Category of the topmost occupant on `cell`.
    #[must_use]
    pub fn category_at(world: &World, cell: Cell) -> Option<OccupantCategory> {
        occupant_at(world, cell).map(|occupant| occupant.category)
    }

    /// Static placements still present, in row-major order.
    #[must_use]
    pub fn static_occupants(world: &World) -> Vec<Occupant> {
        world.occupancy.statics().collect()
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rogue_grid_core::{BoardLayout, Position, VariantId};

    fn small_board() -> GeneratedBoard {
        let mut board =
            GeneratedBoard::with_frame(2, 5, 5, BoardLayout::Symmetric, |_| VariantId::new(0));
        let _ = board.place(OccupantCategory::InnerWall, Cell::new(1, 1), VariantId::new(0));
        let _ = board.place(OccupantCategory::Enemy, Cell::new(3, 3), VariantId::new(0));
        let _ = board.place(OccupantCategory::Exit, Cell::new(4, 4), VariantId::new(0));
        board
    }

    fn loaded_world() -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadBoard {
                board: Box::new(small_board()),
            },
            &mut events,
        );
        (world, events)
    }

    #[test]
    fn loading_spawns_player_then_enemies() {
        let (world, events) = loaded_world();

        assert_eq!(
            events,
            vec![
                Event::BoardLoaded {
                    level: 2,
                    columns: 5,
                    rows: 5
                },
                Event::ActorSpawned {
                    actor: ActorId::new(0),
                    kind: ActorKind::Player,
                    cell: Cell::new(0, 0)
                },
                Event::ActorSpawned {
                    actor: ActorId::new(1),
                    kind: ActorKind::Enemy,
                    cell: Cell::new(3, 3)
                },
            ]
        );
        assert_eq!(query::player(&world), Some(ActorId::new(0)));
        assert_eq!(
            query::category_at(&world, Cell::new(3, 3)),
            Some(OccupantCategory::Enemy)
        );
    }

    #[test]
    fn enemy_actor_keeps_placement_identity() {
        let (world, _) = loaded_world();
        let board = query::board(&world).expect("board loaded");
        let placement = board
            .placements_of(OccupantCategory::Enemy)
            .next()
            .expect("enemy placement");
        let enemy = query::actor(&world, ActorId::new(1)).expect("enemy spawned");

        assert_eq!(enemy.occupant, placement.id);
        assert_ne!(
            query::actor(&world, ActorId::new(0)).map(|p| p.occupant),
            Some(placement.id)
        );
    }

    #[test]
    fn unknown_actor_moves_are_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AttemptMove {
                actor: ActorId::new(5),
                dx: 1,
                dy: 0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                actor: ActorId::new(5),
                reason: MoveRejection::UnknownActor
            }]
        );
    }

    #[test]
    fn configure_actors_updates_existing_actors() {
        let (mut world, _) = loaded_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureActors {
                move_time: Duration::from_secs(1),
                player_blocking: BlockingLayer::EMPTY,
                enemy_blocking: DEFAULT_ENEMY_BLOCKING,
            },
            &mut events,
        );
        assert!(events.is_empty());

        let player = query::player(&world).expect("player");
        apply(
            &mut world,
            Command::AttemptMove {
                actor: player,
                dx: -1,
                dy: 0,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::MoveStarted {
                actor: player,
                from: Cell::new(0, 0),
                to: Cell::new(-1, 0)
            }]
        );

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        let snapshot = query::actor(&world, player).expect("player");
        assert!(snapshot.in_transit);
        assert!((snapshot.position.x + 0.5).abs() < 1e-5);
        assert_eq!(snapshot.position.y, 0.0);
        assert_ne!(snapshot.position, Position::of_cell(Cell::new(-1, 0)));
    }

    #[test]
    fn removing_base_tiles_is_rejected() {
        let (mut world, _) = loaded_world();
        let floor = query::board(&world)
            .and_then(|board| board.base_at(Cell::new(2, 2)))
            .map(|tile| tile.id)
            .expect("floor tile");

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RemoveOccupant { occupant: floor },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::OccupantRemovalRejected { occupant: floor }]
        );
        assert_eq!(query::tick_index(&world), 0);
    }
}
