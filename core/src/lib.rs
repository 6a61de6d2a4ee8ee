#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rogue Grid crates.
//!
//! This crate defines the message surface that connects the orchestrator, the
//! authoritative world, and pure systems. Orchestrators submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. The board produced by level generation is a
//! plain [`GeneratedBoard`] value so it can be handed to the world in a single
//! command.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod board;
mod error;

pub use board::{BoardLayout, CellBounds, GeneratedBoard};
pub use error::{BoardGenerationError, ConfigurationIssue, MoveError};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active board and respawns every actor it implies.
    LoadBoard {
        /// Freshly generated board describing the level.
        board: Box<GeneratedBoard>,
    },
    /// Updates the movement parameters applied to current and future actors.
    ConfigureActors {
        /// Time an actor needs to cross a single cell.
        move_time: Duration,
        /// Categories that stop the player.
        player_blocking: BlockingLayer,
        /// Categories that stop enemies.
        enemy_blocking: BlockingLayer,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an actor move a single cell.
    AttemptMove {
        /// Actor attempting to move.
        actor: ActorId,
        /// Horizontal step, expected in `-1..=1`.
        dx: i32,
        /// Vertical step, expected in `-1..=1`.
        dy: i32,
    },
    /// Interrupts an in-flight transition, snapping the actor onto its target.
    CancelTransit {
        /// Actor whose transition should stop.
        actor: ActorId,
    },
    /// Removes an actor from the world.
    DespawnActor {
        /// Actor to remove.
        actor: ActorId,
    },
    /// Removes a static occupant or an actor's occupant, freeing its cell.
    RemoveOccupant {
        /// Occupant to remove.
        occupant: OccupantId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new board became active.
    BoardLoaded {
        /// Level number the board was generated for.
        level: u32,
        /// Playable column count.
        columns: u32,
        /// Playable row count.
        rows: u32,
    },
    /// Confirms that an actor entered the world.
    ActorSpawned {
        /// Identifier assigned to the actor.
        actor: ActorId,
        /// Kind of the spawned actor.
        kind: ActorKind,
        /// Cell the actor occupies after spawning.
        cell: Cell,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an actor began moving between two cells.
    MoveStarted {
        /// Actor in transit.
        actor: ActorId,
        /// Cell the actor left.
        from: Cell,
        /// Cell the actor is moving onto.
        to: Cell,
    },
    /// Confirms that an actor finished its transition.
    MoveCompleted {
        /// Actor that arrived.
        actor: ActorId,
        /// Cell the actor now rests on.
        cell: Cell,
    },
    /// Reports that a move was stopped by a blocking occupant.
    MoveBlocked {
        /// Actor whose move was blocked.
        actor: ActorId,
        /// Kind of the blocked actor, used to pick its block reaction.
        kind: ActorKind,
        /// Occupant that blocked the move.
        blocker: Occupant,
    },
    /// Reports that a move request was refused without any state change.
    MoveRejected {
        /// Actor named by the request.
        actor: ActorId,
        /// Specific reason the request was refused.
        reason: MoveRejection,
    },
    /// Confirms that an in-flight transition was cut short.
    TransitCancelled {
        /// Actor whose transition stopped.
        actor: ActorId,
        /// Cell the actor was snapped onto.
        cell: Cell,
    },
    /// Confirms that an actor left the world.
    ActorDespawned {
        /// Actor that was removed.
        actor: ActorId,
        /// Cell the actor occupied when removed.
        cell: Cell,
    },
    /// Confirms that an occupant was removed from its cell.
    OccupantRemoved {
        /// Occupant that was removed.
        occupant: Occupant,
    },
    /// Reports that an occupant removal named an unknown or permanent occupant.
    OccupantRemovalRejected {
        /// Occupant named by the request.
        occupant: OccupantId,
    },
}

/// Reasons a move request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// No actor with the provided identifier exists.
    UnknownActor,
    /// The actor is still completing its previous move.
    InTransit,
    /// The requested delta is not a single cardinal step.
    InvalidDelta,
    /// The target cell lies outside the board frame.
    OutOfBounds,
}

/// Classification of a cell's contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupantCategory {
    /// Walkable ground covering every interior cell.
    Floor,
    /// Impassable frame surrounding the board.
    OuterWall,
    /// Obstacle scattered inside the board.
    InnerWall,
    /// Pickup restoring the player's resources.
    Food,
    /// Hostile actor.
    Enemy,
    /// Cell that ends the level.
    Exit,
    /// The player-controlled actor.
    Player,
}

impl OccupantCategory {
    /// Every category in declaration order.
    pub const ALL: [OccupantCategory; 7] = [
        Self::Floor,
        Self::OuterWall,
        Self::InnerWall,
        Self::Food,
        Self::Enemy,
        Self::Exit,
        Self::Player,
    ];

    /// Dense index of the category, stable across releases.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Floor => 0,
            Self::OuterWall => 1,
            Self::InnerWall => 2,
            Self::Food => 3,
            Self::Enemy => 4,
            Self::Exit => 5,
            Self::Player => 6,
        }
    }

    /// Reports whether the category belongs to the base layer laid by the frame.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Floor | Self::OuterWall)
    }
}

/// Set of occupant categories treated as solid for movement and collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<OccupantCategory>", into = "Vec<OccupantCategory>")]
pub struct BlockingLayer {
    mask: u8,
}

impl BlockingLayer {
    /// Layer that blocks nothing.
    pub const EMPTY: Self = Self { mask: 0 };

    /// Builds a layer from the listed categories.
    #[must_use]
    pub const fn from_categories(categories: &[OccupantCategory]) -> Self {
        let mut layer = Self::EMPTY;
        let mut index = 0;
        while index < categories.len() {
            layer = layer.with(categories[index]);
            index += 1;
        }
        layer
    }

    /// Returns a copy of the layer that also blocks `category`.
    #[must_use]
    pub const fn with(self, category: OccupantCategory) -> Self {
        Self {
            mask: self.mask | (1 << category.index()),
        }
    }

    /// Returns a copy of the layer that no longer blocks `category`.
    #[must_use]
    pub const fn without(self, category: OccupantCategory) -> Self {
        Self {
            mask: self.mask & !(1 << category.index()),
        }
    }

    /// Reports whether `category` is solid in this layer.
    #[must_use]
    pub const fn contains(self, category: OccupantCategory) -> bool {
        self.mask & (1 << category.index()) != 0
    }

    /// Reports whether the layer blocks nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.mask == 0
    }

    /// Iterates over the solid categories in declaration order.
    pub fn iter(self) -> impl Iterator<Item = OccupantCategory> {
        OccupantCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl From<Vec<OccupantCategory>> for BlockingLayer {
    fn from(categories: Vec<OccupantCategory>) -> Self {
        Self::from_categories(&categories)
    }
}

impl From<BlockingLayer> for Vec<OccupantCategory> {
    fn from(layer: BlockingLayer) -> Self {
        layer.iter().collect()
    }
}

/// Inclusive range from which a placement count is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountRange {
    min: u32,
    max: u32,
}

impl CountRange {
    /// Creates a range covering `min..=max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Range that always yields `count`.
    #[must_use]
    pub const fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }

    /// Smallest count the range can yield.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest count the range can yield. The bound is inclusive.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether `min <= max`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Reports whether `count` lies within the inclusive range.
    #[must_use]
    pub const fn contains(&self, count: u32) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Number of interchangeable cosmetic variants available per category.
///
/// Variants carry no gameplay meaning; generation picks one uniformly for each
/// occupant so that presentation layers can vary the look of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantCatalog {
    /// Floor tile variants.
    pub floor: u16,
    /// Outer wall variants.
    pub outer_wall: u16,
    /// Inner wall variants.
    pub inner_wall: u16,
    /// Food variants.
    pub food: u16,
    /// Enemy variants.
    pub enemy: u16,
    /// Exit variants.
    pub exit: u16,
}

impl VariantCatalog {
    /// Number of variants registered for `category`.
    ///
    /// The player is not generated, so it always reports a single variant.
    #[must_use]
    pub const fn count(&self, category: OccupantCategory) -> u16 {
        match category {
            OccupantCategory::Floor => self.floor,
            OccupantCategory::OuterWall => self.outer_wall,
            OccupantCategory::InnerWall => self.inner_wall,
            OccupantCategory::Food => self.food,
            OccupantCategory::Enemy => self.enemy,
            OccupantCategory::Exit => self.exit,
            OccupantCategory::Player => 1,
        }
    }
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self {
            floor: 8,
            outer_wall: 3,
            inner_wall: 8,
            food: 2,
            enemy: 2,
            exit: 1,
        }
    }
}

/// Cosmetic variant chosen for an occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(u16);

impl VariantId {
    /// Creates a new variant identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the variant.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Unique identifier assigned to every occupant of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(u32);

impl OccupantId {
    /// Creates a new occupant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a movable actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of movable actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// The player-controlled actor.
    Player,
    /// A hostile actor spawned from an enemy placement.
    Enemy,
}

impl ActorKind {
    /// Occupant category other actors observe when colliding with this kind.
    #[must_use]
    pub const fn category(self) -> OccupantCategory {
        match self {
            Self::Player => OccupantCategory::Player,
            Self::Enemy => OccupantCategory::Enemy,
        }
    }
}

/// Location of a single grid cell.
///
/// Coordinates are signed because the outer frame sits at `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell reached by stepping `dx` columns and `dy` rows.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Cell reached by a single step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Cardinal movement directions. Rows grow toward the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting north.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Recovers the direction of a single cardinal step.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, -1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Continuous world position used while actors slide between cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in cell units.
    pub x: f32,
    /// Vertical coordinate in cell units.
    pub y: f32,
}

impl Position {
    /// Creates a position from raw coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of the provided cell.
    #[must_use]
    pub fn of_cell(cell: Cell) -> Self {
        Self::new(cell.x() as f32, cell.y() as f32)
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Moves toward `target` by at most `max_step`, never overshooting it.
    #[must_use]
    pub fn move_towards(self, target: Position, max_step: f32) -> Self {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance_squared = dx * dx + dy * dy;
        if distance_squared == 0.0 || (max_step >= 0.0 && distance_squared <= max_step * max_step)
        {
            return target;
        }

        let distance = distance_squared.sqrt();
        Self::new(
            self.x + dx / distance * max_step,
            self.y + dy / distance * max_step,
        )
    }
}

/// Anything sitting on a cell: base tiles, placements, and actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    /// Identifier unique within the board.
    pub id: OccupantId,
    /// Classification of the occupant.
    pub category: OccupantCategory,
    /// Cell the occupant sits on.
    pub cell: Cell,
    /// Cosmetic variant chosen at generation time.
    pub variant: VariantId,
}

/// Immutable representation of a single actor's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Occupant identity other actors collide with.
    pub occupant: OccupantId,
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Logical cell the actor occupies. During transit this is the target.
    pub cell: Cell,
    /// Continuous position of the actor.
    pub position: Position,
    /// Indicates whether the actor is still sliding toward its cell.
    pub in_transit: bool,
}

/// Read-only snapshot describing all actors within the world.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured actor snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the actor with the provided identifier, if present.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockingLayer, Cell, CountRange, Direction, OccupantCategory, Position};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn blocking_layer_tracks_membership() {
        let layer = BlockingLayer::from_categories(&[
            OccupantCategory::OuterWall,
            OccupantCategory::Enemy,
        ]);

        assert!(layer.contains(OccupantCategory::OuterWall));
        assert!(layer.contains(OccupantCategory::Enemy));
        assert!(!layer.contains(OccupantCategory::Floor));
        assert!(!layer.without(OccupantCategory::Enemy).contains(OccupantCategory::Enemy));
        assert!(BlockingLayer::EMPTY.is_empty());
        assert_eq!(
            layer.iter().collect::<Vec<_>>(),
            vec![OccupantCategory::OuterWall, OccupantCategory::Enemy]
        );
    }

    #[test]
    fn blocking_layer_serializes_as_category_list() {
        let layer = BlockingLayer::from_categories(&[
            OccupantCategory::InnerWall,
            OccupantCategory::Player,
        ]);
        assert_round_trip(&layer);
    }

    #[test]
    fn count_range_is_inclusive() {
        let range = CountRange::new(1, 5);
        assert!(range.contains(1));
        assert!(range.contains(5));
        assert!(!range.contains(6));
        assert!(range.is_valid());
        assert!(!CountRange::new(3, 2).is_valid());
        assert_round_trip(&range);
    }

    #[test]
    fn direction_round_trips_through_delta() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Cell::new(2, 2).step(Direction::North), Cell::new(2, 3));
    }

    #[test]
    fn move_towards_never_overshoots() {
        let start = Position::new(0.0, 0.0);
        let target = Position::new(1.0, 0.0);

        let halfway = start.move_towards(target, 0.4);
        assert!((halfway.x - 0.4).abs() < 1e-6);
        assert_eq!(halfway.y, 0.0);

        let arrived = halfway.move_towards(target, 5.0);
        assert_eq!(arrived, target);
    }
}
