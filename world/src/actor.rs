//! One-cell movement with smooth transitions between cells.

use std::time::Duration;

use rogue_grid_core::{
    ActorId, ActorKind, ActorSnapshot, BlockingLayer, Cell, Direction, MoveError, MoveRejection,
    Occupant, OccupantId, Position, VariantId,
};

/// Squared remaining distance below which a transition counts as finished.
pub const ARRIVAL_EPSILON_SQ: f32 = 1e-6;

/// Movement phase of a [`GridActor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitState {
    /// Resting on its cell and ready to accept a move.
    Idle,
    /// Sliding from one cell to the next.
    Transiting {
        /// Cell the transition started from.
        from: Cell,
        /// Cell the transition ends on.
        to: Cell,
    },
}

/// Result of a well-formed move attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The path was clear and the actor is now in transit.
    Started {
        /// Cell the actor left.
        from: Cell,
        /// Cell the actor is moving onto.
        to: Cell,
    },
    /// The path was blocked; the actor did not move.
    Blocked(Occupant),
    /// The attempt was refused without any state change.
    Rejected(MoveRejection),
}

/// Entity that advances one grid cell at a time.
///
/// Starting a move claims the target cell immediately: [`GridActor::cell`]
/// reports the target while the continuous position is still catching up.
/// Moves requested during a transition are rejected rather than queued.
#[derive(Clone, Debug)]
pub struct GridActor {
    id: ActorId,
    occupant: OccupantId,
    kind: ActorKind,
    cell: Cell,
    position: Position,
    state: TransitState,
    inverse_move_time: f32,
    blocking: BlockingLayer,
}

impl GridActor {
    /// Creates an idle actor resting on `cell`.
    #[must_use]
    pub fn new(
        id: ActorId,
        occupant: OccupantId,
        kind: ActorKind,
        cell: Cell,
        move_time: Duration,
        blocking: BlockingLayer,
    ) -> Self {
        Self {
            id,
            occupant,
            kind,
            cell,
            position: Position::of_cell(cell),
            state: TransitState::Idle,
            inverse_move_time: inverse(move_time),
            blocking,
        }
    }

    /// Tries to step `dx` columns and `dy` rows.
    ///
    /// `probe` reports the occupant on a cell that is solid for the provided
    /// layer. Every cell between the current cell and the target is probed,
    /// excluding the current cell so the actor never collides with itself.
    pub fn attempt_move<F>(
        &mut self,
        dx: i32,
        dy: i32,
        mut probe: F,
    ) -> Result<MoveOutcome, MoveError>
    where
        F: FnMut(Cell, BlockingLayer) -> Option<Occupant>,
    {
        if Direction::from_delta(dx, dy).is_none() {
            return Err(MoveError::InvalidMoveRequest { dx, dy });
        }

        if self.in_transit() {
            return Ok(MoveOutcome::Rejected(MoveRejection::InTransit));
        }

        let from = self.cell;
        let to = from.offset(dx, dy);
        for cell in segment(from, to) {
            if let Some(blocker) = probe(cell, self.blocking) {
                return Ok(MoveOutcome::Blocked(blocker));
            }
        }

        self.cell = to;
        self.state = TransitState::Transiting { from, to };
        Ok(MoveOutcome::Started { from, to })
    }

    /// Advances the transition by `dt`, returning the cell reached on arrival.
    pub fn advance(&mut self, dt: Duration) -> Option<Cell> {
        let TransitState::Transiting { to, .. } = self.state else {
            return None;
        };

        let target = Position::of_cell(to);
        let max_step = if self.inverse_move_time.is_infinite() {
            f32::INFINITY
        } else {
            self.inverse_move_time * dt.as_secs_f32()
        };
        self.position = self.position.move_towards(target, max_step);

        if self.position.distance_squared(target) < ARRIVAL_EPSILON_SQ {
            self.position = target;
            self.state = TransitState::Idle;
            return Some(to);
        }
        None
    }

    /// Stops an in-flight transition by snapping onto the target cell.
    ///
    /// Returns the cell the actor now rests on, or `None` if it was idle.
    pub fn cancel_transit(&mut self) -> Option<Cell> {
        let TransitState::Transiting { to, .. } = self.state else {
            return None;
        };
        self.position = Position::of_cell(to);
        self.state = TransitState::Idle;
        Some(to)
    }

    /// Changes the time needed to cross one cell. Applies to the current transition too.
    pub fn set_move_time(&mut self, move_time: Duration) {
        self.inverse_move_time = inverse(move_time);
    }

    /// Replaces the set of categories that stop this actor.
    pub fn set_blocking(&mut self, blocking: BlockingLayer) {
        self.blocking = blocking;
    }

    /// Identifier of the actor.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Occupant identity other actors collide with.
    #[must_use]
    pub const fn occupant(&self) -> OccupantId {
        self.occupant
    }

    /// Kind of the actor.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Logical cell; during transit this is already the target.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Continuous position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current movement phase.
    #[must_use]
    pub const fn state(&self) -> TransitState {
        self.state
    }

    /// Reports whether the actor is still sliding toward its cell.
    #[must_use]
    pub const fn in_transit(&self) -> bool {
        matches!(self.state, TransitState::Transiting { .. })
    }

    /// Categories that stop this actor.
    #[must_use]
    pub const fn blocking(&self) -> BlockingLayer {
        self.blocking
    }

    /// Captures the actor as seen by collision queries.
    #[must_use]
    pub fn as_occupant(&self) -> Occupant {
        Occupant {
            id: self.occupant,
            category: self.kind.category(),
            cell: self.cell,
            variant: VariantId::new(0),
        }
    }

    /// Captures an immutable snapshot for queries.
    #[must_use]
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            occupant: self.occupant,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            in_transit: self.in_transit(),
        }
    }
}

fn inverse(move_time: Duration) -> f32 {
    let seconds = move_time.as_secs_f32();
    if seconds > 0.0 {
        1.0 / seconds
    } else {
        f32::INFINITY
    }
}

/// Cells crossed between `from` and `to`, excluding `from`.
fn segment(from: Cell, to: Cell) -> impl Iterator<Item = Cell> {
    let mut current = from;
    std::iter::from_fn(move || {
        if current == to {
            return None;
        }
        let dx = (to.x() - current.x()).signum();
        let dy = if dx == 0 {
            (to.y() - current.y()).signum()
        } else {
            0
        };
        current = current.offset(dx, dy);
        Some(current)
    })
}
