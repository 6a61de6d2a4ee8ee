//! Dense per-cell layers used for collision queries.

use rogue_grid_core::{
    BlockingLayer, Cell, CellBounds, GeneratedBoard, Occupant, OccupantCategory, OccupantId,
};

/// Three stacked layers over the board frame: base tiles, static placements,
/// and actors. Lookups check the actor layer first, then statics, then base.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyLayer {
    frame: CellBounds,
    base: Vec<Occupant>,
    statics: Vec<Option<Occupant>>,
    actors: Vec<Option<Occupant>>,
}

impl OccupancyLayer {
    pub(crate) fn empty() -> Self {
        Self {
            frame: CellBounds::new(Cell::new(0, 0), Cell::new(-1, -1)),
            base: Vec::new(),
            statics: Vec::new(),
            actors: Vec::new(),
        }
    }

    /// Builds the layers for `board`. Enemy placements are left out because
    /// they enter the actor layer once spawned.
    pub(crate) fn from_board(board: &GeneratedBoard) -> Self {
        let frame = board.frame();
        let mut statics = vec![None; frame.len()];
        for placement in board.placements() {
            if placement.category == OccupantCategory::Enemy {
                continue;
            }
            if let Some(index) = frame.index(placement.cell) {
                statics[index] = Some(*placement);
            }
        }

        Self {
            frame,
            base: board.base().to_vec(),
            actors: vec![None; statics.len()],
            statics,
        }
    }

    /// Topmost occupant on `cell` whose category is solid in `layer`.
    pub(crate) fn blocker_at(&self, cell: Cell, layer: BlockingLayer) -> Option<Occupant> {
        let index = self.frame.index(cell)?;
        [
            self.actors[index],
            self.statics[index],
            self.base.get(index).copied(),
        ]
        .into_iter()
        .flatten()
        .find(|occupant| layer.contains(occupant.category))
    }

    /// Topmost occupant on `cell`, solid or not.
    pub(crate) fn top_at(&self, cell: Cell) -> Option<Occupant> {
        let index = self.frame.index(cell)?;
        self.actors[index]
            .or(self.statics[index])
            .or_else(|| self.base.get(index).copied())
    }

    /// Reports whether `cell` lies inside the frame the layers cover.
    pub(crate) fn covers(&self, cell: Cell) -> bool {
        self.frame.contains(cell)
    }

    /// Actor resting on or reserving `cell`.
    pub(crate) fn actor_at(&self, cell: Cell) -> Option<Occupant> {
        let index = self.frame.index(cell)?;
        self.actors[index]
    }

    /// Puts `occupant` into the actor layer. Fails when the cell lies outside
    /// the frame or already holds an actor.
    pub(crate) fn occupy_actor(&mut self, occupant: Occupant) -> bool {
        let Some(index) = self.frame.index(occupant.cell) else {
            return false;
        };
        let slot = &mut self.actors[index];
        if slot.is_some() {
            return false;
        }
        *slot = Some(occupant);
        true
    }

    /// Moves the actor `id` from `from` onto `to`. Nothing changes unless
    /// `from` holds that actor and `to` is a free cell inside the frame.
    pub(crate) fn relocate_actor(&mut self, id: OccupantId, from: Cell, to: Cell) -> bool {
        if !self.covers(to) || self.actor_at(to).is_some() {
            return false;
        }
        match self.vacate_actor(from, id) {
            Some(mut occupant) => {
                occupant.cell = to;
                self.occupy_actor(occupant)
            }
            None => false,
        }
    }

    /// Clears `cell` if it holds the actor `id`.
    pub(crate) fn vacate_actor(&mut self, cell: Cell, id: OccupantId) -> Option<Occupant> {
        let index = self.frame.index(cell)?;
        let slot = &mut self.actors[index];
        if slot.map_or(false, |occupant| occupant.id == id) {
            slot.take()
        } else {
            None
        }
    }

    /// Removes the static placement with identifier `id`, if present.
    pub(crate) fn remove_static(&mut self, id: OccupantId) -> Option<Occupant> {
        self.statics
            .iter_mut()
            .find(|slot| slot.map_or(false, |occupant| occupant.id == id))
            .and_then(Option::take)
    }

    pub(crate) fn statics(&self) -> impl Iterator<Item = Occupant> + '_ {
        self.statics.iter().flatten().copied()
    }
}
