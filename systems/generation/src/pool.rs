//! Shrinking set of cells still eligible for random placement.

use rand::Rng;
use rogue_grid_core::{Cell, CellBounds};

/// Interior cells that have not received an occupant yet.
///
/// Cells only ever leave the pool; a popped cell is never handed out twice
/// during the same generation pass.
#[derive(Clone, Debug)]
pub struct FreeCellPool {
    cells: Vec<Cell>,
}

impl FreeCellPool {
    /// Fills the pool with every cell of `bounds` in row-major order.
    #[must_use]
    pub fn from_bounds(bounds: CellBounds) -> Self {
        Self {
            cells: bounds.cells().collect(),
        }
    }

    /// Number of cells left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether every cell has been handed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether `cell` is still available.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Removes and returns a uniformly chosen cell.
    pub fn pop_random<R>(&mut self, rng: &mut R) -> Option<Cell>
    where
        R: Rng + ?Sized,
    {
        if self.cells.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(index))
    }
}
