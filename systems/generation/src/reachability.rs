//! Breadth-first connectivity checks over a generated board.

use std::collections::VecDeque;

use rogue_grid_core::{BlockingLayer, Cell, CellBounds, Direction, GeneratedBoard};

/// Reports whether the exit can be reached from the player start when every
/// category in `solid` is impassable.
///
/// A board without an exit is never reachable.
#[must_use]
pub fn exit_reachable(board: &GeneratedBoard, solid: BlockingLayer) -> bool {
    let Some(exit) = board.exit() else {
        return false;
    };
    path_exists(board.frame(), board.player_start(), exit.cell, |cell| {
        board
            .category_at(cell)
            .map_or(true, |category| solid.contains(category))
    })
}

/// Flood fills `bounds` from `from` and reports whether `to` is reached.
///
/// `is_blocked` is never consulted for `from` or `to`, so a target that is
/// itself solid (an exit the player bumps into) still counts as reached.
pub fn path_exists<F>(bounds: CellBounds, from: Cell, to: Cell, mut is_blocked: F) -> bool
where
    F: FnMut(Cell) -> bool,
{
    let (Some(start), Some(_)) = (bounds.index(from), bounds.index(to)) else {
        return false;
    };
    if from == to {
        return true;
    }

    let mut visited = vec![false; bounds.len()];
    visited[start] = true;
    let mut queue = VecDeque::from([from]);

    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = cell.step(direction);
            let Some(index) = bounds.index(next) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            visited[index] = true;

            if next == to {
                return true;
            }
            if !is_blocked(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> CellBounds {
        CellBounds::new(Cell::new(0, 0), Cell::new(4, 4))
    }

    #[test]
    fn open_field_is_connected() {
        assert!(path_exists(bounds(), Cell::new(0, 0), Cell::new(4, 4), |_| false));
    }

    #[test]
    fn wall_column_cuts_the_field() {
        let wall = |cell: Cell| cell.x() == 2;
        assert!(!path_exists(bounds(), Cell::new(0, 0), Cell::new(4, 4), wall));
    }

    #[test]
    fn gap_in_the_wall_reconnects() {
        let wall = |cell: Cell| cell.x() == 2 && cell.y() != 3;
        assert!(path_exists(bounds(), Cell::new(0, 0), Cell::new(4, 4), wall));
    }

    #[test]
    fn solid_target_still_counts() {
        let target = Cell::new(1, 0);
        assert!(path_exists(bounds(), Cell::new(0, 0), target, |cell| cell == target));
    }

    #[test]
    fn cells_outside_bounds_are_unreachable() {
        assert!(!path_exists(bounds(), Cell::new(0, 0), Cell::new(5, 0), |_| false));
    }
}
