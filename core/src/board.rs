//! Board geometry and the value produced by level generation.

use serde::{Deserialize, Serialize};

use crate::{Cell, Occupant, OccupantCategory, OccupantId, VariantId};

/// Inclusive, axis-aligned rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    min: Cell,
    max: Cell,
}

impl CellBounds {
    /// Creates bounds spanning `min..=max` on both axes.
    ///
    /// Bounds whose maximum lies below the minimum on either axis are empty.
    #[must_use]
    pub const fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// Lowest corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> Cell {
        self.min
    }

    /// Highest corner of the rectangle.
    #[must_use]
    pub const fn max(&self) -> Cell {
        self.max
    }

    /// Reports whether the rectangle holds no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max.x() < self.min.x() || self.max.y() < self.min.y()
    }

    /// Number of columns spanned.
    #[must_use]
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.min.x().abs_diff(self.max.x()) + 1
        }
    }

    /// Number of rows spanned.
    #[must_use]
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.min.y().abs_diff(self.max.y()) + 1
        }
    }

    /// Number of cells inside the rectangle.
    #[must_use]
    pub fn len(&self) -> usize {
        let area = u64::from(self.width()) * u64::from(self.height());
        usize::try_from(area).unwrap_or(usize::MAX)
    }

    /// Reports whether `cell` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() >= self.min.x()
            && cell.x() <= self.max.x()
            && cell.y() >= self.min.y()
            && cell.y() <= self.max.y()
    }

    /// Reports whether `cell` lies on the outermost ring of the rectangle.
    #[must_use]
    pub const fn is_border(&self, cell: Cell) -> bool {
        self.contains(cell)
            && (cell.x() == self.min.x()
                || cell.x() == self.max.x()
                || cell.y() == self.min.y()
                || cell.y() == self.max.y())
    }

    /// Row-major dense index of `cell`, if it lies inside the rectangle.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let column = usize::try_from(self.min.x().abs_diff(cell.x())).ok()?;
        let row = usize::try_from(self.min.y().abs_diff(cell.y())).ok()?;
        let width = usize::try_from(self.width()).ok()?;
        Some(row * width + column)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.min.y()..=self.max.y())
            .flat_map(move |y| (self.min.x()..=self.max.x()).map(move |x| Cell::new(x, y)))
    }
}

/// Geometry used to lay out the frame, the free pool, and the exit.
///
/// `Symmetric` keeps the frame snug around a `columns x rows` floor and leaves
/// the outermost floor ring free of placements on every side. `Legacy`
/// reproduces the historic bounds: a floor of `(columns + 1) x (rows + 1)`
/// cells whose pool skips row and column zero plus the last row and column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardLayout {
    /// Frame on `{-1, columns}` x `{-1, rows}`; exit at `(columns - 1, rows - 1)`.
    #[default]
    Symmetric,
    /// Frame on `{-1, columns + 1}` x `{-1, rows + 1}`; exit at `(columns, rows)`.
    Legacy,
}

impl BoardLayout {
    /// Rectangle covered by base tiles; its border holds the outer walls.
    #[must_use]
    pub fn frame(self, columns: u32, rows: u32) -> CellBounds {
        let (columns, rows) = (signed(columns), signed(rows));
        let max = match self {
            Self::Symmetric => Cell::new(columns, rows),
            Self::Legacy => Cell::new(columns.saturating_add(1), rows.saturating_add(1)),
        };
        CellBounds::new(Cell::new(-1, -1), max)
    }

    /// Rectangle of interior cells eligible for random placement.
    #[must_use]
    pub fn pool(self, columns: u32, rows: u32) -> CellBounds {
        let (columns, rows) = (signed(columns), signed(rows));
        let max = match self {
            Self::Symmetric => Cell::new(columns.saturating_sub(2), rows.saturating_sub(2)),
            Self::Legacy => Cell::new(columns.saturating_sub(1), rows.saturating_sub(1)),
        };
        CellBounds::new(Cell::new(1, 1), max)
    }

    /// Fixed cell that receives the exit.
    #[must_use]
    pub fn exit(self, columns: u32, rows: u32) -> Cell {
        let (columns, rows) = (signed(columns), signed(rows));
        match self {
            Self::Symmetric => Cell::new(columns.saturating_sub(1), rows.saturating_sub(1)),
            Self::Legacy => Cell::new(columns, rows),
        }
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn player_start(self) -> Cell {
        Cell::new(0, 0)
    }
}

fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Result of a single level generation pass.
///
/// Every cell of the frame carries exactly one base occupant (floor or outer
/// wall). On top of that, each interior cell carries at most one placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedBoard {
    level: u32,
    columns: u32,
    rows: u32,
    layout: BoardLayout,
    frame: CellBounds,
    base: Vec<Occupant>,
    placements: Vec<Occupant>,
    placement_index: Vec<Option<usize>>,
    next_occupant: u32,
}

impl GeneratedBoard {
    /// Lays the frame for a board, asking `variant_for` to pick each tile's look.
    #[must_use]
    pub fn with_frame<F>(
        level: u32,
        columns: u32,
        rows: u32,
        layout: BoardLayout,
        mut variant_for: F,
    ) -> Self
    where
        F: FnMut(OccupantCategory) -> VariantId,
    {
        let frame = layout.frame(columns, rows);
        let mut base = Vec::with_capacity(frame.len());
        let mut next_occupant = 0;
        for cell in frame.cells() {
            let category = if frame.is_border(cell) {
                OccupantCategory::OuterWall
            } else {
                OccupantCategory::Floor
            };
            base.push(Occupant {
                id: OccupantId::new(next_occupant),
                category,
                cell,
                variant: variant_for(category),
            });
            next_occupant += 1;
        }

        Self {
            level,
            columns,
            rows,
            layout,
            frame,
            placement_index: vec![None; base.len()],
            base,
            placements: Vec::new(),
            next_occupant,
        }
    }

    /// Records a placement on top of the floor.
    ///
    /// Returns `None` without changing the board when the cell is outside the
    /// floor, already holds a placement, or the category belongs to the base
    /// layer or to the player.
    pub fn place(
        &mut self,
        category: OccupantCategory,
        cell: Cell,
        variant: VariantId,
    ) -> Option<OccupantId> {
        if category.is_base() || category == OccupantCategory::Player {
            return None;
        }
        if self.frame.is_border(cell) {
            return None;
        }
        let index = self.frame.index(cell)?;
        if self.placement_index[index].is_some() {
            return None;
        }

        let id = OccupantId::new(self.next_occupant);
        self.next_occupant += 1;
        self.placement_index[index] = Some(self.placements.len());
        self.placements.push(Occupant {
            id,
            category,
            cell,
            variant,
        });
        Some(id)
    }

    /// Level number the board was generated for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Configured column count.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Configured row count.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Layout used to derive the frame and the exit.
    #[must_use]
    pub const fn layout(&self) -> BoardLayout {
        self.layout
    }

    /// Rectangle covered by base tiles.
    #[must_use]
    pub const fn frame(&self) -> CellBounds {
        self.frame
    }

    /// Base tiles in row-major order.
    #[must_use]
    pub fn base(&self) -> &[Occupant] {
        &self.base
    }

    /// Base tile under `cell`.
    #[must_use]
    pub fn base_at(&self, cell: Cell) -> Option<&Occupant> {
        self.frame.index(cell).and_then(|index| self.base.get(index))
    }

    /// Placement sitting on `cell`.
    #[must_use]
    pub fn occupant_at(&self, cell: Cell) -> Option<&Occupant> {
        let index = self.frame.index(cell)?;
        self.placement_index[index].and_then(|slot| self.placements.get(slot))
    }

    /// Topmost category on `cell`: the placement if any, else the base tile.
    #[must_use]
    pub fn category_at(&self, cell: Cell) -> Option<OccupantCategory> {
        self.occupant_at(cell)
            .or_else(|| self.base_at(cell))
            .map(|occupant| occupant.category)
    }

    /// Placements in the order they were made.
    #[must_use]
    pub fn placements(&self) -> &[Occupant] {
        &self.placements
    }

    /// Placements of a single category.
    pub fn placements_of(
        &self,
        category: OccupantCategory,
    ) -> impl Iterator<Item = &Occupant> + '_ {
        self.placements
            .iter()
            .filter(move |occupant| occupant.category == category)
    }

    /// The exit placement, once placed.
    #[must_use]
    pub fn exit(&self) -> Option<&Occupant> {
        self.placements_of(OccupantCategory::Exit).next()
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn player_start(&self) -> Cell {
        self.layout.player_start()
    }

    /// First identifier not used by any occupant of this board.
    #[must_use]
    pub const fn next_occupant_id(&self) -> OccupantId {
        OccupantId::new(self.next_occupant)
    }
}
