#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded level generation for Rogue Grid boards.
//!
//! A [`GridGenerator`] lays the outer-wall frame, scatters inner walls, food
//! and enemies onto distinct free cells, then drops the exit on its fixed
//! cell. Every draw comes from a `ChaCha8Rng` seeded once, so the same seed
//! and the same sequence of levels always produce the same boards.

mod pool;
mod reachability;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rogue_grid_core::{
    BlockingLayer, BoardGenerationError, BoardLayout, Cell, ConfigurationIssue, CountRange,
    GeneratedBoard, OccupantCategory, OccupantId, VariantCatalog, VariantId,
};
use serde::{Deserialize, Serialize};

pub use pool::FreeCellPool;
pub use reachability::{exit_reachable, path_exists};

/// Largest column or row count accepted by [`Config::validate`].
pub const MAX_DIMENSION: u32 = 1024;

/// Categories treated as impassable by the reachability post-check.
pub const DEFAULT_SOLID: BlockingLayer = BlockingLayer::from_categories(&[
    OccupantCategory::OuterWall,
    OccupantCategory::InnerWall,
]);

/// Board shape and placement tuning for a generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playable columns.
    pub columns: u32,
    /// Playable rows.
    pub rows: u32,
    /// Inclusive range of inner walls per level.
    pub wall_count: CountRange,
    /// Inclusive range of food items per level.
    pub food_count: CountRange,
    /// Number of cosmetic variants per category.
    pub variants: VariantCatalog,
    /// Geometry of the frame, the pool and the exit.
    pub layout: BoardLayout,
    /// Rejects boards whose exit cannot be reached from the player start.
    pub require_reachable_exit: bool,
    /// Categories the reachability check refuses to walk through.
    pub solid: BlockingLayer,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            wall_count: CountRange::new(5, 9),
            food_count: CountRange::new(1, 5),
            variants: VariantCatalog::default(),
            layout: BoardLayout::default(),
            require_reachable_exit: false,
            solid: DEFAULT_SOLID,
        }
    }
}

impl Config {
    /// Checks dimensions, count ranges and variant counts.
    pub fn validate(&self) -> Result<(), ConfigurationIssue> {
        let dimension = 2..=MAX_DIMENSION;
        if !dimension.contains(&self.columns) || !dimension.contains(&self.rows) {
            return Err(ConfigurationIssue::Dimensions {
                columns: self.columns,
                rows: self.rows,
                max: MAX_DIMENSION,
            });
        }

        for (category, range) in [
            (OccupantCategory::InnerWall, self.wall_count),
            (OccupantCategory::Food, self.food_count),
        ] {
            if !range.is_valid() {
                return Err(ConfigurationIssue::CountRange {
                    category,
                    min: range.min(),
                    max: range.max(),
                });
            }
        }

        if let Some(category) = OccupantCategory::ALL
            .into_iter()
            .find(|category| self.variants.count(*category) == 0)
        {
            return Err(ConfigurationIssue::NoVariants { category });
        }

        Ok(())
    }
}

/// Number of enemies placed on `level`: `floor(log2(level))`, zero for level 0.
#[must_use]
pub const fn enemy_count(level: u32) -> u32 {
    match level {
        0 => 0,
        _ => level.ilog2(),
    }
}

/// Draws a count from the inclusive `range`. The range must be valid.
pub fn draw_count<R>(range: CountRange, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    rng.gen_range(range.min()..=range.max())
}

fn draw_variant<R>(rng: &mut R, variants: &VariantCatalog, category: OccupantCategory) -> VariantId
where
    R: Rng + ?Sized,
{
    let count = variants.count(category).max(1);
    VariantId::new(rng.gen_range(0..count))
}

/// Produces boards from a fixed configuration and a seeded random stream.
#[derive(Clone, Debug)]
pub struct GridGenerator {
    config: Config,
    rng: ChaCha8Rng,
}

impl GridGenerator {
    /// Creates a generator whose draws are fully determined by `seed`.
    #[must_use]
    pub fn new(config: Config, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Configuration the generator was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Generates the board for `level`.
    ///
    /// Configuration and level are validated before anything is drawn. On
    /// failure no board is produced.
    pub fn generate_level(&mut self, level: i32) -> Result<GeneratedBoard, BoardGenerationError> {
        let result = self.try_generate(level);
        match &result {
            Ok(board) => debug!(
                "generated level {level}: {} placements on {}x{}",
                board.placements().len(),
                board.columns(),
                board.rows()
            ),
            Err(error) => warn!("level {level} generation failed: {error}"),
        }
        result
    }

    fn try_generate(&mut self, level: i32) -> Result<GeneratedBoard, BoardGenerationError> {
        self.config.validate()?;
        let level = match u32::try_from(level) {
            Ok(level) if level >= 1 => level,
            _ => return Err(ConfigurationIssue::Level { level }.into()),
        };

        let Config {
            columns,
            rows,
            wall_count,
            food_count,
            variants,
            layout,
            require_reachable_exit,
            solid,
        } = self.config;
        let rng = &mut self.rng;

        let mut board = GeneratedBoard::with_frame(level, columns, rows, layout, |category| {
            draw_variant(rng, &variants, category)
        });
        let mut pool = FreeCellPool::from_bounds(layout.pool(columns, rows));

        let walls = draw_count(wall_count, rng);
        scatter(&mut board, &mut pool, rng, &variants, OccupantCategory::InnerWall, walls)?;
        let food = draw_count(food_count, rng);
        scatter(&mut board, &mut pool, rng, &variants, OccupantCategory::Food, food)?;
        scatter(
            &mut board,
            &mut pool,
            rng,
            &variants,
            OccupantCategory::Enemy,
            enemy_count(level),
        )?;

        let exit = layout.exit(columns, rows);
        let variant = draw_variant(rng, &variants, OccupantCategory::Exit);
        let _ = place(&mut board, OccupantCategory::Exit, exit, variant)?;

        if require_reachable_exit && !exit_reachable(&board, solid) {
            return Err(BoardGenerationError::UnreachableExit { exit });
        }

        Ok(board)
    }
}

fn scatter<R>(
    board: &mut GeneratedBoard,
    pool: &mut FreeCellPool,
    rng: &mut R,
    variants: &VariantCatalog,
    category: OccupantCategory,
    count: u32,
) -> Result<(), BoardGenerationError>
where
    R: Rng + ?Sized,
{
    let available = pool.len();
    let capacity = BoardGenerationError::CapacityExceeded {
        category,
        requested: count,
        available,
    };
    if usize::try_from(count).map_or(true, |count| count > available) {
        return Err(capacity);
    }

    for _ in 0..count {
        let cell = pool.pop_random(rng).ok_or(capacity)?;
        let variant = draw_variant(rng, variants, category);
        let _ = place(board, category, cell, variant)?;
    }
    Ok(())
}

fn place(
    board: &mut GeneratedBoard,
    category: OccupantCategory,
    cell: Cell,
    variant: VariantId,
) -> Result<OccupantId, BoardGenerationError> {
    board
        .place(category, cell, variant)
        .ok_or(BoardGenerationError::PlacementRejected { category, cell })
}
