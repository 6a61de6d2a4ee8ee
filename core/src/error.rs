//! Error types surfaced to the orchestrator.

use thiserror::Error;

use crate::{Cell, OccupantCategory};

/// Specific configuration problem detected before generation starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationIssue {
    /// The board is smaller than 2x2 or larger than the supported maximum.
    #[error("board dimensions {columns}x{rows} are outside 2..={max}")]
    Dimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
        /// Largest supported extent on either axis.
        max: u32,
    },
    /// A count range has its bounds inverted.
    #[error("{category:?} count range {min}..={max} is inverted")]
    CountRange {
        /// Category the range belongs to.
        category: OccupantCategory,
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// A category has no visual variants to pick from.
    #[error("{category:?} has no visual variants")]
    NoVariants {
        /// Category lacking variants.
        category: OccupantCategory,
    },
    /// The level number is not positive.
    #[error("level must be positive, got {level}")]
    Level {
        /// Requested level number.
        level: i32,
    },
}

/// Reasons a level generation call fails. No board is produced on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardGenerationError {
    /// The configuration or the level number was rejected up front.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationIssue),
    /// A category asked for more cells than the pool still holds.
    #[error("cannot place {requested} {category:?} occupants, only {available} free cells remain")]
    CapacityExceeded {
        /// Category being placed.
        category: OccupantCategory,
        /// Number of occupants drawn for the category.
        requested: u32,
        /// Free cells remaining in the pool.
        available: usize,
    },
    /// The board refused a placement the layout promised was free.
    #[error("{category:?} placement on {cell:?} was rejected by the board")]
    PlacementRejected {
        /// Category being placed.
        category: OccupantCategory,
        /// Cell the placement targeted.
        cell: Cell,
    },
    /// The exit cannot be reached from the player start.
    #[error("exit at {exit:?} is unreachable from the player start")]
    UnreachableExit {
        /// Cell holding the exit.
        exit: Cell,
    },
}

/// Reasons a single actor move request is refused synchronously.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The delta is not a single cardinal step.
    #[error("move ({dx}, {dy}) is not a single cardinal step")]
    InvalidMoveRequest {
        /// Requested horizontal step.
        dx: i32,
        /// Requested vertical step.
        dy: i32,
    },
}
