//! Error types for puzzle construction, tracing and search.

use thiserror::Error;

use crate::blocks::BlockKind;
use crate::geometry::{Cell, Point};

/// A structural precondition of the puzzle model does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("a {width}x{height} grid does not fit in i32 lattice coordinates")]
    GridTooLarge { width: i32, height: i32 },

    #[error("fixed block at {0} lies outside the grid")]
    FixedBlockOutside(Cell),

    #[error("open cell {0} lies outside the grid")]
    OpenCellOutside(Cell),

    #[error("open cell {0} is listed twice or already holds a fixed block")]
    OpenCellTaken(Cell),

    #[error("target {0} lies outside the lattice")]
    TargetOutside(Point),

    #[error("{blocks} movable blocks declared but only {open} open cells")]
    NotEnoughOpenCells { blocks: usize, open: usize },

    #[error("placed block at {0} is not on an open cell")]
    PlacementNotOpen(Cell),

    #[error("{placed} {kind:?} blocks placed but only {available} supplied")]
    SupplyExceeded {
        kind: BlockKind,
        placed: usize,
        available: usize,
    },
}

/// A beam branch ran past the step cap without leaving the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("beam from source {source_index} exceeded {cap} steps at {at}")]
pub struct TraceDiverged {
    pub source_index: usize,
    pub cap: usize,
    pub at: Point,
}

/// A single trace could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error(transparent)]
    Placement(#[from] PuzzleError),

    #[error(transparent)]
    Diverged(#[from] TraceDiverged),
}

/// Exhaustive search finished without a placement that covers every target.
///
/// This is an expected outcome, returned as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no placement covers every target ({candidates} candidates checked)")]
pub struct NoSolution {
    pub candidates: u64,
}

/// A `.bff` puzzle description could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unknown grid token {token:?}")]
    UnknownToken { line: usize, token: String },

    #[error("missing GRID START / GRID STOP section")]
    MissingGrid,

    #[error("line {line}: expected {expected}")]
    Malformed { line: usize, expected: &'static str },

    #[error("line {line}: invalid number")]
    InvalidNumber {
        line: usize,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("line {line}: ({dx}, {dy}) is not a diagonal direction")]
    InvalidDirection { line: usize, dx: i32, dy: i32 },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("could not read puzzle file")]
    Io(#[from] std::io::Error),
}
