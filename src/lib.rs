//! Lazor Puzzle Solver Library
//!
//! Simulates laser beams on a block grid and searches block placements until
//! every target point is lit.

pub mod bff;
pub mod blocks;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod render;
pub mod solver;
pub mod tracer;

pub use blocks::{BlockKind, BlockSupply, PlacedBlock, Placement};
pub use error::{NoSolution, ParseError, PuzzleError, TraceDiverged, TraceError};
pub use geometry::{Cell, Direction, Point};
pub use grid::{GridModel, LaserSource, PuzzleSpec};
pub use solver::{solve, solve_with, Solution, SolverConfig};
pub use tracer::{trace, BeamPath};
