//! Immutable puzzle model and per-candidate block layouts.
//!
//! Cells are stored in flat row-major arrays (`idx = y * width + x`). The model
//! keeps one array of fixed blocks; each candidate placement is merged into a
//! copy of it ([`Layout`]) so the model itself is never written to.

use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, BlockSupply, PlacedBlock, Placement};
use crate::error::PuzzleError;
use crate::geometry::{Cell, Direction, Point};

/// A laser emitter: where the beam starts and which way it heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserSource {
    pub origin: Point,
    pub direction: Direction,
}

impl LaserSource {
    pub const fn new(origin: Point, direction: Direction) -> Self {
        Self { origin, direction }
    }
}

/// Raw puzzle data as produced by a reader, before validation.
#[derive(Clone, Debug, Default)]
pub struct PuzzleSpec {
    pub width: i32,
    pub height: i32,
    pub fixed: Vec<PlacedBlock>,
    pub supply: BlockSupply,
    /// Cells that may receive a movable block, in puzzle order.
    pub open: Vec<Cell>,
    /// Cells that can never hold a block. Beams pass through them.
    pub blocked: Vec<Cell>,
    pub lasers: Vec<LaserSource>,
    pub targets: Vec<Point>,
}

/// Converts a cell to its index in a row-major array.
///
/// The cell must be inside the grid.
#[inline(always)]
const fn cell_to_idx(width: i32, cell: Cell) -> usize {
    (cell.y * width + cell.x) as usize
}

#[inline]
fn cell_in_grid(width: i32, height: i32, cell: Cell) -> bool {
    (0..width).contains(&cell.x) && (0..height).contains(&cell.y)
}

/// Whether `point` lies on the (2W+1) x (2H+1) lattice of a W x H grid.
#[inline]
fn lattice_contains(width: i32, height: i32, point: Point) -> bool {
    (0..=2 * width).contains(&point.x) && (0..=2 * height).contains(&point.y)
}

/// Validated, read-only puzzle description.
#[derive(Clone, Debug)]
pub struct GridModel {
    width: i32,
    height: i32,
    fixed: Vec<PlacedBlock>,
    supply: BlockSupply,
    open: Vec<Cell>,
    blocked: Vec<Cell>,
    lasers: Vec<LaserSource>,
    targets: Vec<Point>,
    /// Fixed blocks by cell index; the base every [`Layout`] starts from.
    fixed_cells: Vec<Option<BlockKind>>,
    /// Open cells by cell index.
    open_mask: Vec<bool>,
}

impl GridModel {
    /// Validates puzzle data and builds the model.
    pub fn new(spec: PuzzleSpec) -> Result<Self, PuzzleError> {
        let PuzzleSpec {
            width,
            height,
            fixed,
            supply,
            open,
            blocked,
            lasers,
            targets,
        } = spec;

        if width <= 0 || height <= 0 {
            return Err(PuzzleError::EmptyGrid { width, height });
        }
        // cell indices must fit, and so must the lattice bound 2 * W
        let cell_count = width
            .checked_mul(height)
            .filter(|_| width.checked_mul(2).is_some() && height.checked_mul(2).is_some())
            .ok_or(PuzzleError::GridTooLarge { width, height })?;
        let in_grid = |cell: Cell| cell_in_grid(width, height, cell);

        let mut fixed_cells = vec![None; cell_count as usize];
        for block in &fixed {
            if !in_grid(block.cell) {
                return Err(PuzzleError::FixedBlockOutside(block.cell));
            }
            fixed_cells[cell_to_idx(width, block.cell)] = Some(block.kind);
        }

        let mut open_mask = vec![false; cell_count as usize];
        for &cell in &open {
            if !in_grid(cell) {
                return Err(PuzzleError::OpenCellOutside(cell));
            }
            let idx = cell_to_idx(width, cell);
            if fixed_cells[idx].is_some() || open_mask[idx] {
                return Err(PuzzleError::OpenCellTaken(cell));
            }
            open_mask[idx] = true;
        }

        if let Some(&target) = targets
            .iter()
            .find(|&&p| !lattice_contains(width, height, p))
        {
            return Err(PuzzleError::TargetOutside(target));
        }

        if open.len() < supply.total() {
            return Err(PuzzleError::NotEnoughOpenCells {
                blocks: supply.total(),
                open: open.len(),
            });
        }

        Ok(Self {
            width,
            height,
            fixed,
            supply,
            open,
            blocked,
            lasers,
            targets,
            fixed_cells,
            open_mask,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn fixed_blocks(&self) -> &[PlacedBlock] {
        &self.fixed
    }

    pub fn supply(&self) -> BlockSupply {
        self.supply
    }

    pub fn open_cells(&self) -> &[Cell] {
        &self.open
    }

    pub fn blocked_cells(&self) -> &[Cell] {
        &self.blocked
    }

    pub fn lasers(&self) -> &[LaserSource] {
        &self.lasers
    }

    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    #[inline]
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell_in_grid(self.width, self.height, cell)
    }

    /// Whether a movable block may be placed on `cell`.
    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.contains_cell(cell) && self.open_mask[cell_to_idx(self.width, cell)]
    }

    /// Merges a candidate placement over the fixed blocks.
    ///
    /// Every placed cell must be open, and no kind may be placed more often
    /// than it is supplied.
    pub fn layout(&self, placement: &Placement) -> Result<Layout, PuzzleError> {
        let mut cells = self.fixed_cells.clone();
        for placed in placement.iter() {
            if !self.is_open(placed.cell) {
                return Err(PuzzleError::PlacementNotOpen(placed.cell));
            }
            cells[cell_to_idx(self.width, placed.cell)] = Some(placed.kind);
        }

        let used = placement.supply();
        for kind in BlockKind::ALL {
            if used.count(kind) > self.supply.count(kind) {
                return Err(PuzzleError::SupplyExceeded {
                    kind,
                    placed: used.count(kind),
                    available: self.supply.count(kind),
                });
            }
        }

        Ok(Layout {
            width: self.width,
            height: self.height,
            cells,
        })
    }
}

/// Fixed blocks plus one candidate placement, looked up by cell.
#[derive(Clone, Debug)]
pub struct Layout {
    width: i32,
    height: i32,
    cells: Vec<Option<BlockKind>>,
}

impl Layout {
    /// Whether `point` lies on the lattice.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        lattice_contains(self.width, self.height, point)
    }

    /// Block occupying `cell`; `None` for empty cells and cells off the grid.
    #[inline]
    pub fn block_at(&self, cell: Cell) -> Option<BlockKind> {
        if cell_in_grid(self.width, self.height, cell) {
            self.cells[cell_to_idx(self.width, cell)]
        } else {
            None
        }
    }
}

/// Renders the board one row per line, in puzzle-file tokens.
///
/// Blocks show as `A`/`B`/`C`, empty open cells as `o` and everything else as
/// `x`.
pub fn board_rows(grid: &GridModel, placement: &Placement) -> Result<Vec<String>, PuzzleError> {
    let layout = grid.layout(placement)?;

    let rows: Vec<String> = (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| {
                    let cell = Cell::new(x, y);
                    let symbol = match layout.block_at(cell) {
                        Some(kind) => kind.symbol(),
                        None if grid.is_open(cell) => 'o',
                        None => 'x',
                    };
                    symbol.to_string()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Ok(rows)
}

/// Formats the board as a multi-line string.
pub fn format_board(grid: &GridModel, placement: &Placement) -> Result<String, PuzzleError> {
    let mut output = String::new();
    for row in board_rows(grid, placement)? {
        output.push_str(&row);
        output.push('\n');
    }
    Ok(output)
}
