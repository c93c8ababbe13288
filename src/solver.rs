//! Exhaustive placement search.
//!
//! Candidates are generated in a fixed order so the first solution is
//! reproducible:
//! - kinds are filled in [`BlockKind::ALL`] order (Reflect, Opaque, Refract);
//! - each kind picks a combination of the open cells left over by earlier
//!   kinds, and combinations advance lexicographically over open-cell index;
//! - the last kind varies fastest.
//!
//! Every candidate is merged into a fresh layout and every source is traced
//! through it. There is no pruning.

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::blocks::{BlockKind, PlacedBlock, Placement, NUM_KINDS};
use crate::error::{NoSolution, TraceError};
use crate::geometry::{Cell, Point};
use crate::grid::GridModel;
use crate::tracer::{default_step_cap, trace_layout, BeamPath};

/// Tunables for a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Per-branch step cap; `None` uses [`default_step_cap`].
    pub step_cap: Option<usize>,
}

impl SolverConfig {
    fn step_cap_for(&self, grid: &GridModel) -> usize {
        self.step_cap.unwrap_or_else(|| default_step_cap(grid))
    }
}

/// A placement that lights every target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub placement: Placement,
    /// One path per laser source, in source order.
    pub paths: Vec<BeamPath>,
    /// Candidates checked up to and including this one.
    pub candidates: u64,
}

/// Lexicographic k-of-n index combination.
#[derive(Clone, Debug)]
struct Combination {
    n: usize,
    indices: Vec<usize>,
}

impl Combination {
    /// The first combination, or `None` when `k > n`.
    fn first(n: usize, k: usize) -> Option<Self> {
        (k <= n).then(|| Self {
            n,
            indices: (0..k).collect(),
        })
    }

    /// Steps to the next combination; returns `false` once exhausted.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        // rightmost slot that can still move right
        let Some(slot) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            return false;
        };
        self.indices[slot] += 1;
        for next in slot + 1..k {
            self.indices[next] = self.indices[next - 1] + 1;
        }
        true
    }
}

/// One kind's choice: which open cells it may pick from and what it picked.
#[derive(Clone, Debug)]
struct Level {
    /// Indices into the open-cell list still free at this level.
    pool: Vec<usize>,
    combination: Combination,
}

impl Level {
    fn new(pool: Vec<usize>, count: usize) -> Option<Self> {
        let combination = Combination::first(pool.len(), count)?;
        Some(Self { pool, combination })
    }

    /// Open-cell indices chosen at this level.
    fn chosen(&self) -> impl Iterator<Item = usize> + '_ {
        self.combination.indices.iter().map(|&i| self.pool[i])
    }

    /// Pool for the next level: this pool minus the chosen cells.
    fn remaining(&self) -> Vec<usize> {
        let mut taken = self.combination.indices.iter().peekable();
        self.pool
            .iter()
            .enumerate()
            .filter_map(|(i, &open_idx)| {
                if taken.peek() == Some(&&i) {
                    taken.next();
                    None
                } else {
                    Some(open_idx)
                }
            })
            .collect()
    }
}

/// Iterator over every candidate placement, in search order.
///
/// Yields exactly one empty placement when no movable blocks are supplied.
pub struct Candidates<'a> {
    open: &'a [Cell],
    counts: [usize; NUM_KINDS],
    levels: Vec<Level>,
    started: bool,
    exhausted: bool,
}

impl<'a> Candidates<'a> {
    pub fn new(grid: &'a GridModel) -> Self {
        let supply = grid.supply();
        Self {
            open: grid.open_cells(),
            counts: BlockKind::ALL.map(|kind| supply.count(kind)),
            levels: Vec::with_capacity(NUM_KINDS),
            started: false,
            exhausted: false,
        }
    }

    /// Rebuilds levels from `depth` onward at their first combination.
    fn reset_from(&mut self, depth: usize) -> bool {
        self.levels.truncate(depth);
        for level_idx in depth..NUM_KINDS {
            let pool = match self.levels.last() {
                Some(level) => level.remaining(),
                None => (0..self.open.len()).collect(),
            };
            match Level::new(pool, self.counts[level_idx]) {
                Some(level) => self.levels.push(level),
                None => return false,
            }
        }
        true
    }

    fn current(&self) -> Placement {
        self.levels
            .iter()
            .zip(BlockKind::ALL)
            .flat_map(|(level, kind)| {
                level
                    .chosen()
                    .map(move |open_idx| PlacedBlock::new(self.open[open_idx], kind))
            })
            .collect()
    }
}

impl Iterator for Candidates<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        if self.exhausted {
            return None;
        }

        if !self.started {
            self.started = true;
            if !self.reset_from(0) {
                self.exhausted = true;
                return None;
            }
            return Some(self.current());
        }

        // odometer: advance the deepest level that still can, reset the rest
        let mut depth = NUM_KINDS;
        loop {
            if depth == 0 {
                self.exhausted = true;
                return None;
            }
            depth -= 1;
            if self.levels[depth].combination.advance() {
                break;
            }
        }
        if !self.reset_from(depth + 1) {
            self.exhausted = true;
            return None;
        }
        Some(self.current())
    }
}

/// Number of ways to choose `k` of `n`, saturating at `u64::MAX`.
fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// Size of the search space for `grid`.
pub fn candidate_count(grid: &GridModel) -> u64 {
    let supply = grid.supply();
    let mut free = grid.open_cells().len();
    let mut total: u64 = 1;
    for kind in BlockKind::ALL {
        let count = supply.count(kind);
        total = total.saturating_mul(binomial(free, count));
        free = free.saturating_sub(count);
    }
    total
}

/// Traces every source through `placement` and reports the paths if all
/// targets are lit.
///
/// `Ok(None)` means the candidate traced cleanly but missed a target.
pub fn check(
    grid: &GridModel,
    placement: &Placement,
    config: &SolverConfig,
) -> Result<Option<Vec<BeamPath>>, TraceError> {
    let paths = trace_all(grid, placement, config)?;

    let lit: FxHashSet<Point> = paths
        .iter()
        .flat_map(|path| path.points.iter().copied())
        .collect();
    let covered = grid.targets().iter().all(|target| lit.contains(target));

    Ok(covered.then_some(paths))
}

/// Traces every source through `placement`, one path per source.
pub fn trace_all(
    grid: &GridModel,
    placement: &Placement,
    config: &SolverConfig,
) -> Result<Vec<BeamPath>, TraceError> {
    let layout = grid.layout(placement)?;
    let step_cap = config.step_cap_for(grid);

    let paths: Vec<BeamPath> = grid
        .lasers()
        .iter()
        .enumerate()
        .map(|(source_index, source)| {
            trace_layout(&layout, source, source_index, step_cap)
                .map(|visited| BeamPath::new(*source, visited))
        })
        .collect::<Result<_, _>>()?;
    Ok(paths)
}

/// Finds the first placement, in search order, that lights every target.
pub fn solve(grid: &GridModel) -> Result<Solution, NoSolution> {
    solve_with(grid, &SolverConfig::default())
}

/// [`solve`] with explicit configuration.
pub fn solve_with(grid: &GridModel, config: &SolverConfig) -> Result<Solution, NoSolution> {
    info!(
        "searching {} candidates ({} open cells, {} lasers, {} targets)",
        candidate_count(grid),
        grid.open_cells().len(),
        grid.lasers().len(),
        grid.targets().len()
    );

    let mut candidates = 0u64;
    for placement in Candidates::new(grid) {
        candidates += 1;
        match check(grid, &placement, config) {
            Ok(Some(paths)) => {
                info!("solved after {candidates} candidates");
                return Ok(Solution {
                    placement,
                    paths,
                    candidates,
                });
            }
            Ok(None) => {}
            Err(err) => debug!("candidate {candidates} disqualified: {err}"),
        }
    }

    info!("no solution after {candidates} candidates");
    Err(NoSolution { candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockSupply;
    use crate::error::PuzzleError;
    use crate::geometry::Direction;
    use crate::grid::{LaserSource, PuzzleSpec};

    /// 2x2 board, every cell open, one beam entering from the left edge.
    fn two_by_two(supply: BlockSupply, targets: &[(i32, i32)]) -> GridModel {
        GridModel::new(PuzzleSpec {
            width: 2,
            height: 2,
            supply,
            open: vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
            ],
            lasers: vec![LaserSource::new(
                Point::new(0, 1),
                Direction::DOWN_RIGHT,
            )],
            targets: targets.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            ..PuzzleSpec::default()
        })
        .unwrap()
    }

    fn cells(placement: &Placement) -> Vec<(i32, i32, BlockKind)> {
        placement
            .iter()
            .map(|b| (b.cell.x, b.cell.y, b.kind))
            .collect()
    }

    #[test]
    fn test_combinations_are_lexicographic() {
        let mut combination = Combination::first(4, 2).unwrap();
        let mut seen = vec![combination.indices.clone()];
        while combination.advance() {
            seen.push(combination.indices.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        assert!(Combination::first(2, 3).is_none());

        let mut empty = Combination::first(3, 0).unwrap();
        assert!(empty.indices.is_empty());
        assert!(!empty.advance());
    }

    #[test]
    fn test_candidates_follow_kind_then_index_order() {
        let grid = two_by_two(BlockSupply::new(1, 0, 1), &[]);
        let all: Vec<_> = Candidates::new(&grid).map(|p| cells(&p)).collect();

        assert_eq!(all.len(), 12);
        assert_eq!(all.len() as u64, candidate_count(&grid));
        // reflect on open cell 0, refract walks the remaining cells
        assert_eq!(
            all[0],
            vec![(0, 0, BlockKind::Reflect), (1, 0, BlockKind::Refract)]
        );
        assert_eq!(
            all[1],
            vec![(0, 0, BlockKind::Reflect), (0, 1, BlockKind::Refract)]
        );
        // reflect moves to open cell 1 and refract starts over from cell 0
        assert_eq!(
            all[3],
            vec![(0, 0, BlockKind::Refract), (1, 0, BlockKind::Reflect)]
        );
        // every candidate uses distinct cells
        assert!(all.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn test_candidate_count_multiplies_levels() {
        let grid = two_by_two(BlockSupply::new(1, 1, 1), &[]);
        assert_eq!(candidate_count(&grid), 4 * 3 * 2);
        assert_eq!(Candidates::new(&grid).count(), 24);
        assert_eq!(binomial(10, 3), 120);
        assert_eq!(binomial(3, 4), 0);
    }

    #[test]
    fn test_zero_movable_blocks_checks_once() {
        let grid = two_by_two(BlockSupply::default(), &[(3, 4)]);
        assert_eq!(Candidates::new(&grid).count(), 1);

        let solution = solve(&grid).unwrap();
        assert!(solution.placement.is_empty());
        assert_eq!(solution.candidates, 1);
    }

    #[test]
    fn test_unique_solution_is_found() {
        // only a mirror at (0,1) turns the beam up to the top edge
        let grid = two_by_two(BlockSupply::new(1, 0, 0), &[(3, 0)]);
        let solution = solve(&grid).unwrap();

        assert_eq!(cells(&solution.placement), vec![(0, 1, BlockKind::Reflect)]);
        assert_eq!(solution.candidates, 3);
        assert_eq!(solution.paths.len(), 1);
        assert!(solution.paths[0].points.contains(&Point::new(3, 0)));
    }

    #[test]
    fn test_first_solution_in_order_wins() {
        // (1,2) is lit with the mirror at (1,0), (0,1) or (1,1); (1,0) comes first
        let grid = two_by_two(BlockSupply::new(1, 0, 0), &[(1, 2)]);
        let solution = solve(&grid).unwrap();
        assert_eq!(cells(&solution.placement), vec![(1, 0, BlockKind::Reflect)]);
        assert_eq!(solution.candidates, 2);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let grid = two_by_two(BlockSupply::new(1, 0, 1), &[(2, 1), (3, 4)]);
        let first = solve(&grid).unwrap();
        let second = solve(&grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreachable_target_exhausts_search() {
        // the beam only visits points with odd x + y
        let grid = two_by_two(BlockSupply::new(1, 0, 1), &[(4, 0)]);
        assert_eq!(solve(&grid).unwrap_err(), NoSolution { candidates: 12 });
    }

    #[test]
    fn test_fixed_reflect_corner_fixture() {
        let grid = GridModel::new(PuzzleSpec {
            width: 2,
            height: 2,
            fixed: vec![PlacedBlock::new(Cell::new(0, 0), BlockKind::Reflect)],
            lasers: vec![LaserSource::new(Point::new(0, 2), Direction::UP_RIGHT)],
            targets: vec![Point::new(2, 0)],
            ..PuzzleSpec::default()
        })
        .unwrap();

        assert_eq!(solve(&grid).unwrap_err(), NoSolution { candidates: 1 });
    }

    #[test]
    fn test_diverging_candidates_are_skipped() {
        // the winning path needs three steps
        let grid = two_by_two(BlockSupply::new(1, 0, 0), &[(3, 0)]);

        let tight = SolverConfig { step_cap: Some(2) };
        assert_eq!(
            solve_with(&grid, &tight).unwrap_err(),
            NoSolution { candidates: 4 }
        );

        let enough = SolverConfig { step_cap: Some(3) };
        assert!(solve_with(&grid, &enough).is_ok());
    }

    #[test]
    fn test_check_reports_missed_targets() {
        let grid = two_by_two(BlockSupply::new(1, 0, 0), &[(3, 0)]);
        let miss: Placement = [PlacedBlock::new(Cell::new(1, 1), BlockKind::Reflect)]
            .into_iter()
            .collect();
        assert_eq!(check(&grid, &miss, &SolverConfig::default()), Ok(None));
    }

    #[test]
    fn test_check_rejects_oversupplied_placement() {
        let grid = two_by_two(BlockSupply::new(1, 0, 0), &[(3, 0)]);
        let two_mirrors: Placement = [
            PlacedBlock::new(Cell::new(0, 1), BlockKind::Reflect),
            PlacedBlock::new(Cell::new(1, 1), BlockKind::Reflect),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            check(&grid, &two_mirrors, &SolverConfig::default()),
            Err(TraceError::Placement(PuzzleError::SupplyExceeded {
                kind: BlockKind::Reflect,
                placed: 2,
                available: 1,
            }))
        );
    }
}
