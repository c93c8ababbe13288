//! Laser path simulation.
//!
//! A beam lives on lattice points and moves one diagonal step at a time. At
//! each point it looks at the cell it is about to cross into:
//!
//! - from a vertical edge midpoint, the cell beside it in `dx`;
//! - from a horizontal edge midpoint, the cell beside it in `dy`;
//! - from a corner, only the diagonal cell in the direction of travel (blocks
//!   that merely touch the corner are grazed, never hit);
//! - from a cell centre, nothing (the beam is already inside the cell).
//!
//! Reflect negates the direction component perpendicular to the crossed edge
//! (both components at a corner), Opaque stops the branch where it stands and
//! Refract continues straight while also spawning a reflected branch.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::blocks::{BlockKind, Placement};
use crate::error::{TraceDiverged, TraceError};
use crate::geometry::{Direction, Point, PointKind};
use crate::grid::{GridModel, LaserSource, Layout};

/// Lattice points visited by one or more beams.
pub type VisitedPoints = FxHashSet<Point>;

/// A beam branch in flight.
#[derive(Clone, Copy, Debug)]
struct BeamState {
    point: Point,
    direction: Direction,
    /// Steps taken since the source, including those of parent branches.
    steps: usize,
}

/// The points reached from one source, sorted for stable output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamPath {
    pub source: LaserSource,
    pub points: Vec<Point>,
}

impl BeamPath {
    pub fn new(source: LaserSource, visited: VisitedPoints) -> Self {
        let mut points: Vec<Point> = visited.into_iter().collect();
        points.sort_unstable();
        Self { source, points }
    }
}

/// Default per-branch step cap: the number of distinct beam states.
///
/// Reached states are never traced twice, so a branch can only exceed this
/// if the tracer itself is wrong.
pub fn default_step_cap(grid: &GridModel) -> usize {
    let lattice_points =
        (2 * grid.width() as usize + 1).saturating_mul(2 * grid.height() as usize + 1);
    lattice_points.saturating_mul(4)
}

/// Traces one source through the fixed blocks plus `placement`.
///
/// Fails if the placement is not allowed on `grid` or the beam diverges.
pub fn trace(
    grid: &GridModel,
    placement: &Placement,
    source: &LaserSource,
) -> Result<VisitedPoints, TraceError> {
    let layout = grid.layout(placement)?;
    Ok(trace_layout(&layout, source, 0, default_step_cap(grid))?)
}

/// Traces one source through a prepared layout.
///
/// `source_index` only labels the error.
pub fn trace_layout(
    layout: &Layout,
    source: &LaserSource,
    source_index: usize,
    step_cap: usize,
) -> Result<VisitedPoints, TraceDiverged> {
    let mut visited = VisitedPoints::default();
    let mut seen_states: FxHashSet<(Point, Direction)> = FxHashSet::default();

    let mut work_list = vec![BeamState {
        point: source.origin,
        direction: source.direction,
        steps: 0,
    }];

    while let Some(beam) = work_list.pop() {
        visited.insert(beam.point);

        // a source placed off the lattice records its start and nothing else
        if !layout.contains(beam.point) {
            continue;
        }
        // another branch already traced everything reachable from here
        if !seen_states.insert((beam.point, beam.direction)) {
            continue;
        }

        let (straight, reflected) = match block_ahead(layout, beam.point, beam.direction) {
            None => (Some(beam.direction), None),
            Some(BlockKind::Reflect) => (None, Some(reflect(beam.point, beam.direction))),
            Some(BlockKind::Opaque) => continue,
            Some(BlockKind::Refract) => (
                Some(beam.direction),
                Some(reflect(beam.point, beam.direction)),
            ),
        };

        for direction in [straight, reflected].into_iter().flatten() {
            let next = beam.point.step(direction);
            if !layout.contains(next) {
                continue;
            }
            if beam.steps + 1 > step_cap {
                return Err(TraceDiverged {
                    source_index,
                    cap: step_cap,
                    at: beam.point,
                });
            }
            work_list.push(BeamState {
                point: next,
                direction,
                steps: beam.steps + 1,
            });
        }
    }

    Ok(visited)
}

/// Finds the block the beam would cross into from `point`.
#[inline]
fn block_ahead(layout: &Layout, point: Point, direction: Direction) -> Option<BlockKind> {
    let centre = match point.kind() {
        PointKind::VerticalEdge => Point::new(point.x + direction.dx(), point.y),
        PointKind::HorizontalEdge => Point::new(point.x, point.y + direction.dy()),
        PointKind::Corner => point.step(direction),
        PointKind::Interior => return None,
    };
    layout.block_at(centre.as_cell_centre()?)
}

/// New direction after bouncing off the block ahead of `point`.
#[inline]
fn reflect(point: Point, direction: Direction) -> Direction {
    match point.kind() {
        PointKind::VerticalEdge => direction.flip_x(),
        PointKind::HorizontalEdge => direction.flip_y(),
        PointKind::Corner => direction.reverse(),
        // no block is ever ahead of an interior point
        PointKind::Interior => direction,
    }
}
