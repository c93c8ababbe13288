//! Lattice coordinates, diagonal directions and cell addressing.
//!
//! A W x H board is addressed on a (2W+1) x (2H+1) point lattice. The origin
//! is the top-left corner and `y` grows downward, so cell `(cx, cy)` has its
//! centre at lattice point `(2cx+1, 2cy+1)` and its edges at the even
//! coordinates around it.

use serde::{Deserialize, Serialize};

/// A point on the half-cell lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves one diagonal lattice step.
    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        Self::new(self.x + direction.dx(), self.y + direction.dy())
    }

    /// Classifies the point by coordinate parity.
    #[inline]
    pub const fn kind(self) -> PointKind {
        match (self.x.rem_euclid(2) == 0, self.y.rem_euclid(2) == 0) {
            (true, false) => PointKind::VerticalEdge,
            (false, true) => PointKind::HorizontalEdge,
            (true, true) => PointKind::Corner,
            (false, false) => PointKind::Interior,
        }
    }

    /// Returns the cell whose centre is this point, if the point is a centre.
    #[inline]
    pub const fn as_cell_centre(self) -> Option<Cell> {
        match self.kind() {
            PointKind::Interior => Some(Cell::new(
                (self.x - 1).div_euclid(2),
                (self.y - 1).div_euclid(2),
            )),
            _ => None,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a lattice point sits relative to the cells around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    /// Midpoint of a vertical cell edge (`x` even, `y` odd).
    VerticalEdge,
    /// Midpoint of a horizontal cell edge (`x` odd, `y` even).
    HorizontalEdge,
    /// Shared corner of up to four cells (both even).
    Corner,
    /// Centre of a cell (both odd).
    Interior,
}

/// One of the four diagonal unit steps.
///
/// Each component is stored as a sign, so an invalid direction such as
/// `(0, 1)` or `(2, 2)` cannot be represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Direction {
    right: bool,
    down: bool,
}

impl Direction {
    pub const UP_RIGHT: Self = Self { right: true, down: false };
    pub const DOWN_RIGHT: Self = Self { right: true, down: true };
    pub const DOWN_LEFT: Self = Self { right: false, down: true };
    pub const UP_LEFT: Self = Self { right: false, down: false };

    /// Builds a direction from a `(dx, dy)` pair; both components must be ±1.
    pub const fn new(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (1 | -1, 1 | -1) => Some(Self {
                right: dx > 0,
                down: dy > 0,
            }),
            _ => None,
        }
    }

    #[inline]
    pub const fn dx(self) -> i32 {
        if self.right {
            1
        } else {
            -1
        }
    }

    #[inline]
    pub const fn dy(self) -> i32 {
        if self.down {
            1
        } else {
            -1
        }
    }

    /// Negates the horizontal component (bounce off a vertical edge).
    #[inline]
    pub const fn flip_x(self) -> Self {
        Self {
            right: !self.right,
            down: self.down,
        }
    }

    /// Negates the vertical component (bounce off a horizontal edge).
    #[inline]
    pub const fn flip_y(self) -> Self {
        Self {
            right: self.right,
            down: !self.down,
        }
    }

    /// Negates both components (bounce straight back off a corner).
    #[inline]
    pub const fn reverse(self) -> Self {
        Self {
            right: !self.right,
            down: !self.down,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = String;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(dx, dy).ok_or_else(|| format!("({dx}, {dy}) is not a diagonal unit step"))
    }
}

impl From<Direction> for (i32, i32) {
    fn from(direction: Direction) -> Self {
        (direction.dx(), direction.dy())
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.dx(), self.dy())
    }
}

/// A block cell, addressed by column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Lattice point at the centre of this cell.
    #[inline]
    pub const fn centre(self) -> Point {
        Point::new(2 * self.x + 1, 2 * self.y + 1)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_kinds_follow_parity() {
        assert_eq!(Point::new(0, 1).kind(), PointKind::VerticalEdge);
        assert_eq!(Point::new(3, 4).kind(), PointKind::HorizontalEdge);
        assert_eq!(Point::new(2, 2).kind(), PointKind::Corner);
        assert_eq!(Point::new(1, 1).kind(), PointKind::Interior);
        // parity holds for negative coordinates too
        assert_eq!(Point::new(-1, 0).kind(), PointKind::HorizontalEdge);
    }

    #[test]
    fn test_cell_centre_roundtrip() {
        for x in -1..4 {
            for y in -1..4 {
                let cell = Cell::new(x, y);
                assert_eq!(cell.centre().as_cell_centre(), Some(cell));
            }
        }
        assert_eq!(Point::new(2, 1).as_cell_centre(), None);
    }

    #[test]
    fn test_direction_rejects_non_diagonal_steps() {
        assert!(Direction::new(0, 1).is_none());
        assert!(Direction::new(2, -2).is_none());
        assert_eq!(Direction::new(1, -1), Some(Direction::UP_RIGHT));
        assert!(Direction::try_from((1, 0)).is_err());
    }

    #[test]
    fn test_direction_flips() {
        let d = Direction::DOWN_RIGHT;
        assert_eq!(d.flip_x(), Direction::DOWN_LEFT);
        assert_eq!(d.flip_y(), Direction::UP_RIGHT);
        assert_eq!(d.reverse(), Direction::UP_LEFT);
        assert_eq!(Point::new(0, 1).step(d), Point::new(1, 2));
    }
}
