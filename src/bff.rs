//! Reader for the `.bff` puzzle format.
//!
//! ```text
//! # comment
//! GRID START
//! o B o
//! o o x
//! GRID STOP
//! A 2          movable reflect blocks
//! C 1          movable refract blocks
//! L 2 7 1 -1   laser at lattice (2, 7) heading (1, -1)
//! P 3 0        target lattice point
//! ```
//!
//! Grid tokens are `o` (open), `x` (no block allowed) and `A`/`B`/`C` (fixed
//! blocks). Rows shorter than the widest one are padded with `x`. Laser and
//! target coordinates are already lattice coordinates with `y` downward.

use std::path::Path;

use log::warn;

use crate::blocks::{BlockKind, PlacedBlock};
use crate::error::ParseError;
use crate::geometry::{Cell, Direction, Point};
use crate::grid::{GridModel, LaserSource, PuzzleSpec};

const GRID_START: &str = "GRID START";
const GRID_STOP: &str = "GRID STOP";

/// Parses puzzle text into unvalidated puzzle data.
pub fn parse(input: &str) -> Result<PuzzleSpec, ParseError> {
    let mut spec = PuzzleSpec::default();
    let mut in_grid = false;
    let mut grid_seen = false;
    let mut rows: Vec<(usize, Vec<&str>)> = Vec::new();

    for (line_idx, raw) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line {
            GRID_START => {
                in_grid = true;
                continue;
            }
            GRID_STOP if in_grid => {
                in_grid = false;
                grid_seen = true;
                continue;
            }
            _ => {}
        }

        if in_grid {
            rows.push((line_no, line.split_whitespace().collect()));
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "A" | "B" | "C" => {
                let kind = tokens[0]
                    .chars()
                    .next()
                    .and_then(BlockKind::from_symbol)
                    .ok_or(ParseError::Malformed {
                        line: line_no,
                        expected: "a block kind",
                    })?;
                let [count] = numbers::<1>(&tokens, line_no, "a block count")?;
                let count = usize::try_from(count).map_err(|_| ParseError::Malformed {
                    line: line_no,
                    expected: "a non-negative block count",
                })?;
                spec.supply.set(kind, count);
            }
            "L" => {
                let [x, y, dx, dy] = numbers::<4>(&tokens, line_no, "L x y dx dy")?;
                let direction = Direction::new(dx, dy).ok_or(ParseError::InvalidDirection {
                    line: line_no,
                    dx,
                    dy,
                })?;
                spec.lasers.push(LaserSource::new(Point::new(x, y), direction));
            }
            "P" => {
                let [x, y] = numbers::<2>(&tokens, line_no, "P x y")?;
                spec.targets.push(Point::new(x, y));
            }
            other => warn!("line {line_no}: skipping unknown directive {other:?}"),
        }
    }

    if !grid_seen {
        return Err(ParseError::MissingGrid);
    }

    let last_line = rows.last().map_or(0, |(line_no, _)| *line_no);
    let widest = rows.iter().map(|(_, tokens)| tokens.len()).max().unwrap_or(0);
    spec.width = dimension(widest, last_line)?;
    spec.height = dimension(rows.len(), last_line)?;

    for (y, (line_no, tokens)) in (0..spec.height).zip(&rows) {
        for x in 0..spec.width {
            let cell = Cell::new(x, y);
            match tokens.get(x as usize).copied() {
                Some("o") => spec.open.push(cell),
                Some("x") | None => spec.blocked.push(cell),
                Some(token) => {
                    let kind = single_char(token)
                        .and_then(BlockKind::from_symbol)
                        .ok_or_else(|| ParseError::UnknownToken {
                            line: *line_no,
                            token: token.to_string(),
                        })?;
                    spec.fixed.push(PlacedBlock::new(cell, kind));
                }
            }
        }
    }

    Ok(spec)
}

/// Parses and validates a puzzle.
pub fn parse_grid(input: &str) -> Result<GridModel, ParseError> {
    Ok(GridModel::new(parse(input)?)?)
}

/// Reads and validates a puzzle file.
pub fn load(path: &Path) -> Result<GridModel, ParseError> {
    parse_grid(&std::fs::read_to_string(path)?)
}

/// Puzzle name derived from a file path (`puzzles/mad_1.bff` -> `mad_1`).
pub fn puzzle_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "puzzle".to_string())
}

/// Converts a grid row or column count to a coordinate bound.
fn dimension(count: usize, line: usize) -> Result<i32, ParseError> {
    i32::try_from(count).map_err(|_| ParseError::Malformed {
        line,
        expected: "a grid small enough for i32 coordinates",
    })
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Parses exactly `N` integers after the directive letter.
fn numbers<const N: usize>(
    tokens: &[&str],
    line: usize,
    expected: &'static str,
) -> Result<[i32; N], ParseError> {
    if tokens.len() != N + 1 {
        return Err(ParseError::Malformed { line, expected });
    }
    let mut values = [0; N];
    for (value, token) in values.iter_mut().zip(&tokens[1..]) {
        *value = token
            .parse()
            .map_err(|source| ParseError::InvalidNumber { line, source })?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockSupply;
    use crate::error::PuzzleError;

    const SAMPLE: &str = "\
# sample with every token
GRID START
o B o
x o
C o o
GRID STOP

A 2
C 1

L 0 3 1 -1
P 3 0
P 6 5
";

    #[test]
    fn test_parse_sample() {
        let spec = parse(SAMPLE).unwrap();

        assert_eq!((spec.width, spec.height), (3, 3));
        assert_eq!(spec.supply, BlockSupply::new(2, 0, 1));
        assert_eq!(
            spec.fixed,
            vec![
                PlacedBlock::new(Cell::new(1, 0), BlockKind::Opaque),
                PlacedBlock::new(Cell::new(0, 2), BlockKind::Refract),
            ]
        );
        assert_eq!(
            spec.open,
            vec![
                Cell::new(0, 0),
                Cell::new(2, 0),
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 2),
            ]
        );
        // short row padded with a blocked cell
        assert_eq!(spec.blocked, vec![Cell::new(0, 1), Cell::new(2, 1)]);
        assert_eq!(
            spec.lasers,
            vec![LaserSource::new(Point::new(0, 3), Direction::UP_RIGHT)]
        );
        assert_eq!(spec.targets, vec![Point::new(3, 0), Point::new(6, 5)]);
    }

    #[test]
    fn test_parse_grid_validates() {
        let oversupplied = "GRID START\no x\nGRID STOP\nA 2\n";
        match parse_grid(oversupplied).unwrap_err() {
            ParseError::Puzzle(PuzzleError::NotEnoughOpenCells { blocks, open }) => {
                assert_eq!((blocks, open), (2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_grid() {
        assert!(matches!(parse("A 1\n"), Err(ParseError::MissingGrid)));
        assert!(matches!(
            parse("GRID START\no o\n"),
            Err(ParseError::MissingGrid)
        ));
    }

    #[test]
    fn test_bad_lines_report_line_numbers() {
        let bad_token = "GRID START\no q\nGRID STOP\n";
        assert!(matches!(
            parse(bad_token),
            Err(ParseError::UnknownToken { line: 2, ref token }) if token == "q"
        ));

        let bad_direction = "GRID START\no\nGRID STOP\nL 0 1 1 0\n";
        assert!(matches!(
            parse(bad_direction),
            Err(ParseError::InvalidDirection { line: 4, dx: 1, dy: 0 })
        ));

        let short_laser = "GRID START\no\nGRID STOP\nL 0 1 1\n";
        assert!(matches!(
            parse(short_laser),
            Err(ParseError::Malformed { line: 4, .. })
        ));

        let bad_number = "GRID START\no\nGRID STOP\nP 1 y\n";
        assert!(matches!(
            parse(bad_number),
            Err(ParseError::InvalidNumber { line: 4, .. })
        ));
    }

    #[test]
    fn test_grid_dimensions_must_fit_coordinates() {
        assert_eq!(dimension(3, 2).unwrap(), 3);
        assert!(matches!(
            dimension(i32::MAX as usize + 1, 7),
            Err(ParseError::Malformed { line: 7, .. })
        ));
    }

    #[test]
    fn test_unknown_directive_is_skipped() {
        let spec = parse("GRID START\no\nGRID STOP\nQ 1 2\nP 1 0\n").unwrap();
        assert_eq!(spec.targets, vec![Point::new(1, 0)]);
    }

    #[test]
    fn test_puzzle_name() {
        assert_eq!(puzzle_name(Path::new("puzzles/mad_1.bff")), "mad_1");
    }
}
