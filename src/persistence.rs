//! Saving and loading solution reports.
//!
//! A solved puzzle `name` is written to two files in the output directory:
//! - `name.solution.txt`: the board and the lit points, for reading;
//! - `name.solution.json`: the full [`SolutionReport`], for reloading.
//!
//! The PNG drawing of the board lives in [`crate::render`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::blocks::Placement;
use crate::error::PuzzleError;
use crate::geometry::Point;
use crate::grid::{board_rows, GridModel};
use crate::solver::Solution;
use crate::tracer::BeamPath;

/// Everything a renderer needs to draw a solved puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub puzzle: String,
    pub width: i32,
    pub height: i32,
    pub placement: Placement,
    pub paths: Vec<BeamPath>,
    pub targets: Vec<Point>,
    pub candidates: u64,
    /// Rendered board rows, in puzzle-file tokens.
    pub board: Vec<String>,
}

impl SolutionReport {
    pub fn new(
        puzzle: impl Into<String>,
        grid: &GridModel,
        solution: &Solution,
    ) -> Result<Self, PuzzleError> {
        Ok(Self {
            puzzle: puzzle.into(),
            width: grid.width(),
            height: grid.height(),
            placement: solution.placement.clone(),
            paths: solution.paths.clone(),
            targets: grid.targets().to_vec(),
            candidates: solution.candidates,
            board: board_rows(grid, &solution.placement)?,
        })
    }
}

/// Formats a report as human-readable text.
pub fn format_report(report: &SolutionReport) -> String {
    let mut output = format!(
        "{} ({}x{}), solved after {} candidates\n\n",
        report.puzzle, report.width, report.height, report.candidates
    );
    for row in &report.board {
        output.push_str(row);
        output.push('\n');
    }
    output.push('\n');

    for (i, path) in report.paths.iter().enumerate() {
        let points: Vec<String> = path.points.iter().map(Point::to_string).collect();
        output.push_str(&format!(
            "laser {} from {} heading {}: {}\n",
            i + 1,
            path.source.origin,
            path.source.direction,
            points.join(" ")
        ));
    }
    output
}

/// Path of the JSON report for `puzzle` inside `dir`.
pub fn report_path(dir: &Path, puzzle: &str) -> PathBuf {
    dir.join(format!("{puzzle}.solution.json"))
}

/// Writes the text and JSON forms of a report; returns the JSON path.
pub fn save(dir: &Path, report: &SolutionReport) -> std::io::Result<PathBuf> {
    save_text(dir, report)?;
    save_json(dir, report)
}

fn save_text(dir: &Path, report: &SolutionReport) -> std::io::Result<()> {
    let mut file = File::create(dir.join(format!("{}.solution.txt", report.puzzle)))?;
    file.write_all(format_report(report).as_bytes())
}

fn save_json(dir: &Path, report: &SolutionReport) -> std::io::Result<PathBuf> {
    let path = report_path(dir, &report.puzzle);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(path)
}

/// Loads a JSON report written by [`save`].
pub fn load(path: &Path) -> std::io::Result<SolutionReport> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
