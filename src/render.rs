//! PNG drawing of solved boards using `image`.
//!
//! Each cell is a `BLOCK_SIZE` square filled by its board token, with black
//! grid lines between cells. Laser origins are drawn as small orange dots and
//! targets as larger purple ones, centred on their lattice points.

use std::path::{Path, PathBuf};

use image::{ImageResult, Rgba, RgbaImage};

use crate::geometry::Point;
use crate::persistence::SolutionReport;

/// Side of one cell in pixels.
pub const BLOCK_SIZE: u32 = 100;

const GRID_LINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LASER: Rgba<u8> = Rgba([255, 140, 0, 255]);
const TARGET: Rgba<u8> = Rgba([128, 0, 128, 255]);

const LASER_RADIUS: i64 = 5;
const TARGET_RADIUS: i64 = 10;

/// Fill colour for a board token.
fn token_color(token: &str) -> Rgba<u8> {
    match token {
        "A" => Rgba([0, 102, 204, 255]), // blue
        "B" => Rgba([204, 0, 0, 255]),   // red
        "C" => Rgba([0, 204, 0, 255]),   // green
        "x" => Rgba([51, 51, 51, 255]),  // dark grey
        _ => Rgba([255, 255, 153, 255]), // pale yellow
    }
}

/// Draws the board, laser origins and targets of a report.
///
/// Pixel coordinates:
/// - cell `(cx, cy)` covers `cx * BLOCK_SIZE..(cx + 1) * BLOCK_SIZE` across and
///   the same range down from `cy`;
/// - lattice point `(x, y)` sits at pixel `(x * BLOCK_SIZE / 2, y * BLOCK_SIZE / 2)`.
pub fn render(report: &SolutionReport) -> RgbaImage {
    let columns = u32::try_from(report.width).unwrap_or(0);
    let rows = u32::try_from(report.height).unwrap_or(0);
    let mut image = RgbaImage::new(
        columns.saturating_mul(BLOCK_SIZE),
        rows.saturating_mul(BLOCK_SIZE),
    );

    for (cy, row) in (0..rows).zip(&report.board) {
        for (cx, token) in (0..columns).zip(row.split_whitespace()) {
            fill_block(&mut image, cx, cy, token_color(token));
        }
    }

    for (px, py, pixel) in image.enumerate_pixels_mut() {
        if px % BLOCK_SIZE == 0 || py % BLOCK_SIZE == 0 {
            *pixel = GRID_LINE;
        }
    }

    for path in &report.paths {
        fill_disc(&mut image, path.source.origin, LASER_RADIUS, LASER);
    }
    for &target in &report.targets {
        fill_disc(&mut image, target, TARGET_RADIUS, TARGET);
    }

    image
}

/// Renders a report and writes it as `<puzzle>.png` inside `dir`.
pub fn save_png(dir: &Path, report: &SolutionReport) -> ImageResult<PathBuf> {
    let path = dir.join(format!("{}.png", report.puzzle));
    render(report).save(&path)?;
    Ok(path)
}

fn fill_block(image: &mut RgbaImage, cx: u32, cy: u32, color: Rgba<u8>) {
    let (left, top) = (cx * BLOCK_SIZE, cy * BLOCK_SIZE);
    for py in top..top + BLOCK_SIZE {
        for px in left..left + BLOCK_SIZE {
            image.put_pixel(px, py, color);
        }
    }
}

/// Fills a disc around a lattice point, clipped to the image.
fn fill_disc(image: &mut RgbaImage, point: Point, radius: i64, color: Rgba<u8>) {
    let half = i64::from(BLOCK_SIZE / 2);
    let (centre_x, centre_y) = (i64::from(point.x) * half, i64::from(point.y) * half);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (Ok(px), Ok(py)) = (u32::try_from(centre_x + dx), u32::try_from(centre_y + dy))
            else {
                continue;
            };
            if px < image.width() && py < image.height() {
                image.put_pixel(px, py, color);
            }
        }
    }
}
