//! Cellular-automaton level generation.
//!
//! Generation is two phases:
//!
//! 1. **Random fill**: each cell independently becomes floor when a roll in
//!    `[1, roll_max]` exceeds `floor_threshold` (≈52% floor by default).
//! 2. **Smoothing**: each pass counts the wall-like cells in every 3×3
//!    neighbourhood (the cell itself included). More than four makes the cell
//!    a wall, otherwise floor. Anything outside the interior
//!    `[1, height-2] × [1, width-2]` counts as wall-like regardless of its
//!    value, so the border always closes up.
//!
//! Each pass reads a snapshot of the previous grid and writes a fresh one, so
//! the result does not depend on iteration order.
//!
//! No connectivity pass is run; disconnected floor pockets are expected.

use std::collections::HashSet;

use rogue_core::{Grid, Point, RandomSource};
use tracing::{debug, trace, warn};

use crate::config::GeneratorConfig;
use crate::error::MapError;
use crate::{FLOOR, WALL};

/// Generate a `height × width` wall/floor grid.
pub fn generate(
    width: usize,
    height: usize,
    config: &GeneratorConfig,
    rng: &mut impl RandomSource,
) -> Result<Grid<i32>, MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::EmptyGrid);
    }

    let mut grid = random_fill(width, height, config, rng);
    for pass in 0..config.smoothing_passes {
        grid = smooth(&grid);
        trace!(pass, "smoothing pass complete");
    }

    debug!(
        width,
        height,
        passes = config.smoothing_passes,
        floor_cells = grid.cells().iter().filter(|&&c| c == FLOOR).count(),
        "generated map"
    );
    Ok(grid)
}

/// Fill a fresh grid with independent wall/floor rolls.
#[must_use]
pub fn random_fill(
    width: usize,
    height: usize,
    config: &GeneratorConfig,
    rng: &mut impl RandomSource,
) -> Grid<i32> {
    let mut grid = Grid::new(height, width, WALL);
    for row in 0..height {
        for col in 0..width {
            if rng.random_int(1, config.roll_max) > config.floor_threshold {
                grid[(row, col)] = FLOOR;
            }
        }
    }
    grid
}

/// Count wall-like cells in the 3×3 neighbourhood centred on `(row, col)`.
///
/// Cells outside the interior band count as walls whatever they hold.
#[must_use]
pub fn neighbor_wall_count(grid: &Grid<i32>, row: usize, col: usize) -> usize {
    let rows = grid.rows() as i64;
    let cols = grid.cols() as i64;
    let (row, col) = (row as i64, col as i64);

    let mut walls = 0;
    for r in row - 1..=row + 1 {
        for c in col - 1..=col + 1 {
            let interior = r >= 1 && c >= 1 && r < rows - 1 && c < cols - 1;
            if !interior || grid[(r as usize, c as usize)] == WALL {
                walls += 1;
            }
        }
    }
    walls
}

/// Run one smoothing pass, returning the new grid.
#[must_use]
pub fn smooth(grid: &Grid<i32>) -> Grid<i32> {
    let mut next = Grid::new(grid.rows(), grid.cols(), WALL);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            next[(row, col)] = if neighbor_wall_count(grid, row, col) > 4 {
                WALL
            } else {
                FLOOR
            };
        }
    }
    next
}

/// Pick a uniformly random cell whose value is not in `excluded`.
///
/// Makes at most `rows * cols` draws.
pub fn random_point_excluding(
    grid: &Grid<i32>,
    excluded: &HashSet<i32>,
    rng: &mut impl RandomSource,
) -> Result<Point, MapError> {
    if grid.is_empty() {
        return Err(MapError::EmptyGrid);
    }

    let attempts = grid.rows() * grid.cols();
    for _ in 0..attempts {
        let row = rng.random_int(0, grid.rows() as i32 - 1);
        let col = rng.random_int(0, grid.cols() as i32 - 1);
        let point = Point::new(col, row);
        if !excluded.contains(grid.at(point)?) {
            return Ok(point);
        }
    }

    warn!(attempts, "random point search exhausted");
    Err(MapError::NoPointFound { attempts })
}
