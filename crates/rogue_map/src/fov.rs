//! Radial field of view.
//!
//! One ray per whole degree is marched outward from the observer in unit
//! steps. Every cell a ray lands on (coordinates truncated toward zero) is
//! marked [`VISIBLE`]; a ray stops after marking the first wall it lands on,
//! or when it leaves the grid. Walls are therefore revealed at the point of
//! occlusion rather than hidden.
//!
//! Cost is `O(360 × max(width, height))` per call. Callers should only
//! recompute when the observer moves. Rays can leave single-cell gaps at
//! long range.

use glam::DVec2;
use rogue_core::{Grid, Point};

use crate::{UNSEEN, VISIBLE, WALL};

/// Number of rays cast per call, one per degree.
pub const RAY_COUNT: u32 = 360;

/// Compute which cells of `cells` are visible from `observer`.
///
/// The result has the same dimensions as `cells`. The observer's own cell is
/// always visible. An observer outside the grid sees nothing.
#[must_use]
pub fn compute_visibility(cells: &Grid<i32>, observer: Point) -> Grid<i32> {
    let mut visible = Grid::new(cells.rows(), cells.cols(), UNSEEN);
    if !cells.contains_point(observer) {
        return visible;
    }
    visible[(observer.y as usize, observer.x as usize)] = VISIBLE;

    let origin = DVec2::new(f64::from(observer.x), f64::from(observer.y));
    let width = cells.cols() as f64;
    let height = cells.rows() as f64;

    for degree in 0..RAY_COUNT {
        let step = DVec2::from_angle(f64::from(degree).to_radians());
        let mut ray = origin + step;

        while ray.x >= 0.0 && ray.x < width && ray.y >= 0.0 && ray.y < height {
            let cell = (ray.y as usize, ray.x as usize);
            visible[cell] = VISIBLE;
            if cells[cell] == WALL {
                break;
            }
            ray += step;
        }
    }

    visible
}
