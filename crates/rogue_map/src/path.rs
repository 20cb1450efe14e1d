//! A* pathfinding on 4-connected grids.
//!
//! Steps cost 1 and the heuristic is Manhattan distance, which is admissible
//! and consistent here. The open set is a binary heap that may hold stale
//! duplicates of a cell; a neighbour is only re-pushed when its recorded cost
//! strictly improves, and an entry whose cost has since been beaten is
//! skipped when popped.
//!
//! Which cells are walkable is the caller's decision. [`find_path`] uses the
//! map convention (anything but [`WALL`]); [`find_path_with`] takes the rule
//! explicitly, e.g. `|&v| v == 0` for grids where zero marks open cells.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rogue_core::{Direction, Grid, Point};
use tracing::debug;

use crate::WALL;

/// Shortest path over a map grid, walking on every non-wall cell.
///
/// See [`find_path_with`].
#[must_use]
pub fn find_path(grid: &Grid<i32>, start: Point, goal: Point) -> Vec<Point> {
    find_path_with(grid, start, goal, |&cell| cell != WALL)
}

/// Shortest 4-connected path from `start` to `goal`, both inclusive.
///
/// Returns an empty path when either endpoint is off the grid, when `start`
/// is not traversable, or when `goal` cannot be reached.
#[must_use]
pub fn find_path_with<T>(
    grid: &Grid<T>,
    start: Point,
    goal: Point,
    is_traversable: impl FnMut(&T) -> bool,
) -> Vec<Point> {
    search(grid, start, goal, is_traversable).0
}

/// The A* loop. Also returns how many cells were expanded.
fn search<T>(
    grid: &Grid<T>,
    start: Point,
    goal: Point,
    mut is_traversable: impl FnMut(&T) -> bool,
) -> (Vec<Point>, usize) {
    if !grid.contains_point(goal) {
        return (Vec::new(), 0);
    }
    let Ok(start_cell) = grid.at(start) else {
        return (Vec::new(), 0);
    };
    if !is_traversable(start_cell) {
        return (Vec::new(), 0);
    }

    let mut cost: Grid<u32> = Grid::new(grid.rows(), grid.cols(), u32::MAX);
    let mut parent: Grid<Option<Point>> = Grid::new(grid.rows(), grid.cols(), None);
    let mut open = BinaryHeap::new();
    let mut expanded = 0usize;

    cost[cell(start)] = 0;
    open.push(Reverse((start.manhattan(goal), 0u32, start)));

    while let Some(Reverse((_, reached_at, current))) = open.pop() {
        // Superseded by a cheaper push of the same cell.
        if reached_at > cost[cell(current)] {
            continue;
        }
        if current == goal {
            let path = reconstruct(&parent, start, goal);
            debug!(%start, %goal, len = path.len(), expanded, "path found");
            return (path, expanded);
        }
        expanded += 1;

        let next_cost = reached_at + 1;
        for direction in Direction::ALL {
            let next = current.step(direction);
            let Ok(value) = grid.at(next) else {
                continue;
            };
            if !is_traversable(value) || next_cost >= cost[cell(next)] {
                continue;
            }
            cost[cell(next)] = next_cost;
            parent[cell(next)] = Some(current);
            open.push(Reverse((next_cost + next.manhattan(goal), next_cost, next)));
        }
    }

    debug!(%start, %goal, expanded, "no path");
    (Vec::new(), expanded)
}

fn cell(point: Point) -> (usize, usize) {
    (point.y as usize, point.x as usize)
}

fn reconstruct(parent: &Grid<Option<Point>>, start: Point, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parent[cell(current)] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
