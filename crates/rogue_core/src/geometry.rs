//! Integer geometry: points, sizes, cardinal directions, and the viewport.

use std::fmt;
use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An integer map coordinate. `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point one step away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan (4-connected) distance to `other`.
    #[must_use]
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns `true` if `other` is exactly one 4-connected step away.
    #[must_use]
    pub fn is_adjacent(self, other: Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<IVec2> for Point {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point> for IVec2 {
    fn from(p: Point) -> Self {
        IVec2::new(p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A width/height pair in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cells covered, zero for degenerate sizes.
    #[must_use]
    pub fn area(self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }
}

/// One of the four cardinal movement directions.
///
/// `Up` decreases `y` (rows grow downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the order up, down, left, right.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The `(dx, dy)` of a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direction name other than `up`, `down`, `left`, or `right`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// The on-screen window into the map, centred on a focus point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left map cell shown.
    pub origin: Point,
    /// Number of cells shown.
    pub size: Size,
    /// The cell the field of view radiates from.
    pub focus: Point,
}

impl Viewport {
    /// Centre a `view`-sized window on `focus`, clamped so it never leaves a
    /// `map`-sized area. A map smaller than the view pins the origin to 0.
    #[must_use]
    pub fn follow(focus: Point, map: Size, view: Size) -> Self {
        let clamp = |centre: i32, view_len: i32, map_len: i32| {
            (centre - view_len / 2).min(map_len - view_len).max(0)
        };
        Self {
            origin: Point::new(
                clamp(focus.x, view.width, map.width),
                clamp(focus.y, view.height, map.height),
            ),
            size: view,
            focus,
        }
    }

    /// The exclusive bottom-right corner (`origin + size`).
    #[must_use]
    pub fn extent(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    /// Returns `true` if map cell `(x, y)` is shown by this viewport.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let end = self.extent();
        x >= self.origin.x && x <= end.x - 1 && y >= self.origin.y && y <= end.y - 1
    }
}
