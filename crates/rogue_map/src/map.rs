//! Map levels and the library of named levels.
//!
//! A [`MapInfo`] owns the wall/floor cells of one level plus the visibility
//! layer last computed for it. The [`MapLibrary`] keeps every generated level
//! by name and tracks which one is current.

use std::collections::HashSet;

use rogue_core::{Grid, Point, RandomSource, Size};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::MapError;
use crate::{UNSEEN, WALL, fov, generator, path};

/// One level: its cells and the current visibility layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    name: String,
    cells: Grid<i32>,
    visibility: Grid<i32>,
}

impl MapInfo {
    /// Wrap existing cells. Visibility starts all unseen.
    #[must_use]
    pub fn new(name: impl Into<String>, cells: Grid<i32>) -> Self {
        let visibility = Grid::new(cells.rows(), cells.cols(), UNSEEN);
        Self {
            name: name.into(),
            cells,
            visibility,
        }
    }

    /// Generate a fresh level with the cellular-automaton generator.
    pub fn generate(
        name: impl Into<String>,
        width: usize,
        height: usize,
        config: &GeneratorConfig,
        rng: &mut impl RandomSource,
    ) -> Result<Self, MapError> {
        let cells = generator::generate(width, height, config, rng)?;
        Ok(Self::new(name, cells))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in cells (number of columns).
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.cols()
    }

    /// Height in cells (number of rows).
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.rows()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width() as i32, self.height() as i32)
    }

    #[must_use]
    pub fn cells(&self) -> &Grid<i32> {
        &self.cells
    }

    /// Visibility from the last [`update_visibility`](Self::update_visibility).
    #[must_use]
    pub fn visibility(&self) -> &Grid<i32> {
        &self.visibility
    }

    /// The cell under `point`, or `None` off the map.
    #[must_use]
    pub fn cell_at(&self, point: Point) -> Option<i32> {
        self.cells.at(point).ok().copied()
    }

    /// Returns `true` if `point` is a wall or lies off the map.
    #[must_use]
    pub fn is_point_blocked(&self, point: Point) -> bool {
        self.cell_at(point).is_none_or(|cell| cell == WALL)
    }

    /// Returns `true` if `point` was seen by the last visibility update.
    #[must_use]
    pub fn is_visible(&self, point: Point) -> bool {
        self.visibility.at(point).is_ok_and(|&v| v != UNSEEN)
    }

    /// Recompute the visibility layer around `observer`.
    pub fn update_visibility(&mut self, observer: Point) {
        self.visibility = fov::compute_visibility(&self.cells, observer);
    }

    /// A random point whose cell value is not in `excluded`.
    pub fn random_point_excluding(
        &self,
        excluded: &HashSet<i32>,
        rng: &mut impl RandomSource,
    ) -> Result<Point, MapError> {
        generator::random_point_excluding(&self.cells, excluded, rng)
    }

    /// Shortest walkable path between two points on this level.
    #[must_use]
    pub fn path(&self, start: Point, goal: Point) -> Vec<Point> {
        path::find_path(&self.cells, start, goal)
    }
}

/// Named levels plus the name of the current one.
#[derive(Debug, Default)]
pub struct MapLibrary {
    maps: Vec<MapInfo>,
    current: Option<String>,
}

impl MapLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `map` and make it current. A map with the same name is replaced.
    pub fn insert(&mut self, map: MapInfo) -> &mut MapInfo {
        let name = map.name.clone();
        let idx = match self.maps.iter().position(|m| m.name == name) {
            Some(idx) => {
                debug!(map = %name, "replacing map");
                self.maps[idx] = map;
                idx
            }
            None => {
                self.maps.push(map);
                self.maps.len() - 1
            }
        };
        self.current = Some(name);
        &mut self.maps[idx]
    }

    /// Switch the current map.
    pub fn set_current(&mut self, name: &str) -> Result<(), MapError> {
        if self.get(name).is_none() {
            return Err(MapError::UnknownMap(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn current(&self) -> Option<&MapInfo> {
        self.get(self.current.as_deref()?)
    }

    pub fn current_mut(&mut self) -> Option<&mut MapInfo> {
        let name = self.current.clone()?;
        self.get_mut(&name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MapInfo> {
        self.maps.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MapInfo> {
        self.maps.iter_mut().find(|m| m.name == name)
    }

    /// Discard a map. Removing the current map leaves no map current.
    pub fn remove(&mut self, name: &str) -> Option<MapInfo> {
        let idx = self.maps.iter().position(|m| m.name == name)?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Some(self.maps.remove(idx))
    }

    /// Map names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.maps.iter().map(|m| m.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
