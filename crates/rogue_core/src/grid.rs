//! Dense 2D grid.
//!
//! [`Grid`] is the storage primitive behind map cells, visibility flags, and
//! the transient cost/parent tables of the pathfinder. Cells are stored
//! row-major in a single `Vec`, addressed as `(row, col)`.
//!
//! ## Axis convention
//!
//! Grid accessors take `(row, col)`. [`Point`] carries `x` = column and
//! `y` = row, so the point accessors ([`Grid::at`], [`Grid::set_at`]) read
//! `grid(p.y, p.x)`. Mixing the two up is the classic bug here; keep all
//! point-based access going through the `*_at` methods.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::geometry::Point;

/// A dense `rows × cols` array of `T`, fixed in size at construction.
///
/// Cloning produces an independent deep copy. Equality compares dimensions
/// and cells element-wise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    /// Value every cell is reset to by [`Grid::clear`].
    fill: T,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill.clone(); rows * cols],
            fill,
        }
    }

    /// Reset every cell to the fill value used at construction.
    pub fn clear(&mut self) {
        let fill = self.fill.clone();
        self.cells.fill(fill);
    }

    /// Build a same-shaped grid by applying `f` to every cell.
    ///
    /// The new grid's fill value is `f(fill)`.
    #[must_use]
    pub fn map<U: Clone>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            fill: f(&self.fill),
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Grid<T> {
    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if the grid has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The fill value used at construction.
    #[must_use]
    pub fn fill_value(&self) -> &T {
        &self.fill
    }

    /// Returns `true` if the signed `(row, col)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.rows as u64 && (col as u64) < self.cols as u64
    }

    /// Returns `true` if `point` (`x` = col, `y` = row) lies inside the grid.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(i64::from(point.y), i64::from(point.x))
    }

    fn offset(&self, row: i64, col: i64) -> Result<usize, GridError> {
        if self.contains(row, col) {
            Ok(row as usize * self.cols + col as usize)
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Borrow the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<&T, GridError> {
        let idx = self.offset(signed(row), signed(col))?;
        Ok(&self.cells[idx])
    }

    /// Mutably borrow the cell at `(row, col)`.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut T, GridError> {
        let idx = self.offset(signed(row), signed(col))?;
        Ok(&mut self.cells[idx])
    }

    /// Overwrite the cell at `(row, col)`, returning the previous value.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<T, GridError> {
        let idx = self.offset(signed(row), signed(col))?;
        Ok(std::mem::replace(&mut self.cells[idx], value))
    }

    /// Borrow the cell under `point`, i.e. `grid(point.y, point.x)`.
    pub fn at(&self, point: Point) -> Result<&T, GridError> {
        let idx = self.offset(i64::from(point.y), i64::from(point.x))?;
        Ok(&self.cells[idx])
    }

    /// Overwrite the cell under `point`, returning the previous value.
    pub fn set_at(&mut self, point: Point, value: T) -> Result<T, GridError> {
        let idx = self.offset(i64::from(point.y), i64::from(point.x))?;
        Ok(std::mem::replace(&mut self.cells[idx], value))
    }

    /// The cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate over `(row, col, &cell)` in row-major order.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / cols, i % cols, cell))
    }
}

/// Widen an unsigned index for bounds checking. Values past `i64::MAX` are
/// out of range for any grid and saturate.
fn signed(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Panicking access for loops whose bounds are already established.
impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.get(row, col) {
            Ok(cell) => cell,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let idx = match self.offset(signed(row), signed(col)) {
            Ok(idx) => idx,
            Err(e) => panic!("{e}"),
        };
        &mut self.cells[idx]
    }
}

impl<T: PartialEq> PartialEq for Grid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl<T: Eq> Eq for Grid<T> {}
