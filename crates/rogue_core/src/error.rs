//! Grid error types.

/// Errors raised by [`Grid`](crate::Grid) accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A `(row, col)` pair fell outside `[0, rows) × [0, cols)`.
    #[error("grid index ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },
}
