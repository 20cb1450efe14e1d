//! Map-layer error types.

use rogue_core::GridError;

/// Errors raised while generating or sampling maps.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The grid has zero rows or columns.
    #[error("map has zero area")]
    EmptyGrid,

    /// Random sampling gave up without hitting an allowed cell.
    #[error("no eligible point found after {attempts} attempts")]
    NoPointFound { attempts: usize },

    /// No map with this name is loaded.
    #[error("unknown map: {0}")]
    UnknownMap(String),

    /// An underlying grid access failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}
