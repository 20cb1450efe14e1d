//! # rogue_core
//!
//! Leaf primitives for the roguelike simulation core.
//!
//! This crate provides:
//!
//! - [`Grid`]: dense, bounds-checked 2D container indexed `(row, col)`.
//! - [`Point`], [`Size`], [`Direction`], [`Viewport`]: integer geometry.
//! - [`RandomSource`]: inclusive integer draws, with a deterministic
//!   [`SeededRng`] and the process-wide [`GlobalRng`].
//! - [`GridError`]: out-of-bounds access.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod rng;

pub use error::GridError;
pub use geometry::{Direction, ParseDirectionError, Point, Size, Viewport};
pub use grid::Grid;
pub use rng::{GlobalRng, RandomSource, SeededRng, seed_global};
