//! # rogue_map
//!
//! Everything that reads or produces a map grid.
//!
//! This crate provides:
//!
//! - [`generator`]: random fill plus cellular-automaton smoothing.
//! - [`fov`]: 360-ray field of view.
//! - [`path`]: 4-connected A* with a caller-chosen traversability rule.
//! - [`map`]: [`MapInfo`] (cells + visibility) and the [`MapLibrary`] of
//!   named levels.
//!
//! ## Cell values
//!
//! Map cells are plain `i32`s: [`WALL`] (0), [`FLOOR`] (1), and [`VOID`] (9,
//! an opaque "unseen/void" marker some consumers use). Visibility cells are
//! [`UNSEEN`] (0) or non-zero for seen.

pub mod config;
pub mod error;
pub mod fov;
pub mod generator;
pub mod map;
pub mod path;

pub use config::GeneratorConfig;
pub use error::MapError;
pub use fov::compute_visibility;
pub use generator::{generate, neighbor_wall_count, random_fill, random_point_excluding, smooth};
pub use map::{MapInfo, MapLibrary};
pub use path::{find_path, find_path_with};

/// Impassable, opaque cell.
pub const WALL: i32 = 0;
/// Open cell.
pub const FLOOR: i32 = 1;
/// Distinguished "void" value. Carried through untouched.
pub const VOID: i32 = 9;

/// Visibility value for a cell no ray has reached.
pub const UNSEEN: i32 = 0;
/// Visibility value written for cells a ray reached.
pub const VISIBLE: i32 = 1;
