//! # rogue_app
//!
//! The game context that ties levels and entities together, plus the
//! `rogue` command-line driver built on it.
//!
//! - [`GameSession`] owns the level library, the entity registry, and the
//!   viewport, and answers the queries rule code asks each tick.
//! - [`SessionConfig`] holds generator and view settings.

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::{AdjacentPoint, GameSession, SessionError};
