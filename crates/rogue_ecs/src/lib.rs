//! # rogue_ecs
//!
//! Entities, components, and the grouped registry that gameplay rules query.
//!
//! This crate provides:
//!
//! - [`Entity`]: a named object with a process-unique [`EntityId`] and an
//!   ordered list of components.
//! - [`Component`]: the open capability trait every component implements;
//!   callers look components up by concrete type and/or name.
//! - [`PropertyBag`]: the schemaless component that carries gameplay state
//!   as JSON-like key/value properties.
//! - [`EntityRegistry`]: named, ordered [`EntityGroup`]s plus the spatial
//!   predicates (point uniqueness, overlap, adjacency, viewport).

pub mod component;
pub mod entity;
pub mod group;
pub mod registry;

pub use component::{Component, ComponentError, POSITION_PROPERTY, PropertyBag};
pub use entity::{Entity, EntityId};
pub use group::{EntityGroup, GroupName};
pub use registry::{BlockedPoint, EntityRegistry, ViewportEntity};
