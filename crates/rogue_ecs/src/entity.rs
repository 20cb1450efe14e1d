//! Entities and their identifiers.
//!
//! An [`Entity`] is a named game object holding an ordered list of
//! components. Its [`EntityId`] is drawn from a process-wide counter at
//! construction and is never reused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rogue_core::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::{Component, PropertyBag};

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / invalid entity sentinel. Never allocated.
    pub const INVALID: EntityId = EntityId(0);

    /// Allocate the next identifier.
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game object: identifier, display name, and components.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    /// Create an entity with a fresh identifier and no components.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::next(),
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Builder-style [`add_component`](Self::add_component).
    #[must_use]
    pub fn with_component(mut self, component: impl Component) -> Self {
        self.add_component(component);
        self
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name. Not unique.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `"<name>-<id>"`, unique per entity.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.id)
    }

    // -- Component storage --

    pub fn add_component(&mut self, component: impl Component) {
        self.components.push(Box::new(component));
    }

    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    pub fn add_components(&mut self, components: impl IntoIterator<Item = Box<dyn Component>>) {
        self.components.extend(components);
    }

    /// Remove the component with instance id `id`.
    pub fn remove_component(&mut self, id: Uuid) -> Option<Box<dyn Component>> {
        let pos = self.components.iter().position(|c| c.id() == id)?;
        Some(self.components.remove(pos))
    }

    /// Remove every component called `name`. Returns how many were removed.
    pub fn remove_components_named(&mut self, name: &str) -> usize {
        let before = self.components.len();
        self.components.retain(|c| c.name() != name);
        before - self.components.len()
    }

    pub fn clear_components(&mut self) {
        self.components.clear();
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| c.as_ref())
    }

    pub fn for_each_component(&mut self, mut f: impl FnMut(&mut dyn Component)) {
        for c in &mut self.components {
            f(c.as_mut());
        }
    }

    // -- Capability lookups --

    /// First component of concrete type `T`.
    #[must_use]
    pub fn find_first_component<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// First component of type `T`, mutably.
    pub fn find_first_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// First component of type `T` called `name`.
    #[must_use]
    pub fn find_component_by_name<T: Component>(&self, name: &str) -> Option<&T> {
        self.components
            .iter()
            .filter(|c| c.name() == name)
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// First component of type `T` called `name`, mutably.
    pub fn find_component_by_name_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter(|c| c.name() == name)
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// All components of type `T` called `name`, in insertion order.
    #[must_use]
    pub fn find_components_by_name<T: Component>(&self, name: &str) -> Vec<&T> {
        self.find_components_where(|c: &T| c.name() == name)
    }

    /// All components of type `T`, in insertion order.
    #[must_use]
    pub fn find_components<T: Component>(&self) -> Vec<&T> {
        self.find_components_where(|_: &T| true)
    }

    /// All components of type `T` matching `predicate`.
    #[must_use]
    pub fn find_components_where<T: Component>(&self, predicate: impl Fn(&T) -> bool) -> Vec<&T> {
        self.components
            .iter()
            .filter_map(|c| c.as_any().downcast_ref::<T>())
            .filter(|c| predicate(c))
            .collect()
    }

    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.find_first_component::<T>().is_some()
    }

    #[must_use]
    pub fn has_component_named(&self, name: &str) -> bool {
        self.components.iter().any(|c| c.name() == name)
    }

    // -- Position --

    /// Position carried by the first property bag that has one.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.find_components::<PropertyBag>()
            .into_iter()
            .find_map(PropertyBag::position)
    }

    /// Move the entity.
    ///
    /// Writes to the bag that already holds a position, else the first bag;
    /// an entity with no bags gets a new one named `"properties"`.
    pub fn set_position(&mut self, point: Point) {
        let has_position = self
            .find_components::<PropertyBag>()
            .iter()
            .any(|bag| bag.position().is_some());

        let target = self
            .components
            .iter_mut()
            .filter_map(|c| c.as_any_mut().downcast_mut::<PropertyBag>())
            .find(|bag| !has_position || bag.position().is_some());

        match target {
            Some(bag) => bag.set_position(point),
            None => {
                let mut bag = PropertyBag::new("properties");
                bag.set_position(point);
                self.add_component(bag);
            }
        }
    }
}
