//! The [`Component`] trait and the schemaless [`PropertyBag`].
//!
//! Components are an open set: the registry never enumerates kinds. Any
//! `'static` type implementing [`Component`] can be attached to an entity and
//! found again by concrete type, by name, or both.
//!
//! In practice gameplay state lives in [`PropertyBag`]s: dynamic maps of
//! named properties (`int`, `float`, `bool`, `string`, or nested bags),
//! stored as [`serde_json::Value`] so rule code can shape them freely.

use std::any::Any;
use std::fmt;

use rogue_core::Point;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Property holding an entity's map position as `{ "x": col, "y": row }`.
pub const POSITION_PROPERTY: &str = "position_component";

/// Errors raised when reading typed values out of a [`PropertyBag`].
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// The requested property does not exist.
    #[error("property does not exist: {0}")]
    MissingProperty(String),

    /// The property exists but does not have the requested shape.
    #[error("property '{name}' has an unexpected type: {source}")]
    InvalidProperty {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A bag was built from a JSON value that is not an object.
    #[error("component '{0}' must be built from a JSON object")]
    NotAnObject(String),
}

/// A piece of data attached to an [`Entity`](crate::Entity).
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use rogue_ecs::{Component, Entity};
/// use uuid::Uuid;
///
/// #[derive(Debug)]
/// struct Sprite {
///     id: Uuid,
///     sheet: String,
///     index: u32,
/// }
///
/// impl Component for Sprite {
///     fn name(&self) -> &str { "sprite" }
///     fn id(&self) -> Uuid { self.id }
///     fn as_any(&self) -> &dyn Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// }
///
/// let mut entity = Entity::new("bat");
/// entity.add_component(Sprite { id: Uuid::new_v4(), sheet: "mobs".into(), index: 3 });
/// assert_eq!(entity.find_first_component::<Sprite>().map(|s| s.index), Some(3));
/// ```
pub trait Component: Any + fmt::Debug + Send + Sync {
    /// The component's name. Several components on one entity may share it.
    fn name(&self) -> &str;

    /// Unique identifier of this component instance.
    fn id(&self) -> Uuid;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A named, schemaless bag of properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBag {
    id: Uuid,
    name: String,
    properties: Map<String, Value>,
}

impl PropertyBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            properties: Map::new(),
        }
    }

    /// Build a bag from a JSON object. Nested objects are copied, not shared.
    pub fn from_json(name: impl Into<String>, value: Value) -> Result<Self, ComponentError> {
        let name = name.into();
        match value {
            Value::Object(properties) => Ok(Self {
                id: Uuid::new_v4(),
                name,
                properties,
            }),
            _ => Err(ComponentError::NotAnObject(name)),
        }
    }

    /// Builder-style property insertion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Raw access to a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Read a property as `T`.
    pub fn property<T: DeserializeOwned>(&self, key: &str) -> Result<T, ComponentError> {
        let value = self
            .properties
            .get(key)
            .ok_or_else(|| ComponentError::MissingProperty(key.to_string()))?;
        T::deserialize(value).map_err(|source| ComponentError::InvalidProperty {
            name: key.to_string(),
            source,
        })
    }

    /// Set a property, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key.into(), value.into())
    }

    /// Remove a property, returning it.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    #[must_use]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }

    /// The position stored under [`POSITION_PROPERTY`], if well formed.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        let position = self.properties.get(POSITION_PROPERTY)?;
        let x = i32::try_from(position.get("x")?.as_i64()?).ok()?;
        let y = i32::try_from(position.get("y")?.as_i64()?).ok()?;
        Some(Point::new(x, y))
    }

    /// Store `point` under [`POSITION_PROPERTY`].
    pub fn set_position(&mut self, point: Point) {
        self.set(POSITION_PROPERTY, serde_json::json!({ "x": point.x, "y": point.y }));
    }
}

impl Component for PropertyBag {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
