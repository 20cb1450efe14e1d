//! The entity registry: named groups plus the spatial queries rule code runs
//! against entity positions.
//!
//! Absence is never an error here. Unknown groups and entities yield `None`
//! or an empty result.

use rogue_core::{Direction, Point};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::component::PropertyBag;
use crate::entity::{Entity, EntityId};
use crate::group::EntityGroup;

/// The entity occupying the cell one step from a queried point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedPoint {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub full_name: String,
    pub position: Point,
    pub direction: Direction,
}

/// An entity whose position passed a viewport test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewportEntity {
    pub group_name: String,
    pub entity_id: EntityId,
    pub name: String,
    pub full_name: String,
    pub position: Point,
}

/// Owns every entity, organised into uniquely named groups.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    groups: Vec<EntityGroup>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Groups --

    /// Fetch the group called `name`, creating it if absent.
    pub fn create_group(&mut self, name: impl AsRef<str>) -> &mut EntityGroup {
        let name = name.as_ref();
        let index = match self.groups.iter().position(|g| g.name() == name) {
            Some(index) => index,
            None => {
                debug!(group = name, "creating entity group");
                self.groups.push(EntityGroup::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    #[must_use]
    pub fn group(&self, name: impl AsRef<str>) -> Option<&EntityGroup> {
        let name = name.as_ref();
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn group_mut(&mut self, name: impl AsRef<str>) -> Option<&mut EntityGroup> {
        let name = name.as_ref();
        self.groups.iter_mut().find(|g| g.name() == name)
    }

    /// Group names in creation order.
    #[must_use]
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(EntityGroup::name).collect()
    }

    /// Entities of one group; empty if the group does not exist.
    #[must_use]
    pub fn entities_in_group(&self, name: impl AsRef<str>) -> &[Entity] {
        self.group(name).map(EntityGroup::entities).unwrap_or_default()
    }

    // -- Entities --

    /// Append `entity` to `group`, creating the group if needed.
    pub fn add_entity(&mut self, group: impl AsRef<str>, entity: Entity) -> EntityId {
        let group = self.create_group(group);
        debug!(
            group = group.name(),
            entity = %entity.full_name(),
            "adding entity"
        );
        group.push(entity)
    }

    /// Create a bare entity inside an existing group.
    ///
    /// Returns `None` when the group has not been created.
    pub fn create_entity_in_group(
        &mut self,
        group: impl AsRef<str>,
        name: impl Into<String>,
    ) -> Option<&mut Entity> {
        let group = self.group_mut(group)?;
        let id = group.push(Entity::new(name));
        group.find_mut(|e| e.id() == id)
    }

    /// Remove an entity by id. A missing group or entity is a no-op.
    pub fn remove_entity(&mut self, group: impl AsRef<str>, id: EntityId) -> Option<Entity> {
        let group = self.group_mut(group)?;
        let removed = group.remove(id);
        if let Some(entity) = &removed {
            debug!(
                group = group.name(),
                entity = %entity.full_name(),
                "removed entity"
            );
        }
        removed
    }

    /// First entity in `group` matching `predicate`, in insertion order.
    pub fn find_entity(
        &self,
        group: impl AsRef<str>,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Option<&Entity> {
        self.group(group)?.find(predicate)
    }

    pub fn find_entity_mut(
        &mut self,
        group: impl AsRef<str>,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Option<&mut Entity> {
        self.group_mut(group)?.find_mut(predicate)
    }

    /// All entities in `group` matching `predicate`, in insertion order.
    pub fn find_entities(
        &self,
        group: impl AsRef<str>,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Vec<&Entity> {
        self.entities_in_group(group)
            .iter()
            .filter(|e| predicate(e))
            .collect()
    }

    #[must_use]
    pub fn entity_by_name(&self, group: impl AsRef<str>, name: &str) -> Option<&Entity> {
        self.find_entity(group, |e| e.name() == name)
    }

    pub fn entity_by_name_mut(
        &mut self,
        group: impl AsRef<str>,
        name: &str,
    ) -> Option<&mut Entity> {
        self.find_entity_mut(group, |e| e.name() == name)
    }

    #[must_use]
    pub fn entity_by_id(&self, group: impl AsRef<str>, id: EntityId) -> Option<&Entity> {
        self.find_entity(group, |e| e.id() == id)
    }

    pub fn entity_by_id_mut(&mut self, group: impl AsRef<str>, id: EntityId) -> Option<&mut Entity> {
        self.find_entity_mut(group, |e| e.id() == id)
    }

    #[must_use]
    pub fn entity_id_by_name(&self, group: impl AsRef<str>, name: &str) -> Option<EntityId> {
        self.entity_by_name(group, name).map(Entity::id)
    }

    /// Drop the `component` entry from the first property bag of the entity
    /// called `entity_name`, returning the removed value.
    ///
    /// Whole component objects are removed with
    /// [`Entity::remove_components_named`].
    pub fn remove_component(
        &mut self,
        group: impl AsRef<str>,
        entity_name: &str,
        component: &str,
    ) -> Option<Value> {
        let bag = self
            .entity_by_name_mut(group, entity_name)?
            .find_first_component_mut::<PropertyBag>()?;
        let removed = bag.remove(component);
        if removed.is_some() {
            debug!(entity = entity_name, component, "removed component entry");
        }
        removed
    }

    /// `bag[component][key]` on the first property bag of the entity called
    /// `entity_name`.
    #[must_use]
    pub fn component_value(
        &self,
        group: impl AsRef<str>,
        entity_name: &str,
        component: &str,
        key: &str,
    ) -> Option<&Value> {
        self.entity_by_name(group, entity_name)?
            .find_first_component::<PropertyBag>()?
            .get(component)?
            .get(key)
    }

    /// Write `bag[component][key] = value` on the first property bag of the
    /// entity called `entity_name`.
    ///
    /// The component entry must already exist as an object. Returns `false`
    /// and changes nothing otherwise.
    pub fn set_component_value(
        &mut self,
        group: impl AsRef<str>,
        entity_name: &str,
        component: &str,
        key: &str,
        value: impl Into<Value>,
    ) -> bool {
        let entry = self
            .entity_by_name_mut(group, entity_name)
            .and_then(|e| e.find_first_component_mut::<PropertyBag>())
            .and_then(|bag| bag.properties_mut().get_mut(component))
            .and_then(Value::as_object_mut);
        match entry {
            Some(entry) => {
                entry.insert(key.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Total entities across all groups.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.groups.iter().map(EntityGroup::len).sum()
    }

    /// Every entity with its group name, groups in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.groups
            .iter()
            .flat_map(|g| g.iter().map(move |e| (g.name(), e)))
    }

    // -- Spatial queries --

    /// True when no entity in any group stands on `point`.
    #[must_use]
    pub fn is_point_unique(&self, point: Point) -> bool {
        !self.iter().any(|(_, e)| e.position() == Some(point))
    }

    /// Call `f` for every entity standing on `(x, y)` whose name differs
    /// from `exclude_name`.
    pub fn for_each_overlapping_point(
        &self,
        exclude_name: &str,
        x: i32,
        y: i32,
        mut f: impl FnMut(&str, &Entity),
    ) {
        let point = Point::new(x, y);
        for (group, entity) in self.iter() {
            if entity.name() != exclude_name && entity.position() == Some(point) {
                f(group, entity);
            }
        }
    }

    /// The first entity in `group` standing one step from `(x, y)` towards
    /// `direction`.
    #[must_use]
    pub fn blocked_points(
        &self,
        group: impl AsRef<str>,
        x: i32,
        y: i32,
        direction: Direction,
    ) -> Option<BlockedPoint> {
        let target = Point::new(x, y).step(direction);
        let entity = self.find_entity(group, |e| e.position() == Some(target))?;
        Some(BlockedPoint {
            entity_id: entity.id(),
            entity_name: entity.name().to_string(),
            full_name: entity.full_name(),
            position: target,
            direction,
        })
    }

    /// Entities in every group whose position satisfies `in_view`.
    pub fn entities_in_viewport(&self, in_view: impl Fn(i32, i32) -> bool) -> Vec<ViewportEntity> {
        self.iter()
            .filter_map(|(group, entity)| {
                let position = entity.position()?;
                in_view(position.x, position.y).then(|| ViewportEntity {
                    group_name: group.to_string(),
                    entity_id: entity.id(),
                    name: entity.name().to_string(),
                    full_name: entity.full_name(),
                    position,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::component::POSITION_PROPERTY;
    use crate::group::GroupName;

    fn at(name: &str, x: i32, y: i32) -> Entity {
        let mut e = Entity::new(name).with_component(PropertyBag::new("properties"));
        e.set_position(Point::new(x, y));
        e
    }

    #[test]
    fn test_create_group_is_unique() {
        let mut registry = EntityRegistry::new();
        registry.create_group(GroupName::Mobs);
        registry.create_group(GroupName::Mobs);
        registry.create_group("traps");
        assert_eq!(registry.group_names(), vec!["mobs", "traps"]);
    }

    #[test]
    fn test_add_then_remove_entity() {
        let mut registry = EntityRegistry::new();
        let id = registry.add_entity(GroupName::Mobs, at("rat", 1, 1));
        assert!(registry.entity_by_id(GroupName::Mobs, id).is_some());

        let removed = registry.remove_entity(GroupName::Mobs, id);
        assert_eq!(removed.map(|e| e.id()), Some(id));
        assert!(registry.find_entity(GroupName::Mobs, |e| e.id() == id).is_none());

        // Second removal and unknown group are no-ops.
        assert!(registry.remove_entity(GroupName::Mobs, id).is_none());
        assert!(registry.remove_entity("nowhere", id).is_none());
    }

    #[test]
    fn test_point_uniqueness_tracks_add_and_remove() {
        let mut registry = EntityRegistry::new();
        let p = Point::new(3, 4);
        assert!(registry.is_point_unique(p));

        let id = registry.add_entity(GroupName::Items, at("potion", 3, 4));
        assert!(!registry.is_point_unique(p));
        assert!(registry.is_point_unique(Point::new(4, 3)));

        registry.remove_entity(GroupName::Items, id);
        assert!(registry.is_point_unique(p));
    }

    #[test]
    fn test_find_entities_preserves_insertion_order() {
        let mut registry = EntityRegistry::new();
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|n| registry.add_entity(GroupName::Mobs, Entity::new(n)))
            .collect();
        registry.add_entity(GroupName::Items, Entity::new("x"));

        let found: Vec<_> = registry
            .find_entities(GroupName::Mobs, |_| true)
            .into_iter()
            .map(Entity::id)
            .collect();
        assert_eq!(found, ids);

        let odd: Vec<_> = registry
            .find_entities(GroupName::Mobs, |e| e.name() == "b" || e.name() == "d")
            .into_iter()
            .map(Entity::name)
            .collect();
        assert_eq!(odd, vec!["b", "d"]);
        assert!(registry.find_entities("missing", |_| true).is_empty());
    }

    #[test]
    fn test_create_entity_in_group_requires_group() {
        let mut registry = EntityRegistry::new();
        assert!(registry.create_entity_in_group(GroupName::Other, "door").is_none());

        registry.create_group(GroupName::Other);
        let id = registry
            .create_entity_in_group(GroupName::Other, "door")
            .map(|e| e.id())
            .unwrap();
        assert_eq!(registry.entity_id_by_name(GroupName::Other, "door"), Some(id));
        assert_eq!(registry.entity_count(), 1);
    }

    #[test]
    fn test_remove_component_drops_bag_entry() {
        let mut registry = EntityRegistry::new();
        registry.add_entity(GroupName::Player, at("hero", 4, 7));
        assert_eq!(
            registry.entity_by_name(GroupName::Player, "hero").and_then(Entity::position),
            Some(Point::new(4, 7))
        );

        let removed = registry.remove_component(GroupName::Player, "hero", POSITION_PROPERTY);
        assert_eq!(removed, Some(json!({ "x": 4, "y": 7 })));
        let hero = registry.entity_by_name(GroupName::Player, "hero").unwrap();
        assert_eq!(hero.position(), None);
        assert_eq!(hero.component_count(), 1);
        assert!(registry.is_point_unique(Point::new(4, 7)));

        assert!(registry.remove_component(GroupName::Player, "hero", POSITION_PROPERTY).is_none());
        assert!(registry.remove_component(GroupName::Player, "ghost", POSITION_PROPERTY).is_none());
        assert!(registry.remove_component("nowhere", "hero", POSITION_PROPERTY).is_none());
    }

    #[test]
    fn test_component_value_reads_and_writes_nested_entries() {
        let mut registry = EntityRegistry::new();
        registry.add_entity(
            GroupName::Mobs,
            Entity::new("orc").with_component(
                PropertyBag::new("properties")
                    .with("health_component", json!({ "hp": 12, "max": 12 })),
            ),
        );

        assert_eq!(
            registry.component_value(GroupName::Mobs, "orc", "health_component", "hp"),
            Some(&json!(12))
        );
        assert!(registry.set_component_value(GroupName::Mobs, "orc", "health_component", "hp", 5));
        assert_eq!(
            registry.component_value(GroupName::Mobs, "orc", "health_component", "hp"),
            Some(&json!(5))
        );
        assert!(registry.set_component_value(GroupName::Mobs, "orc", "health_component", "armor", 2));
        assert_eq!(
            registry.component_value(GroupName::Mobs, "orc", "health_component", "armor"),
            Some(&json!(2))
        );
    }

    #[test]
    fn test_component_value_absent_paths() {
        let mut registry = EntityRegistry::new();
        registry.add_entity(
            GroupName::Mobs,
            Entity::new("orc").with_component(PropertyBag::new("properties").with("speed", 3)),
        );
        registry.add_entity(GroupName::Mobs, Entity::new("bare"));

        assert!(registry.component_value(GroupName::Mobs, "orc", "health_component", "hp").is_none());
        assert!(registry.component_value(GroupName::Mobs, "orc", "speed", "hp").is_none());
        assert!(registry.component_value(GroupName::Mobs, "ghost", "speed", "hp").is_none());
        assert!(registry.component_value("nowhere", "orc", "speed", "hp").is_none());
        assert!(registry.component_value(GroupName::Mobs, "bare", "speed", "hp").is_none());

        assert!(!registry.set_component_value(GroupName::Mobs, "orc", "health_component", "hp", 1));
        assert!(!registry.set_component_value(GroupName::Mobs, "orc", "speed", "hp", 1));
        assert!(!registry.set_component_value(GroupName::Mobs, "ghost", "speed", "hp", 1));
        assert!(!registry.set_component_value(GroupName::Mobs, "bare", "speed", "hp", 1));

        let orc = registry.entity_by_name(GroupName::Mobs, "orc").unwrap();
        let bag = orc.find_first_component::<PropertyBag>().unwrap();
        assert!(!bag.contains("health_component"));
        assert_eq!(bag.property::<i32>("speed").unwrap(), 3);
    }

    #[test]
    fn test_for_each_overlapping_point_skips_excluded_name() {
        let mut registry = EntityRegistry::new();
        registry.add_entity(GroupName::Player, at("player", 2, 2));
        registry.add_entity(GroupName::Items, at("gold", 2, 2));
        registry.add_entity(GroupName::Mobs, at("rat", 2, 2));
        registry.add_entity(GroupName::Mobs, at("bat", 5, 5));

        let mut hits = Vec::new();
        registry.for_each_overlapping_point("player", 2, 2, |group, e| {
            hits.push((group.to_string(), e.name().to_string()));
        });
        assert_eq!(
            hits,
            vec![
                ("items".to_string(), "gold".to_string()),
                ("mobs".to_string(), "rat".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocked_points_looks_one_step_in_direction() {
        let mut registry = EntityRegistry::new();
        let id = registry.add_entity(GroupName::Mobs, at("orc", 5, 4));

        let hit = registry
            .blocked_points(GroupName::Mobs, 5, 5, Direction::Up)
            .unwrap();
        assert_eq!(hit.entity_id, id);
        assert_eq!(hit.entity_name, "orc");
        assert_eq!(hit.full_name, format!("orc-{id}"));
        assert_eq!(hit.position, Point::new(5, 4));
        assert_eq!(hit.direction, Direction::Up);

        assert!(registry.blocked_points(GroupName::Mobs, 5, 5, Direction::Down).is_none());
        assert!(registry.blocked_points(GroupName::Mobs, 5, 3, Direction::Down).is_some());
        assert!(registry.blocked_points(GroupName::Items, 5, 5, Direction::Up).is_none());
    }

    #[test]
    fn test_entities_in_viewport_filters_by_predicate() {
        let mut registry = EntityRegistry::new();
        registry.add_entity(GroupName::Player, at("player", 1, 1));
        registry.add_entity(GroupName::Mobs, at("rat", 8, 8));
        registry.add_entity(GroupName::Mobs, at("bat", 30, 30));
        registry.add_entity(GroupName::Other, Entity::new("nowhere"));

        let visible = registry.entities_in_viewport(|x, y| (0..10).contains(&x) && (0..10).contains(&y));
        let names: Vec<_> = visible.iter().map(|v| (v.group_name.as_str(), v.name.as_str())).collect();
        assert_eq!(names, vec![("player", "player"), ("mobs", "rat")]);
        assert_eq!(visible[1].position, Point::new(8, 8));
    }

    #[test]
    fn test_entities_in_missing_group_is_empty() {
        let registry = EntityRegistry::new();
        assert!(registry.entities_in_group("ghosts").is_empty());
        assert!(registry.entity_by_name("ghosts", "boo").is_none());
    }
}
