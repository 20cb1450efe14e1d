//! Named, insertion-ordered entity groups.

use std::fmt;

use crate::entity::{Entity, EntityId};

/// The conventional groups a level is populated with. Any string is a valid
/// group name; these only fix the spelling the game rules use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupName {
    Player,
    Mobs,
    Items,
    Other,
}

impl GroupName {
    pub const ALL: [GroupName; 4] = [
        GroupName::Player,
        GroupName::Mobs,
        GroupName::Items,
        GroupName::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GroupName::Player => "player",
            GroupName::Mobs => "mobs",
            GroupName::Items => "items",
            GroupName::Other => "other",
        }
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered sequence of entities sharing a group name.
#[derive(Debug)]
pub struct EntityGroup {
    name: String,
    entities: Vec<Entity>,
}

impl EntityGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Append an entity, returning its id.
    pub fn push(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.entities.push(entity);
        id
    }

    /// Remove the entity with `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(pos))
    }

    pub fn find(&self, predicate: impl Fn(&Entity) -> bool) -> Option<&Entity> {
        self.entities.iter().find(|e| predicate(e))
    }

    pub fn find_mut(&mut self, predicate: impl Fn(&Entity) -> bool) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| predicate(e))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }
}

impl<'a> IntoIterator for &'a EntityGroup {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name_spelling() {
        let names: Vec<_> = GroupName::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(names, vec!["player", "mobs", "items", "other"]);
        assert_eq!(GroupName::Mobs.to_string(), "mobs");
    }

    #[test]
    fn test_push_and_remove_preserve_order() {
        let mut group = EntityGroup::new("mobs");
        let a = group.push(Entity::new("a"));
        let b = group.push(Entity::new("b"));
        let c = group.push(Entity::new("c"));
        assert_eq!(group.len(), 3);

        let removed = group.remove(b).unwrap();
        assert_eq!(removed.name(), "b");
        let order: Vec<_> = group.iter().map(Entity::id).collect();
        assert_eq!(order, vec![a, c]);

        assert!(group.remove(b).is_none());
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut group = EntityGroup::new("items");
        let first = group.push(Entity::new("potion"));
        group.push(Entity::new("potion"));
        assert_eq!(group.find(|e| e.name() == "potion").map(Entity::id), Some(first));
        assert!(group.find(|e| e.name() == "sword").is_none());
    }
}
