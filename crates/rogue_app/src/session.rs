//! The explicit game context handed to rule code.
//!
//! A [`GameSession`] owns the level library, the entity registry, and the
//! viewport. Everything that depends on "the current map" goes through it.

use std::collections::HashSet;

use rogue_core::{Direction, Point, RandomSource, Viewport};
use rogue_ecs::{Entity, EntityId, EntityRegistry, PropertyBag, ViewportEntity};
use rogue_map::{MapError, MapInfo, MapLibrary, WALL};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;

/// Errors raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no map is current")]
    NoCurrentMap,

    #[error("no free spawn point after {attempts} attempts")]
    SpawnExhausted { attempts: usize },

    #[error(transparent)]
    Map(#[from] MapError),
}

/// One orthogonal neighbour of a queried cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjacentPoint {
    pub direction: Direction,
    pub point: Point,
    /// Wall (or off-map) with no entity standing on it.
    pub blocked: bool,
}

#[derive(Debug, Default)]
pub struct GameSession {
    config: SessionConfig,
    maps: MapLibrary,
    registry: EntityRegistry,
    viewport: Viewport,
    fov_focus: Option<Point>,
}

impl GameSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            viewport: Viewport {
                size: config.view_size,
                ..Viewport::default()
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn maps(&self) -> &MapLibrary {
        &self.maps
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The point the current visibility layer was computed from.
    #[must_use]
    pub fn fov_focus(&self) -> Option<Point> {
        self.fov_focus
    }

    #[must_use]
    pub fn current_map(&self) -> Option<&MapInfo> {
        self.maps.current()
    }

    fn require_map(&self) -> Result<&MapInfo, SessionError> {
        self.maps.current().ok_or(SessionError::NoCurrentMap)
    }

    // -- Levels --

    /// Generate a level and make it current.
    pub fn generate_map(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        rng: &mut impl RandomSource,
    ) -> Result<&MapInfo, SessionError> {
        let map = MapInfo::generate(name, width, height, &self.config.generator, rng)?;
        info!(map = name, width, height, "generated map");
        self.fov_focus = None;
        Ok(self.maps.insert(map))
    }

    /// Switch to a previously generated level.
    pub fn set_map(&mut self, name: &str) -> Result<(), SessionError> {
        self.maps.set_current(name)?;
        self.fov_focus = None;
        debug!(map = name, "switched map");
        Ok(())
    }

    /// A floor cell on the current map that no entity occupies.
    pub fn random_spawn_point(&self, rng: &mut impl RandomSource) -> Result<Point, SessionError> {
        let map = self.require_map()?;
        let excluded = HashSet::from([WALL]);
        let attempts = self.config.spawn_attempts;
        for _ in 0..attempts {
            let point = map.random_point_excluding(&excluded, rng)?;
            if self.registry.is_point_unique(point) {
                return Ok(point);
            }
        }
        warn!(attempts, "no unoccupied floor cell found");
        Err(SessionError::SpawnExhausted { attempts })
    }

    /// Place a new entity on a free floor cell of the current map.
    pub fn spawn(
        &mut self,
        group: impl AsRef<str>,
        name: &str,
        rng: &mut impl RandomSource,
    ) -> Result<EntityId, SessionError> {
        let point = self.random_spawn_point(rng)?;
        let mut entity = Entity::new(name).with_component(PropertyBag::new("properties"));
        entity.set_position(point);
        debug!(entity = name, %point, "spawned");
        Ok(self.registry.add_entity(group, entity))
    }

    // -- View --

    /// Re-centre the viewport on `focus`. Visibility is only recomputed when
    /// the focus or the map changed since the last call.
    pub fn update_viewport(&mut self, focus: Point) -> Result<(), SessionError> {
        let view_size = self.config.view_size;
        let map = self.maps.current_mut().ok_or(SessionError::NoCurrentMap)?;
        self.viewport = Viewport::follow(focus, map.size(), view_size);
        if self.fov_focus != Some(focus) {
            map.update_visibility(focus);
            self.fov_focus = Some(focus);
            debug!(%focus, "recomputed field of view");
        }
        Ok(())
    }

    #[must_use]
    pub fn is_within_viewport(&self, x: i32, y: i32) -> bool {
        self.viewport.contains(x, y)
    }

    /// The four neighbours of `(x, y)`, in [`Direction::ALL`] order.
    #[must_use]
    pub fn adjacent_points(&self, x: i32, y: i32) -> Vec<AdjacentPoint> {
        let origin = Point::new(x, y);
        Direction::ALL
            .into_iter()
            .map(|direction| {
                let point = origin.step(direction);
                let wall = self.maps.current().is_none_or(|m| m.is_point_blocked(point));
                AdjacentPoint {
                    direction,
                    point,
                    blocked: self.registry.is_point_unique(point) && wall,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn entities_in_viewport(&self) -> Vec<ViewportEntity> {
        self.registry
            .entities_in_viewport(|x, y| self.viewport.contains(x, y))
    }

    /// Walkable path on the current map; empty without a map.
    #[must_use]
    pub fn path_between(&self, start: Point, goal: Point) -> Vec<Point> {
        self.maps
            .current()
            .map(|map| map.path(start, goal))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rogue_core::SeededRng;
    use rogue_ecs::{GroupName, POSITION_PROPERTY};
    use rogue_map::FLOOR;

    use super::*;

    fn session_with_map(seed: u64, width: usize, height: usize) -> (GameSession, SeededRng) {
        let mut rng = SeededRng::new(seed);
        let mut session = GameSession::new(SessionConfig::default());
        session.generate_map("level", width, height, &mut rng).unwrap();
        (session, rng)
    }

    fn floor_cells(map: &MapInfo) -> Vec<Point> {
        map.cells()
            .indexed()
            .filter(|&(_, _, &v)| v == FLOOR)
            .map(|(row, col, _)| Point::new(col as i32, row as i32))
            .collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (mut session, _) = session_with_map(2024, 20, 20);
        let map = session.current_map().unwrap();
        let floors = floor_cells(map);

        // Two distinct floor cells joined by a walkable path.
        let (a, b) = floors
            .iter()
            .find_map(|&a| {
                floors
                    .iter()
                    .find(|&&b| b != a && !map.path(a, b).is_empty())
                    .map(|&b| (a, b))
            })
            .expect("seeded 20x20 map has a connected pair of floor cells");

        let mut player = Entity::new("player").with_component(PropertyBag::new("properties"));
        player.set_position(a);
        session.registry_mut().add_entity(GroupName::Player, player);

        assert!(!session.registry().is_point_unique(a));
        assert!(session.registry().is_point_unique(b));

        session.update_viewport(a).unwrap();
        assert!(session.current_map().unwrap().is_visible(a));

        let path = session.path_between(a, b);
        assert_eq!(path.first(), Some(&a));
        assert_eq!(path.last(), Some(&b));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_operations_without_map() {
        let mut session = GameSession::new(SessionConfig::default());
        let mut rng = SeededRng::new(1);
        assert!(matches!(
            session.random_spawn_point(&mut rng),
            Err(SessionError::NoCurrentMap)
        ));
        assert!(matches!(
            session.update_viewport(Point::ORIGIN),
            Err(SessionError::NoCurrentMap)
        ));
        assert!(session.path_between(Point::ORIGIN, Point::new(1, 0)).is_empty());
        assert!(matches!(
            session.set_map("missing"),
            Err(SessionError::Map(MapError::UnknownMap(_)))
        ));
    }

    #[test]
    fn test_spawns_land_on_distinct_floor_cells() {
        let (mut session, mut rng) = session_with_map(7, 30, 20);
        for i in 0..10 {
            session
                .spawn(GroupName::Mobs, &format!("mob{i}"), &mut rng)
                .unwrap();
        }
        let map = session.current_map().unwrap();
        let positions: HashSet<Point> = session
            .registry()
            .iter()
            .filter_map(|(_, e)| e.position())
            .collect();
        assert_eq!(positions.len(), 10);
        assert!(positions.iter().all(|&p| !map.is_point_blocked(p)));
    }

    #[test]
    fn test_removing_position_entry_frees_spawn_cell() {
        let (mut session, mut rng) = session_with_map(7, 30, 20);
        let id = session.spawn(GroupName::Player, "player", &mut rng).unwrap();
        let spawned = session
            .registry()
            .entity_by_id(GroupName::Player, id)
            .and_then(Entity::position)
            .unwrap();
        assert!(!session.registry().is_point_unique(spawned));

        let removed = session
            .registry_mut()
            .remove_component(GroupName::Player, "player", POSITION_PROPERTY);
        assert!(removed.is_some());

        let player = session.registry().entity_by_id(GroupName::Player, id).unwrap();
        assert_eq!(player.position(), None);
        assert!(session.registry().is_point_unique(spawned));
    }

    #[test]
    fn test_spawn_exhaustion_is_reported() {
        let (mut session, mut rng) = session_with_map(3, 20, 20);
        let floors = floor_cells(session.current_map().unwrap());
        for (i, p) in floors.iter().enumerate() {
            let mut e = Entity::new(format!("crate{i}")).with_component(PropertyBag::new("p"));
            e.set_position(*p);
            session.registry_mut().add_entity(GroupName::Items, e);
        }
        assert!(matches!(
            session.random_spawn_point(&mut rng),
            Err(SessionError::SpawnExhausted { attempts: 1000 })
        ));
    }

    #[test]
    fn test_viewport_recomputes_fov_only_on_focus_change() {
        let (mut session, _) = session_with_map(11, 60, 40);
        let focus = floor_cells(session.current_map().unwrap())[0];

        session.update_viewport(focus).unwrap();
        assert_eq!(session.fov_focus(), Some(focus));
        let vp = session.viewport();
        assert_eq!(vp.focus, focus);
        assert_eq!(vp.size, session.config().view_size);
        assert!(session.is_within_viewport(focus.x, focus.y));

        session.update_viewport(focus).unwrap();
        assert_eq!(session.fov_focus(), Some(focus));

        session.generate_map("level", 60, 40, &mut SeededRng::new(12)).unwrap();
        assert_eq!(session.fov_focus(), None);
    }

    #[test]
    fn test_adjacent_points_blocking() {
        let mut session = GameSession::new(SessionConfig::default());
        let mut rng = SeededRng::new(5);
        session.generate_map("level", 40, 30, &mut rng).unwrap();
        let map = session.current_map().unwrap();
        // Corner cells are always walls after smoothing.
        let adjacent = session.adjacent_points(0, 0);
        let dirs: Vec<_> = adjacent.iter().map(|a| a.direction).collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
        assert!(adjacent.iter().all(|a| a.blocked == map.is_point_blocked(a.point)));

        // Occupied cells are never reported as blocked.
        let mut ghost = Entity::new("ghost").with_component(PropertyBag::new("p"));
        ghost.set_position(Point::new(1, 0));
        session.registry_mut().add_entity(GroupName::Mobs, ghost);
        let right = session.adjacent_points(0, 0)[3];
        assert_eq!(right.point, Point::new(1, 0));
        assert!(!right.blocked);
    }

    #[test]
    fn test_entities_in_viewport_uses_current_view() {
        let (mut session, mut rng) = session_with_map(9, 100, 60);
        let player = session.spawn(GroupName::Player, "player", &mut rng).unwrap();
        let focus = session
            .registry()
            .entity_by_id(GroupName::Player, player)
            .and_then(Entity::position)
            .unwrap();
        session.update_viewport(focus).unwrap();

        let mut far = Entity::new("far").with_component(PropertyBag::new("p"));
        let vp = session.viewport();
        far.set_position(Point::new(vp.extent().x + 5, vp.extent().y + 5));
        session.registry_mut().add_entity(GroupName::Mobs, far);

        let names: Vec<_> = session
            .entities_in_viewport()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["player"]);
    }
}
