//! Session configuration.

use rogue_core::Size;
use rogue_map::GeneratorConfig;
use serde::{Deserialize, Serialize};

/// Settings shared by every level a [`GameSession`](crate::session::GameSession)
/// generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cellular-automaton settings for new levels.
    pub generator: GeneratorConfig,
    /// Cells shown around the focus.
    pub view_size: Size,
    /// Upper bound on draws when looking for a free spawn cell.
    pub spawn_attempts: usize,
}

impl SessionConfig {
    #[must_use]
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_view_size(mut self, width: i32, height: i32) -> Self {
        self.view_size = Size::new(width, height);
        self
    }

    #[must_use]
    pub fn with_spawn_attempts(mut self, attempts: usize) -> Self {
        self.spawn_attempts = attempts;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            view_size: Size::new(40, 20),
            spawn_attempts: 1000,
        }
    }
}
