//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for [`generate`](crate::generate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of smoothing passes run after the random fill.
    pub smoothing_passes: usize,
    /// A cell starts as floor when its roll in `[1, roll_max]` exceeds this.
    pub floor_threshold: i32,
    /// Upper bound of the per-cell roll.
    pub roll_max: i32,
}

impl GeneratorConfig {
    /// Override the number of smoothing passes.
    #[must_use]
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.smoothing_passes = passes;
        self
    }

    /// Override the floor threshold.
    #[must_use]
    pub fn with_floor_threshold(mut self, threshold: i32) -> Self {
        self.floor_threshold = threshold;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            smoothing_passes: 10,
            floor_threshold: 48,
            roll_max: 100,
        }
    }
}
