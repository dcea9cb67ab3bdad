//! Scoring module - layer-clear bonus and score accumulation
//!
//! Layers cleared in one pass compound: the bonus goes 1, 3, 7, 15, ...
//! (`bonus = 1 + 2 * bonus`) and the pass awards `LAYER_POINTS * bonus` once.

use crate::types::LAYER_POINTS;

/// Receiver of score awards
pub trait ScoreSink {
    fn add_points(&mut self, n: u32);
}

/// Monotonic score counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    points: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}

impl ScoreSink for Score {
    fn add_points(&mut self, n: u32) {
        self.points = self.points.saturating_add(n);
    }
}

/// Bonus after clearing one more layer in the same pass
#[inline]
pub fn next_bonus(bonus: u32) -> u32 {
    bonus.saturating_mul(2).saturating_add(1)
}

/// Bonus for `layers` layers cleared in one pass (2^layers - 1)
pub fn bonus_for_layers(layers: u32) -> u32 {
    (0..layers).fold(0, |b, _| next_bonus(b))
}

/// Points awarded for a final bonus
#[inline]
pub fn points_for_bonus(bonus: u32) -> u32 {
    LAYER_POINTS.saturating_mul(bonus)
}
