//! Configuration module - bounding box and session settings
//!
//! Both structs are immutable for the lifetime of a game. The binary layers
//! defaults, environment and command line on top of each other and calls
//! [`GameConfig::validate`] once before building a session.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    DEFAULT_BOX_DEPTH, DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, DEFAULT_SPLIT_X, DEFAULT_SPLIT_Y,
    DEFAULT_SPLIT_Z, DEFAULT_STEP_MS, SPAWN_DEPTH,
};

/// Smallest grid on which every shape template fits at the spawn point.
pub const MIN_SPLIT_X: i32 = 2;
pub const MIN_SPLIT_Y: i32 = 3;
pub const MIN_SPLIT_Z: i32 = SPAWN_DEPTH + 1;

/// Largest grid accepted; keeps the cell count in `i32` and the drawn box on a terminal.
pub const MAX_SPLIT_X: i32 = 256;
pub const MAX_SPLIT_Y: i32 = 256;
pub const MAX_SPLIT_Z: i32 = 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("split_{axis} must be at least {min}, got {value}")]
    SplitTooSmall { axis: char, min: i32, value: i32 },

    #[error("split_{axis} must be at most {max}, got {value}")]
    SplitTooLarge { axis: char, max: i32, value: i32 },

    #[error("step interval must be positive")]
    ZeroStep,

    #[error("box {name} must be positive, got {value}")]
    NonPositiveExtent { name: &'static str, value: f32 },
}

/// Physical extent and grid resolution of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub split_x: i32,
    pub split_y: i32,
    pub split_z: i32,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOX_WIDTH,
            height: DEFAULT_BOX_HEIGHT,
            depth: DEFAULT_BOX_DEPTH,
            split_x: DEFAULT_SPLIT_X,
            split_y: DEFAULT_SPLIT_Y,
            split_z: DEFAULT_SPLIT_Z,
        }
    }
}

impl BoxConfig {
    /// Box with default extents and the given grid resolution.
    pub fn with_splits(split_x: i32, split_y: i32, split_z: i32) -> Self {
        Self {
            split_x,
            split_y,
            split_z,
            ..Self::default()
        }
    }

    pub fn dims(&self) -> IVec3 {
        IVec3::new(self.split_x, self.split_y, self.split_z)
    }

    /// Edge length of one cell in scene units.
    pub fn cell_size(&self) -> f32 {
        self.width / self.split_x as f32
    }

    /// Where new pieces appear, before their offsets are applied.
    pub fn spawn_position(&self) -> IVec3 {
        IVec3::new(
            self.split_x / 2 - 1,
            self.split_y / 2 - 1,
            self.split_z - SPAWN_DEPTH,
        )
    }
}

/// Settings of one game session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub bounding_box: BoxConfig,
    /// Milliseconds between two automatic descents
    pub step_ms: u32,
    /// Seed of the shape generator
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bounding_box: BoxConfig::default(),
            step_ms: DEFAULT_STEP_MS,
            seed: 1,
        }
    }
}

impl GameConfig {
    pub fn with_splits(split_x: i32, split_y: i32, split_z: i32) -> Self {
        Self {
            bounding_box: BoxConfig::with_splits(split_x, split_y, split_z),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounding_box;
        for (axis, min, max, value) in [
            ('x', MIN_SPLIT_X, MAX_SPLIT_X, b.split_x),
            ('y', MIN_SPLIT_Y, MAX_SPLIT_Y, b.split_y),
            ('z', MIN_SPLIT_Z, MAX_SPLIT_Z, b.split_z),
        ] {
            if value < min {
                return Err(ConfigError::SplitTooSmall { axis, min, value });
            }
            if value > max {
                return Err(ConfigError::SplitTooLarge { axis, max, value });
            }
        }
        for (name, value) in [("width", b.width), ("height", b.height), ("depth", b.depth)] {
            // NaN fails this comparison too.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveExtent { name, value });
            }
        }
        if self.step_ms == 0 {
            return Err(ConfigError::ZeroStep);
        }
        Ok(())
    }
}
