//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! They are plain data shared by the simulation, the terminal renderer and the
//! TCP adapter, so none of them carry behaviour beyond parsing and formatting.
//!
//! # Bounding Box
//!
//! The playfield is a voxel box split into `split_x × split_y × split_z` cells:
//!
//! - **x**: 6 columns (indexed 0-5), left to right
//! - **y**: 6 rows (indexed 0-5), front to back
//! - **z**: 20 layers (indexed 0-19), floor to lid
//! - **Spawn position**: `(split_x/2 - 1, split_y/2 - 1, split_z - 5)`
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_STEP_MS` | 1000 | Time between two automatic descents |
//! | `FRAME_MS` | 16 | Frame interval of the terminal runner (~60 FPS) |
//! | `BLOCKED_FLASH_MS` | 100 | How long the box flashes after a blocked move |
//!
//! # Examples
//!
//! ```
//! use voxel_tetris_types::{GameAction, PieceCommand, ShapeKind};
//! use glam::IVec3;
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//!
//! let action = GameAction::from_str("rotateXPos").unwrap();
//! assert_eq!(action.command(), Some(PieceCommand::Rotate(IVec3::new(90, 0, 0))));
//! ```

use glam::IVec3;
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{BoxConfig, ConfigError, GameConfig};

/// Default number of cells along x
pub const DEFAULT_SPLIT_X: i32 = 6;

/// Default number of cells along y
pub const DEFAULT_SPLIT_Y: i32 = 6;

/// Default number of layers along z
pub const DEFAULT_SPLIT_Z: i32 = 20;

/// Default box extent along x, in scene units
pub const DEFAULT_BOX_WIDTH: f32 = 360.0;

/// Default box extent along y, in scene units
pub const DEFAULT_BOX_HEIGHT: f32 = 360.0;

/// Default box extent along z, in scene units
pub const DEFAULT_BOX_DEPTH: f32 = 1200.0;

/// Time between two automatic descents (1000ms = one layer per second)
pub const DEFAULT_STEP_MS: u32 = 1000;

/// Frame interval of the terminal runner
pub const FRAME_MS: u32 = 16;

/// Duration of the "blocked" box flash
pub const BLOCKED_FLASH_MS: u32 = 100;

/// Points per unit of layer bonus
pub const LAYER_POINTS: u32 = 1000;

/// New pieces appear this many layers below the lid
pub const SPAWN_DEPTH: i32 = 5;

/// Rotation increment for one key press, in degrees
pub const ROTATION_STEP_DEG: i32 = 90;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_box_and_scoring_constants() {
        assert_eq!(DEFAULT_SPLIT_X, 6);
        assert_eq!(DEFAULT_SPLIT_Y, 6);
        assert_eq!(DEFAULT_SPLIT_Z, 20);
        assert_eq!(DEFAULT_STEP_MS, 1000);
        assert_eq!(LAYER_POINTS, 1000);
        assert_eq!(DEFAULT_SPLIT_Z - SPAWN_DEPTH, 15);
    }

    #[test]
    fn action_strings_round_trip() {
        for action in GameAction::ALL {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }

    #[test]
    fn opposite_actions_cancel() {
        let pairs = [
            (GameAction::MoveRight, GameAction::MoveLeft),
            (GameAction::MoveForward, GameAction::MoveBack),
            (GameAction::RotateXPos, GameAction::RotateXNeg),
            (GameAction::RotateYPos, GameAction::RotateYNeg),
            (GameAction::RotateZPos, GameAction::RotateZNeg),
        ];
        for (a, b) in pairs {
            let sum = match (a.command(), b.command()) {
                (Some(PieceCommand::Move(x)), Some(PieceCommand::Move(y))) => x + y,
                (Some(PieceCommand::Rotate(x)), Some(PieceCommand::Rotate(y))) => x + y,
                other => panic!("mismatched commands: {:?}", other),
            };
            assert_eq!(sum, IVec3::ZERO);
        }
    }

    #[test]
    fn cell_state_codes() {
        assert_eq!(CellState::Empty.as_u8(), 0);
        assert_eq!(CellState::from_u8(CellState::Petrified.as_u8()), CellState::Petrified);
        assert_eq!(CellState::from_u8(9), CellState::Empty);
    }
}

/// The five piece templates of the catalog
///
/// - **L**: three-long bar with a foot
/// - **I**: three-long bar
/// - **O**: 2x2 square
/// - **T**: three-long bar with a centre nub
/// - **S**: staircase of two offset pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    L,
    I,
    O,
    T,
    S,
}

impl ShapeKind {
    /// Catalog order; random generation indexes into this.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::L,
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
    ];

    /// Parse shape kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "l" => Some(ShapeKind::L),
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::L => "l",
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ShapeKind::L => 0,
            ShapeKind::I => 1,
            ShapeKind::O => 2,
            ShapeKind::T => 3,
            ShapeKind::S => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// State of a single board cell
///
/// `Active` exists for renderers that paint the falling piece into a copy of the
/// grid; the board itself only ever stores `Empty` and `Petrified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    #[default]
    Empty,
    Active,
    Petrified,
}

impl CellState {
    pub fn as_u8(&self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Active => 1,
            CellState::Petrified => 2,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => CellState::Active,
            2 => CellState::Petrified,
            _ => CellState::Empty,
        }
    }
}

/// Outcome of testing a piece against the board
///
/// - **None**: the position is legal
/// - **Wall**: the position is rejected (box side, lid, or settled geometry)
/// - **Ground**: the piece rests on the floor or on settled cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionResult {
    None,
    Wall,
    Ground,
}

/// Lifecycle of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Running,
    GameOver,
}

/// What a [`GameAction`] asks the current piece to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceCommand {
    /// Translate by a cell delta
    Move(IVec3),
    /// Rotate by Euler angles in degrees
    Rotate(IVec3),
}

/// Logical input actions
///
/// Both the keyboard and remote controllers produce these. Each action except
/// `Restart` maps to exactly one move or rotate call on the current piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move one cell towards +x
    MoveRight,
    /// Move one cell towards -x
    MoveLeft,
    /// Move one cell towards +y
    MoveForward,
    /// Move one cell towards -y
    MoveBack,
    /// Move one layer down
    Drop,
    /// Rotate +90° about x
    RotateXPos,
    /// Rotate -90° about x
    RotateXNeg,
    /// Rotate +90° about y
    RotateYPos,
    /// Rotate -90° about y
    RotateYNeg,
    /// Rotate +90° about z
    RotateZPos,
    /// Rotate -90° about z
    RotateZNeg,
    /// Start a new session
    Restart,
}

impl GameAction {
    pub const ALL: [GameAction; 12] = [
        GameAction::MoveRight,
        GameAction::MoveLeft,
        GameAction::MoveForward,
        GameAction::MoveBack,
        GameAction::Drop,
        GameAction::RotateXPos,
        GameAction::RotateXNeg,
        GameAction::RotateYPos,
        GameAction::RotateYNeg,
        GameAction::RotateZPos,
        GameAction::RotateZNeg,
        GameAction::Restart,
    ];

    /// Parse action from string (for the adapter protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use voxel_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("DROP"), Some(GameAction::Drop));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveright" => Some(GameAction::MoveRight),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveforward" => Some(GameAction::MoveForward),
            "moveback" => Some(GameAction::MoveBack),
            "drop" => Some(GameAction::Drop),
            "rotatexpos" => Some(GameAction::RotateXPos),
            "rotatexneg" => Some(GameAction::RotateXNeg),
            "rotateypos" => Some(GameAction::RotateYPos),
            "rotateyneg" => Some(GameAction::RotateYNeg),
            "rotatezpos" => Some(GameAction::RotateZPos),
            "rotatezneg" => Some(GameAction::RotateZNeg),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveRight => "moveRight",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveForward => "moveForward",
            GameAction::MoveBack => "moveBack",
            GameAction::Drop => "drop",
            GameAction::RotateXPos => "rotateXPos",
            GameAction::RotateXNeg => "rotateXNeg",
            GameAction::RotateYPos => "rotateYPos",
            GameAction::RotateYNeg => "rotateYNeg",
            GameAction::RotateZPos => "rotateZPos",
            GameAction::RotateZNeg => "rotateZNeg",
            GameAction::Restart => "restart",
        }
    }

    /// The move or rotation this action performs, `None` for session actions.
    pub fn command(&self) -> Option<PieceCommand> {
        let r = ROTATION_STEP_DEG;
        match self {
            GameAction::MoveRight => Some(PieceCommand::Move(IVec3::X)),
            GameAction::MoveLeft => Some(PieceCommand::Move(IVec3::NEG_X)),
            GameAction::MoveForward => Some(PieceCommand::Move(IVec3::Y)),
            GameAction::MoveBack => Some(PieceCommand::Move(IVec3::NEG_Y)),
            GameAction::Drop => Some(PieceCommand::Move(IVec3::NEG_Z)),
            GameAction::RotateXPos => Some(PieceCommand::Rotate(IVec3::new(r, 0, 0))),
            GameAction::RotateXNeg => Some(PieceCommand::Rotate(IVec3::new(-r, 0, 0))),
            GameAction::RotateYPos => Some(PieceCommand::Rotate(IVec3::new(0, r, 0))),
            GameAction::RotateYNeg => Some(PieceCommand::Rotate(IVec3::new(0, -r, 0))),
            GameAction::RotateZPos => Some(PieceCommand::Rotate(IVec3::new(0, 0, r))),
            GameAction::RotateZNeg => Some(PieceCommand::Rotate(IVec3::new(0, 0, -r))),
            GameAction::Restart => None,
        }
    }
}

/// Camera repositioning hint from a head tracker
///
/// Units are whatever the tracker reports; only the relative magnitude of the
/// components is used to pick a view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraHint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// State change emitted by the simulation, in emission order.
///
/// Renderers and remote observers consume these; the simulation never reads
/// them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    Spawned { shape: ShapeKind, position: IVec3 },
    Moved { position: IVec3 },
    Rotated { orientation: IVec3 },
    /// A move or rotation was rejected; renderers flash the box.
    Blocked,
    Landed { cells: Vec<IVec3> },
    LayersCleared { layers: u32, bonus: u32, points: u32 },
    GameOver { score: u32 },
}
