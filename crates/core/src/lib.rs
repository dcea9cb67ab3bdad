//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on terminals, networking, or I/O:
//!
//! - **Deterministic**: Same seed produces the same shape sequence
//! - **Single-owner**: One [`Game`] owns its board and piece; nothing is shared
//! - **Portable**: Runs headless, in the terminal, or behind the TCP adapter
//!
//! # Module Structure
//!
//! - [`board`]: voxel occupancy grid with collision tests and layer clearing
//! - [`game`]: one session: current piece, spawning, landing, timing, events
//! - [`piece`]: the falling block and its 3D rotation
//! - [`shapes`]: the five piece templates
//! - [`geometry`]: Euler rotation matrices and grid rounding
//! - [`scoring`]: layer-clear bonus and the score sink
//! - [`rng`]: seeded uniform shape selection
//! - [`clock`]: fixed-timestep accumulator
//!
//! # Game Rules
//!
//! - Pieces spawn five layers below the lid and fall one layer per step
//! - A piece lands when it reaches the floor or rests on settled cells
//! - Every full horizontal layer is removed and everything above drops one layer
//! - Several layers in one landing compound the bonus (1, 3, 7, 15, ...) x 1000 points
//! - The game ends when a new piece cannot be placed
//!
//! # Example
//!
//! ```
//! use voxel_tetris_core::Game;
//! use voxel_tetris_types::{GameAction, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default());
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateZPos);
//!
//! // Three seconds of play: the piece has fallen (at most) three layers.
//! game.advance(3001);
//! assert!(!game.game_over());
//! ```

pub mod board;
pub mod clock;
pub mod game;
pub mod geometry;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use voxel_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LayerClear};
pub use clock::StepAccumulator;
pub use game::{Game, MoveOutcome, RotateOutcome};
pub use piece::Piece;
pub use rng::{ShapeGenerator, SimpleRng};
pub use scoring::{bonus_for_layers, next_bonus, Score, ScoreSink};
pub use shapes::{get_shape, template, Shape};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
