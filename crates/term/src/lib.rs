//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders into a
//! plain framebuffer that is then diffed and flushed to the terminal, which
//! gives precise control over the aspect ratio (two columns per grid cell).
//!
//! Nothing in here feeds back into the simulation: the view reads
//! [`core::GameSnapshot`]s and camera hints only.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use voxel_tetris_core as core;
pub use voxel_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{layer_color, AdapterStatusView, AnchorY, Elevation, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
