//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s. Every key
//! press is one action; there is no auto-repeat handling beyond what the
//! terminal itself sends.

pub mod map;

pub use voxel_tetris_types as types;

pub use map::{handle_key_event, should_cycle_view, should_quit};
