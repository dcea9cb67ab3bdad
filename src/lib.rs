//! Voxel Tetris (workspace facade crate).
//!
//! Re-exports the member crates under `voxel_tetris::{core,adapter,term,input,types}` so the
//! binary, integration tests and benches share one import path.

pub use voxel_tetris_adapter as adapter;
pub use voxel_tetris_core as core;
pub use voxel_tetris_input as input;
pub use voxel_tetris_term as term;
pub use voxel_tetris_types as types;
