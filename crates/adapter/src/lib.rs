//! Remote adapter: drive the game over a TCP socket with a JSON protocol
//!
//! External agents connect, handshake, and then either control the active
//! piece or watch the game. The frame loop stays synchronous; the server runs
//! on its own tokio runtime and talks to it through channels (see [`runtime`]).
//!
//! # Protocol Overview
//!
//! **Line-delimited JSON** over TCP, one object per line:
//!
//! 1. **Connection**: client connects (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server answers `welcome` with its role
//! 3. **Controller Assignment**: the first client to hello becomes controller;
//!    when it leaves, the lowest remaining id is promoted
//! 4. **Commanding**: the controller sends `command` with a list of actions
//! 5. **Observation Streaming**: clients that asked for it receive an
//!    `observation` whenever the game emits events
//!
//! Any handshaken client may send `camera` to move the side view.
//!
//! # Environment Variables
//!
//! - `VOXEL_TETRIS_AI_HOST`: bind address (default: "127.0.0.1")
//! - `VOXEL_TETRIS_AI_PORT`: port number (default: 7878)
//! - `VOXEL_TETRIS_AI_MAX_PENDING`: inbound queue depth (default: 10)
//! - `VOXEL_TETRIS_AI_DISABLED`: "1" or "true" disables the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! C: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! S: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller","board":{"split_x":6,"split_y":6,"split_z":20}}
//! S: {"type":"observation","seq":1,"ts":...,"dims":[6,6,20],"cells":[...],"active":{...},"score":0,...,"events":[]}
//! C: {"type":"command","seq":2,"ts":0,"actions":["moveLeft","rotateZPos","drop"]}
//! S: {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use voxel_tetris_core as core;
pub use voxel_tetris_types as types;

pub use protocol::*;
pub use runtime::{Adapter, AdapterStats, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, run_server_with_stats, ServerConfig, ServerState, DEFAULT_PORT};
