//! Adapter runtime integration.
//!
//! Bridges the synchronous frame loop with the async TCP server. The server
//! runs on its own tokio runtime; the frame loop only touches the two channel
//! ends held here, so the simulation never leaves its thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use arrayvec::ArrayVec;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::MAX_ACTIONS_PER_COMMAND;
use crate::server::{run_server_with_stats, ServerConfig, ServerState};
use crate::types::{CameraHint, GameAction};

/// Command delivered to the frame loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// Actions from the controller, applied in order
    Actions(ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>),
    /// Camera hint from any client
    Camera(CameraHint),
    /// A streaming client just joined and wants the current state
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// Sent to every client that asked for observations
    Broadcast { line: String },
}

/// Connection counters shared between the server tasks and the frame loop.
#[derive(Debug, Default)]
pub struct AdapterStats {
    clients: AtomicUsize,
    /// Controller id, 0 when nobody controls
    controller: AtomicUsize,
}

impl AdapterStats {
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<usize> {
        match self.controller.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }

    pub(crate) fn set_client_count(&self, n: usize) {
        self.clients.store(n, Ordering::Relaxed);
    }

    pub(crate) fn set_controller(&self, id: Option<usize>) {
        self.controller.store(id.unwrap_or(0), Ordering::Relaxed);
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    stats: Arc<AdapterStats>,
}

impl Adapter {
    /// Start the adapter with settings from the environment.
    ///
    /// Returns `Ok(None)` if `VOXEL_TETRIS_AI_DISABLED` is set.
    pub fn start_from_env(configure: impl FnOnce(&mut ServerConfig)) -> Result<Option<Self>> {
        if ServerState::is_disabled() {
            info!("remote adapter disabled via VOXEL_TETRIS_AI_DISABLED");
            return Ok(None);
        }
        let mut config = ServerConfig::from_env();
        configure(&mut config);
        Self::start(config).map(Some)
    }

    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let stats = Arc::new(AdapterStats::default());

        let rt = Runtime::new()?;
        let server_stats = Arc::clone(&stats);
        rt.spawn(async move {
            if let Err(e) = run_server_with_stats(config, cmd_tx, out_rx, server_stats, None).await {
                warn!(error = %e, "remote adapter stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            stats,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }
}
