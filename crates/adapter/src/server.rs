//! TCP server for the remote adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use arrayvec::ArrayVec;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{info, warn};

use crate::protocol::*;
use crate::runtime::{AdapterStats, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::{CameraHint, GameAction, DEFAULT_SPLIT_X, DEFAULT_SPLIT_Y, DEFAULT_SPLIT_Z};

pub const DEFAULT_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Grid announced to clients in `welcome`
    pub board: BoardInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
            board: BoardInfo {
                split_x: DEFAULT_SPLIT_X,
                split_y: DEFAULT_SPLIT_Y,
                split_z: DEFAULT_SPLIT_Z,
            },
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("VOXEL_TETRIS_AI_HOST").unwrap_or(defaults.host);
        let port = env::var("VOXEL_TETRIS_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("VOXEL_TETRIS_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
            ..defaults
        }
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    stats: Arc<AdapterStats>,
}

impl ServerState {
    pub fn new(config: ServerConfig, stats: Arc<AdapterStats>) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            stats,
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("VOXEL_TETRIS_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    async fn with_client<R>(&self, client_id: usize, f: impl FnOnce(&mut ClientHandle) -> R) -> Option<R> {
        let mut clients = self.clients.write().await;
        clients.iter_mut().find(|c| c.id == client_id).map(f)
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        self.with_client(client_id, |c| c.handshaken)
            .await
            .unwrap_or(false)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        self.with_client(client_id, |c| match c.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                c.last_seq = Some(seq);
                true
            }
        })
        .await
        .unwrap_or(true)
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<String>,
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    run_server_with_stats(config, command_tx, out_rx, Arc::default(), ready_tx).await
}

pub async fn run_server_with_stats(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    stats: Arc<AdapterStats>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "remote adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config, stats));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.stream_observations) {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            remove_client(&state, client_id).await;
            info!(client_id, "client disconnected");
        });
    }
}

/// Serialize and queue one message for a client.
fn send_json<T: Serialize>(tx: &mpsc::UnboundedSender<String>, msg: &T) {
    match encode_line(msg) {
        Ok(line) => {
            let _ = tx.send(line);
        }
        Err(e) => warn!(error = %e, "failed to encode message"),
    }
}

fn send_error(tx: &mpsc::UnboundedSender<String>, seq: u64, code: ErrorCode, message: &str) {
    warn!(seq, ?code, reason = message, "protocol error");
    send_json(tx, &create_error(seq, code, message));
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
        state.stats.set_client_count(clients.len());
    }

    let write_task = tokio::spawn(async move {
        while let Some(mut line) = rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    send_error(&tx, hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR) {
                    let message = format!("Protocol version {} not supported", hello.protocol_version);
                    send_error(&tx, hello.seq, ErrorCode::ProtocolMismatch, &message);
                    break;
                }

                // First client to hello becomes controller.
                let role = {
                    let mut controller = state.controller.write().await;
                    match *controller {
                        None => {
                            *controller = Some(client_id);
                            state.stats.set_controller(Some(client_id));
                            info!(client_id, "client is now controller");
                            AssignedRole::Controller
                        }
                        Some(id) if id == client_id => AssignedRole::Controller,
                        Some(_) => AssignedRole::Observer,
                    }
                };

                let stream = hello.requested.stream_observations;
                state
                    .with_client(client_id, |c| {
                        c.handshaken = true;
                        c.last_seq = Some(hello.seq);
                        c.stream_observations = stream;
                    })
                    .await;
                info!(client_id, name = %hello.client.name, version = %hello.client.version, ?role, "handshake complete");

                send_json(
                    &tx,
                    &create_welcome(hello.seq, &state.config.protocol_version, client_id, role, state.config.board),
                );

                if stream {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }
            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(&tx, cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    send_error(&tx, cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(&tx, cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let actions = match map_actions(&cmd.actions) {
                    Ok(actions) => actions,
                    Err(message) => {
                        send_error(&tx, cmd.seq, ErrorCode::InvalidCommand, &message);
                        continue;
                    }
                };

                // The ack is sent by the frame loop once the actions are applied.
                let queued = command_tx.try_send(InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Actions(actions),
                });
                if queued.is_err() {
                    send_error(&tx, cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }
            Ok(ParsedMessage::Camera(cam)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(&tx, cam.seq, ErrorCode::HandshakeRequired, "Send hello before camera");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cam.seq).await {
                    send_error(&tx, cam.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                let hint = CameraHint {
                    x: cam.x,
                    y: cam.y,
                    z: cam.z,
                };
                let queued = command_tx.try_send(InboundCommand {
                    client_id,
                    seq: cam.seq,
                    payload: InboundPayload::Camera(hint),
                });
                if queued.is_err() {
                    send_error(&tx, cam.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }
            Ok(ParsedMessage::Unknown(msg)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, msg.seq).await
                {
                    send_error(&tx, msg.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                send_error(&tx, msg.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(&tx, seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
            }
        }
    }

    // Dropping the last sender ends the write task once queued lines are flushed.
    remove_client(&state, client_id).await;
    drop(tx);
    let _ = write_task.await;
    Ok(())
}

/// Remove a client and promote the lowest remaining id if it was the controller.
///
/// Idempotent: the accept loop calls it again after `handle_client` returns.
async fn remove_client(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;
    let before = clients.len();
    clients.retain(|c| c.id != client_id);
    if clients.len() == before {
        return;
    }
    state.stats.set_client_count(clients.len());

    if *controller == Some(client_id) {
        let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
        *controller = next_id;
        state.stats.set_controller(next_id);
        match next_id {
            Some(new_id) => info!(client_id = new_id, "controller promoted"),
            None => info!(client_id, "controller released"),
        }
    }
}

/// Map protocol action names into game actions.
fn map_actions(names: &[String]) -> Result<ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>, String> {
    if names.is_empty() {
        return Err("Missing actions".to_string());
    }
    let mut actions = ArrayVec::new();
    for name in names {
        let action = GameAction::from_str(name).ok_or_else(|| format!("Unknown action: {}", name))?;
        actions
            .try_push(action)
            .map_err(|_| "Too many actions".to_string())?;
    }
    Ok(actions)
}
