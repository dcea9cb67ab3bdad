//! Terminal Voxel Tetris runner (default binary).
//!
//! Draws the box as two projections with a framebuffer-based renderer, reads
//! keys with crossterm and, unless disabled, serves the remote adapter so an
//! external agent can play or watch.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use voxel_tetris::adapter::{
    create_ack, create_observation, encode_line, Adapter, BoardInfo, InboundCommand,
    InboundPayload, OutboundMessage,
};
use voxel_tetris::core::{Game, GameSnapshot};
use voxel_tetris::input::{handle_key_event, should_cycle_view, should_quit};
use voxel_tetris::term::{AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, Viewport};
use voxel_tetris::types::{
    BoxConfig, GameConfig, GameEvent, DEFAULT_SPLIT_X, DEFAULT_SPLIT_Y, DEFAULT_SPLIT_Z,
    DEFAULT_STEP_MS, FRAME_MS,
};

#[derive(Parser, Debug)]
#[command(name = "voxel-tetris", version)]
#[command(about = "Falling-block puzzle played inside a voxel box")]
struct Cli {
    /// Grid cells along x
    #[arg(long, env = "VOXEL_TETRIS_SPLIT_X", default_value_t = DEFAULT_SPLIT_X)]
    split_x: i32,

    /// Grid cells along y
    #[arg(long, env = "VOXEL_TETRIS_SPLIT_Y", default_value_t = DEFAULT_SPLIT_Y)]
    split_y: i32,

    /// Grid cells along z (depth of the box)
    #[arg(long, env = "VOXEL_TETRIS_SPLIT_Z", default_value_t = DEFAULT_SPLIT_Z)]
    split_z: i32,

    /// Milliseconds between automatic descents
    #[arg(long, env = "VOXEL_TETRIS_STEP_MS", default_value_t = DEFAULT_STEP_MS)]
    step_ms: u32,

    /// Shape generator seed
    #[arg(long, env = "VOXEL_TETRIS_SEED", default_value_t = 1)]
    seed: u32,

    /// Write logs to this file (the terminal is in raw mode)
    #[arg(long, env = "VOXEL_TETRIS_LOG")]
    log_file: Option<PathBuf>,

    /// Do not start the remote adapter
    #[arg(long)]
    no_ai: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            bounding_box: BoxConfig::with_splits(self.split_x, self.split_y, self.split_z),
            step_ms: self.step_ms,
            seed: self.seed,
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(EnvFilter::from_default_env().add_directive("voxel_tetris=info".parse()?))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config();
    config.validate()?;
    info!(?config, "starting");

    let adapter = if cli.no_ai {
        None
    } else {
        let board = config.bounding_box;
        Adapter::start_from_env(|server| {
            server.board = BoardInfo {
                split_x: board.split_x,
                split_y: board.split_y,
                split_z: board.split_z,
            };
        })?
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, adapter);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: GameConfig, mut adapter: Option<Adapter>) -> Result<()> {
    let mut game = Game::new(config);
    game.start();

    let mut view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut events: Vec<GameEvent> = Vec::new();
    let mut observation_seq = 0u64;

    let frame = Duration::from_millis(u64::from(FRAME_MS));
    let mut last_step = Instant::now();

    loop {
        // Input.
        if event::poll(frame)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if should_cycle_view(key) {
                        view.cycle_elevation();
                    } else if let Some(action) = handle_key_event(key) {
                        game.apply_action(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Remote commands.
        if let Some(adapter) = adapter.as_mut() {
            while let Some(cmd) = adapter.try_recv() {
                handle_inbound(adapter, &mut game, &mut view, &mut snap, &mut observation_seq, cmd);
            }
        }

        // Clock. Whole milliseconds only; the remainder carries to the next frame.
        let elapsed_ms = last_step.elapsed().as_millis().min(u32::MAX as u128) as u32;
        if elapsed_ms > 0 {
            last_step += Duration::from_millis(u64::from(elapsed_ms));
            game.advance(elapsed_ms);
        }

        game.snapshot_into(&mut snap);

        events.extend(game.drain_events());
        if !events.is_empty() {
            match adapter.as_ref() {
                Some(adapter) => {
                    observation_seq += 1;
                    let obs = create_observation(observation_seq, snap.clone(), std::mem::take(&mut events));
                    if let Ok(line) = encode_line(&obs) {
                        adapter.send(OutboundMessage::Broadcast { line });
                    }
                }
                None => events.clear(),
            }
        }

        // Render.
        let status = adapter.as_ref().map(|a| AdapterStatusView {
            enabled: true,
            client_count: a.stats().client_count().min(u16::MAX as usize) as u16,
            controller_id: a.stats().controller_id(),
        });
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, status.as_ref(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}

fn handle_inbound(
    adapter: &Adapter,
    game: &mut Game,
    view: &mut GameView,
    snap: &mut GameSnapshot,
    observation_seq: &mut u64,
    cmd: InboundCommand,
) {
    let reply = match cmd.payload {
        InboundPayload::Actions(actions) => {
            debug!(client_id = cmd.client_id, seq = cmd.seq, count = actions.len(), "remote actions");
            for action in actions {
                game.apply_action(action);
            }
            encode_line(&create_ack(cmd.seq))
        }
        InboundPayload::Camera(hint) => {
            view.apply_camera_hint(hint);
            encode_line(&create_ack(cmd.seq))
        }
        InboundPayload::SnapshotRequest => {
            game.snapshot_into(snap);
            *observation_seq += 1;
            encode_line(&create_observation(*observation_seq, snap.clone(), Vec::new()))
        }
    };

    if let Ok(line) = reply {
        adapter.send(OutboundMessage::ToClient {
            client_id: cmd.client_id,
            line,
        });
    }
}
