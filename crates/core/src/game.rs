//! Game module - one play session
//!
//! Ties together the board, the current piece, the shape generator, the score
//! and the step clock. All mutation happens synchronously inside these calls;
//! the only notion of wall-clock time is the `elapsed_ms` passed to
//! [`Game::advance`].
//!
//! Moves and rotations follow attempt, validate, then commit or discard: a
//! tentative piece is built, tested against the board, and either replaces the
//! current piece or is dropped. Nothing is ever partially applied.

use glam::IVec3;
use tracing::{debug, info};

use crate::board::{Board, LayerClear};
use crate::clock::StepAccumulator;
use crate::piece::Piece;
use crate::rng::ShapeGenerator;
use crate::scoring::Score;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    CollisionResult, GameAction, GameConfig, GameEvent, GamePhase, PieceCommand, BLOCKED_FLASH_MS,
};

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece now sits at the new position
    Moved,
    /// Rejected; the piece is unchanged
    Blocked,
    /// The piece settled and the next one was spawned (or the game ended)
    Landed(LayerClear),
    /// No piece to move (not started, or game over)
    Ignored,
}

/// Result of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateOutcome {
    Rotated,
    Blocked,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    current: Option<Piece>,
    shapes: ShapeGenerator,
    score: Score,
    clock: StepAccumulator,
    phase: GamePhase,
    started: bool,
    layers_cleared: u32,
    pieces_spawned: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    /// Remaining time of the blocked flash
    blocked_ms: u32,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a session with an empty board. Call [`Game::start`] to spawn the first piece.
    pub fn new(config: GameConfig) -> Self {
        let board = Board::from_config(&config.bounding_box);
        Self::with_board(config, board)
    }

    /// Create a session on a prepared board
    pub fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            shapes: ShapeGenerator::new(config.seed),
            clock: StepAccumulator::new(config.step_ms),
            config,
            board,
            current: None,
            score: Score::new(),
            phase: GamePhase::Running,
            started: false,
            layers_cleared: 0,
            pieces_spawned: 0,
            episode_id: 0,
            blocked_ms: 0,
            events: Vec::new(),
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    /// Begin a new episode with the same config, continuing the shape sequence
    pub fn restart(&mut self) {
        let shapes = self.shapes.clone();
        let events = std::mem::take(&mut self.events);
        let episode_id = self.episode_id.wrapping_add(1);
        *self = Self::new(self.config);
        self.shapes = shapes;
        self.events = events;
        self.episode_id = episode_id;
        info!(episode_id, "restarting game");
        self.start();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score.points()
    }

    pub fn layers_cleared(&self) -> u32 {
        self.layers_cleared
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// True while the blocked flash is showing
    pub fn blocked(&self) -> bool {
        self.blocked_ms > 0
    }

    fn is_live(&self) -> bool {
        self.started && self.phase == GamePhase::Running
    }

    /// Spawn a new random piece at the top of the box.
    ///
    /// Any collision at the spawn point ends the game. Returns whether a piece
    /// was placed.
    pub fn spawn_piece(&mut self) -> bool {
        let piece = Piece::generate(&mut self.shapes, &self.config.bounding_box);

        let collision = self.board.test_collision(&piece, true);
        if collision != CollisionResult::None {
            self.current = None;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                score: self.score(),
            });
            info!(
                score = self.score(),
                layers = self.layers_cleared,
                pieces = self.pieces_spawned,
                ?collision,
                "game over"
            );
            return false;
        }

        debug!(shape = piece.kind().as_str(), position = ?piece.position(), "spawned piece");
        self.events.push(GameEvent::Spawned {
            shape: piece.kind(),
            position: piece.position(),
        });
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.current = Some(piece);
        true
    }

    /// Advance the game clock by `elapsed_ms`, running every step that became due.
    /// Returns the number of steps run.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.blocked_ms = self.blocked_ms.saturating_sub(elapsed_ms);
        if !self.is_live() {
            return 0;
        }

        self.clock.add(elapsed_ms);
        let mut steps = 0;
        while self.is_live() && self.clock.pop_step() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// One automatic descent
    pub fn step(&mut self) -> MoveOutcome {
        self.move_piece(IVec3::NEG_Z)
    }

    /// Translate the current piece by `delta` cells.
    ///
    /// A wall contact rejects the whole move. Ground contact lands the piece;
    /// descending moves (`delta.z != 0`) also land it as soon as it reaches z = 0.
    pub fn move_piece(&mut self, delta: IVec3) -> MoveOutcome {
        if !self.is_live() {
            return MoveOutcome::Ignored;
        }
        let Some(current) = self.current.as_ref() else {
            return MoveOutcome::Ignored;
        };

        let tentative = current.translated(delta);
        let descending = delta.z != 0;

        let lands = if descending && tentative.position().z == 0 {
            true
        } else {
            match self.board.test_collision(&tentative, descending) {
                CollisionResult::Wall => {
                    self.raise_blocked();
                    return MoveOutcome::Blocked;
                }
                CollisionResult::Ground => true,
                CollisionResult::None => false,
            }
        };

        if lands {
            return MoveOutcome::Landed(self.land(tentative));
        }

        self.events.push(GameEvent::Moved {
            position: tentative.position(),
        });
        self.current = Some(tentative);
        MoveOutcome::Moved
    }

    /// Rotate the current piece by Euler angles in degrees.
    ///
    /// A wall contact rejects the rotation; rotating never lands the piece.
    /// Floor contact is allowed, but only if every cell stays inside the box
    /// and off settled cells (a floor cell can be the first match while a later
    /// cell already sits below the floor).
    pub fn rotate_piece(&mut self, deg: IVec3) -> RotateOutcome {
        if !self.is_live() {
            return RotateOutcome::Ignored;
        }
        let Some(current) = self.current.as_ref() else {
            return RotateOutcome::Ignored;
        };

        let rotated = current.rotated(deg);
        let rejected = match self.board.test_collision(&rotated, false) {
            CollisionResult::Wall => true,
            CollisionResult::Ground => !self.board.fits(&rotated),
            CollisionResult::None => false,
        };
        if rejected {
            self.raise_blocked();
            return RotateOutcome::Blocked;
        }

        self.events.push(GameEvent::Rotated {
            orientation: rotated.orientation(),
        });
        self.current = Some(rotated);
        RotateOutcome::Rotated
    }

    /// Apply a logical input action. Returns true if the game state changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action.command() {
            Some(PieceCommand::Move(delta)) => matches!(
                self.move_piece(delta),
                MoveOutcome::Moved | MoveOutcome::Landed(_)
            ),
            Some(PieceCommand::Rotate(deg)) => self.rotate_piece(deg) == RotateOutcome::Rotated,
            None => {
                self.restart();
                true
            }
        }
    }

    /// Settle the current piece, clear layers and spawn the next one.
    ///
    /// The piece settles at `tentative` if every cell there is free, otherwise
    /// where it currently is.
    fn land(&mut self, tentative: Piece) -> LayerClear {
        let settled = if self.board.fits(&tentative) {
            tentative
        } else {
            match self.current.take() {
                Some(current) => current,
                None => return LayerClear::default(),
            }
        };
        self.current = None;

        let cells: Vec<IVec3> = settled.cells().collect();
        for &cell in &cells {
            self.board.add_static_block(cell);
        }
        debug!(shape = settled.kind().as_str(), position = ?settled.position(), "piece landed");
        self.events.push(GameEvent::Landed { cells });

        let clear = self.board.check_completed(&mut self.score);
        if !clear.is_empty() {
            self.layers_cleared += clear.layers;
            info!(
                layers = clear.layers,
                bonus = clear.bonus,
                points = clear.points,
                score = self.score(),
                "layers cleared"
            );
            self.events.push(GameEvent::LayersCleared {
                layers: clear.layers,
                bonus: clear.bonus,
                points: clear.points,
            });
        }

        self.spawn_piece();
        clear
    }

    fn raise_blocked(&mut self) {
        self.blocked_ms = BLOCKED_FLASH_MS;
        self.events.push(GameEvent::Blocked);
    }

    /// Take all events emitted since the last call, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.dims = self.board.dims();
        self.board.write_u8_cells(&mut out.cells);
        out.active = self.current.as_ref().map(ActiveSnapshot::from);
        out.score = self.score();
        out.layers_cleared = self.layers_cleared;
        out.pieces_spawned = self.pieces_spawned;
        out.episode_id = self.episode_id;
        out.phase = self.phase;
        out.blocked = self.blocked();
        out.step_ms = self.clock.step_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
