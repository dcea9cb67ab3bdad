use arrayvec::ArrayVec;
use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::piece::Piece;
use crate::types::{CellState, GamePhase, ShapeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub position: IVec3,
    pub orientation: IVec3,
    /// Absolute grid cells
    pub cells: ArrayVec<IVec3, 4>,
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            position: value.position(),
            orientation: value.orientation(),
            cells: value.cells().collect(),
        }
    }
}

/// Read-only view of a game, for renderers and remote observers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Grid resolution (split_x, split_y, split_z)
    pub dims: IVec3,
    /// Layer-major cell bytes, see [`CellState::as_u8`]
    pub cells: Vec<u8>,
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub layers_cleared: u32,
    pub pieces_spawned: u32,
    pub episode_id: u32,
    pub phase: GamePhase,
    /// A move or rotation was rejected within the last flash interval
    pub blocked: bool,
    pub step_ms: u32,
}

impl GameSnapshot {
    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Settled state of a cell; out-of-range reads are empty
    pub fn cell(&self, p: IVec3) -> CellState {
        if p.cmplt(IVec3::ZERO).any() || p.cmpge(self.dims).any() {
            return CellState::Empty;
        }
        let (sx, sy) = (self.dims.x as usize, self.dims.y as usize);
        let i = (p.z as usize * sy + p.y as usize) * sx + p.x as usize;
        self.cells
            .get(i)
            .map_or(CellState::Empty, |&b| CellState::from_u8(b))
    }

    /// Highest settled layer in a column
    pub fn column_top(&self, x: i32, y: i32) -> Option<i32> {
        (0..self.dims.z)
            .rev()
            .find(|&z| self.cell(IVec3::new(x, y, z)) == CellState::Petrified)
    }

    /// True if the active piece covers `p`
    pub fn is_active(&self, p: IVec3) -> bool {
        self.active.as_ref().is_some_and(|a| a.cells.contains(&p))
    }
}
