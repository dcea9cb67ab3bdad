//! Board module - the voxel occupancy grid
//!
//! The board is a `split_x × split_y × split_z` grid stored as one flat `Vec`,
//! layer-major (`(z * split_y + y) * split_x + x`), so a horizontal layer is a
//! contiguous slice and clearing one is a single `copy_within`.
//!
//! Only settled (petrified) cells are stored. The falling piece is never
//! written into the grid; its cells are derived from offsets and position.
//!
//! Coordinates: x and y span the floor, z counts layers upwards from the floor
//! at z = 0.

use glam::IVec3;

use crate::piece::Piece;
use crate::scoring::{next_bonus, points_for_bonus, ScoreSink};
use crate::types::{BoxConfig, CellState, CollisionResult};

/// Report of one `check_completed` pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerClear {
    /// Number of layers removed
    pub layers: u32,
    /// Final bonus multiplier
    pub bonus: u32,
    /// Points sent to the score sink
    pub points: u32,
}

impl LayerClear {
    pub fn is_empty(&self) -> bool {
        self.layers == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    dims: IVec3,
    cells: Vec<CellState>,
}

impl Board {
    /// Create an empty board with the given grid resolution
    pub fn new(dims: IVec3) -> Self {
        let len = [dims.x, dims.y, dims.z]
            .iter()
            .map(|&n| n.max(0) as usize)
            .fold(1usize, usize::saturating_mul);
        Self {
            dims,
            cells: vec![CellState::Empty; len],
        }
    }

    pub fn from_config(bounding_box: &BoxConfig) -> Self {
        Self::new(bounding_box.dims())
    }

    pub fn dims(&self) -> IVec3 {
        self.dims
    }

    fn layer_len(&self) -> usize {
        self.dims.x.max(0) as usize * self.dims.y.max(0) as usize
    }

    #[inline(always)]
    fn index(&self, p: IVec3) -> Option<usize> {
        if !self.in_bounds(p) {
            return None;
        }
        let (x, y, z) = (p.x as usize, p.y as usize, p.z as usize);
        Some((z * self.dims.y as usize + y) * self.dims.x as usize + x)
    }

    pub fn in_bounds(&self, p: IVec3) -> bool {
        p.cmpge(IVec3::ZERO).all() && p.cmplt(self.dims).all()
    }

    /// Cell at `p`, `None` if out of bounds
    pub fn get(&self, p: IVec3) -> Option<CellState> {
        self.index(p).map(|i| self.cells[i])
    }

    pub fn is_petrified(&self, p: IVec3) -> bool {
        self.get(p) == Some(CellState::Petrified)
    }

    /// Mark a cell as settled
    /// Returns false if out of bounds
    pub fn add_static_block(&mut self, p: IVec3) -> bool {
        match self.index(p) {
            Some(i) => {
                debug_assert!(
                    self.cells[i] != CellState::Petrified,
                    "cell {:?} absorbed twice",
                    p
                );
                self.cells[i] = CellState::Petrified;
                true
            }
            None => false,
        }
    }

    /// Classify `piece` against the walls, the floor and settled cells.
    ///
    /// The first cell that matches a rule decides the result. With
    /// `ground_check` set (the piece is descending), touching the floor or
    /// settled geometry reports `Ground`; otherwise the same contact is a `Wall`.
    pub fn test_collision(&self, piece: &Piece, ground_check: bool) -> CollisionResult {
        self.test_cells(piece.cells(), ground_check)
    }

    pub fn test_cells<I>(&self, cells: I, ground_check: bool) -> CollisionResult
    where
        I: IntoIterator<Item = IVec3>,
    {
        let contact = if ground_check {
            CollisionResult::Ground
        } else {
            CollisionResult::Wall
        };

        for p in cells {
            if p.x < 0 || p.x >= self.dims.x || p.y < 0 || p.y >= self.dims.y {
                return CollisionResult::Wall;
            }
            if p.z < 0 || p.z >= self.dims.z {
                return if ground_check && p.z < 0 {
                    CollisionResult::Ground
                } else {
                    CollisionResult::Wall
                };
            }
            if self.is_petrified(p) {
                return contact;
            }
            if self.is_petrified(p - IVec3::Z) {
                return contact;
            }
            if p.z == 0 {
                return CollisionResult::Ground;
            }
        }
        CollisionResult::None
    }

    /// True if every cell of `piece` is inside the box and empty
    pub fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .all(|p| matches!(self.get(p), Some(CellState::Empty)))
    }

    pub fn layer(&self, z: i32) -> &[CellState] {
        if z < 0 || z >= self.dims.z {
            return &[];
        }
        let len = self.layer_len();
        let start = z as usize * len;
        &self.cells[start..start + len]
    }

    /// Number of settled cells in layer `z`
    pub fn layer_count(&self, z: i32) -> usize {
        self.layer(z)
            .iter()
            .filter(|&&c| c == CellState::Petrified)
            .count()
    }

    pub fn is_layer_full(&self, z: i32) -> bool {
        let len = self.layer_len();
        len > 0 && z >= 0 && z < self.dims.z && self.layer_count(z) == len
    }

    /// Remove layer `z`, shift everything above down one, empty the top layer
    fn collapse_layer(&mut self, z: i32) {
        let len = self.layer_len();
        let start = z as usize * len;
        let top = self.dims.z as usize * len;
        self.cells.copy_within(start + len..top, start);
        for cell in &mut self.cells[top - len..top] {
            *cell = CellState::Empty;
        }
    }

    /// Clear every full layer, bottom to top, and award the bonus once.
    ///
    /// After a clear the same z is examined again, since the layer that
    /// dropped into it may be full as well.
    pub fn check_completed<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> LayerClear {
        let mut report = LayerClear::default();
        let mut z = 0;
        while z < self.dims.z {
            if self.is_layer_full(z) {
                self.collapse_layer(z);
                report.layers += 1;
                report.bonus = next_bonus(report.bonus);
            } else {
                z += 1;
            }
        }
        if !report.is_empty() {
            report.points = points_for_bonus(report.bonus);
            sink.add_points(report.points);
        }
        report
    }

    /// Height of the settled stack in a column (highest petrified z + 1, 0 if empty)
    pub fn column_height(&self, x: i32, y: i32) -> i32 {
        (0..self.dims.z)
            .rev()
            .find(|&z| self.is_petrified(IVec3::new(x, y, z)))
            .map_or(0, |z| z + 1)
    }

    pub fn petrified_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == CellState::Petrified)
            .count()
    }

    /// All cells, layer-major
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Write the grid as bytes (see [`CellState::as_u8`]) into `out`, reusing its allocation.
    pub fn write_u8_cells(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.cells.iter().map(CellState::as_u8));
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    #[cfg(test)]
    pub(crate) fn fill_layer(&mut self, z: i32) {
        for y in 0..self.dims.y {
            for x in 0..self.dims.x {
                self.add_static_block(IVec3::new(x, y, z));
            }
        }
    }
}
