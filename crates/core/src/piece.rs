//! Piece module - the falling block
//!
//! A piece keeps its shape kind, grid position and accumulated orientation.
//! Its offsets are a cache: every rotation recomputes them from the canonical
//! template, so repeated turns never drift.
//!
//! `translated` and `rotated` return new pieces; validation against the board
//! is the game's job.

use glam::IVec3;

use crate::geometry::{rotate_offset, rotation_matrix, wrap_degrees};
use crate::rng::ShapeGenerator;
use crate::shapes::{get_shape, template, Shape};
use crate::types::{BoxConfig, ShapeKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: ShapeKind,
    offsets: Shape,
    position: IVec3,
    /// Euler angles in degrees, each in [0, 360)
    orientation: IVec3,
}

impl Piece {
    /// New piece of `kind` at `position`, unrotated
    pub fn new(kind: ShapeKind, position: IVec3) -> Self {
        Self {
            kind,
            offsets: get_shape(kind),
            position,
            orientation: IVec3::ZERO,
        }
    }

    /// Random piece at the spawn point of `bounding_box`
    pub fn generate(gen: &mut ShapeGenerator, bounding_box: &BoxConfig) -> Self {
        Self::new(gen.next_kind(), bounding_box.spawn_position())
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn position(&self) -> IVec3 {
        self.position
    }

    pub fn orientation(&self) -> IVec3 {
        self.orientation
    }

    /// Offsets relative to the position, after rotation
    pub fn offsets(&self) -> &[IVec3] {
        &self.offsets
    }

    /// Absolute grid cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.offsets.iter().map(move |&o| self.position + o)
    }

    /// Copy moved by `delta` cells
    pub fn translated(&self, delta: IVec3) -> Self {
        Self {
            position: self.position + delta,
            ..self.clone()
        }
    }

    /// Copy rotated by `deg` degrees on top of the current orientation
    pub fn rotated(&self, deg: IVec3) -> Self {
        let mut next = self.clone();
        next.set_orientation(self.orientation + deg);
        next
    }

    fn set_orientation(&mut self, deg: IVec3) {
        self.orientation = wrap_degrees(deg);
        let m = rotation_matrix(self.orientation);
        self.offsets = template(self.kind)
            .iter()
            .map(|&o| rotate_offset(&m, o))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_piece_uses_template() {
        let p = Piece::new(ShapeKind::L, IVec3::new(2, 2, 15));
        assert_eq!(p.offsets(), template(ShapeKind::L));
        assert_eq!(p.orientation(), IVec3::ZERO);
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(cells[3], IVec3::new(3, 4, 15));
    }

    #[test]
    fn generate_spawns_at_box_spawn_point() {
        let mut gen = ShapeGenerator::new(5);
        let p = Piece::generate(&mut gen, &BoxConfig::default());
        assert_eq!(p.position(), IVec3::new(2, 2, 15));
        assert_eq!(p.orientation(), IVec3::ZERO);
    }

    #[test]
    fn translate_keeps_offsets() {
        let p = Piece::new(ShapeKind::S, IVec3::new(1, 1, 5));
        let q = p.translated(IVec3::new(1, -1, -1));
        assert_eq!(q.position(), IVec3::new(2, 0, 4));
        assert_eq!(q.offsets(), p.offsets());
        assert_eq!(p.position(), IVec3::new(1, 1, 5));
    }

    #[test]
    fn rotation_wraps_orientation() {
        let p = Piece::new(ShapeKind::T, IVec3::ZERO).rotated(IVec3::new(-90, 0, 0));
        assert_eq!(p.orientation(), IVec3::new(270, 0, 0));
    }

    #[test]
    fn rotate_about_x_lifts_piece_out_of_plane() {
        let p = Piece::new(ShapeKind::I, IVec3::ZERO).rotated(IVec3::new(90, 0, 0));
        assert_eq!(
            p.offsets(),
            &[IVec3::new(0, 0, 0), IVec3::new(0, 0, 1), IVec3::new(0, 0, 2)]
        );
    }

    #[test]
    fn four_quarter_turns_restore_offsets() {
        for kind in ShapeKind::ALL {
            for step in [
                IVec3::new(90, 0, 0),
                IVec3::new(0, 90, 0),
                IVec3::new(0, 0, 90),
                IVec3::new(0, 0, -90),
            ] {
                let mut p = Piece::new(kind, IVec3::new(2, 2, 10));
                for _ in 0..4 {
                    p = p.rotated(step);
                }
                assert_eq!(p.offsets(), template(kind), "{:?} {:?}", kind, step);
                assert_eq!(p.orientation(), IVec3::ZERO);
            }
        }
    }

    #[test]
    fn rotate_then_inverse_restores() {
        let p = Piece::new(ShapeKind::L, IVec3::new(2, 2, 10));
        let q = p.rotated(IVec3::new(0, 90, 0)).rotated(IVec3::new(0, -90, 0));
        assert_eq!(p, q);
    }
}
