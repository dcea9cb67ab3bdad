//! Shapes module - the five piece templates
//!
//! Every template lies flat in the z = 0 plane of its own local frame, anchored
//! at the origin. Rotated offsets are always recomputed from these templates.

use arrayvec::ArrayVec;
use glam::IVec3;

use crate::types::ShapeKind;

/// Offsets of one piece, 3 or 4 cells.
pub type Shape = ArrayVec<IVec3, 4>;

const L_CELLS: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(1, 2, 0),
];

const I_CELLS: [IVec3; 3] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 2, 0),
];

const O_CELLS: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(1, 1, 0),
];

const T_CELLS: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 2, 0),
    IVec3::new(1, 1, 0),
];

const S_CELLS: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 1, 0),
    IVec3::new(1, 2, 0),
];

/// Canonical offsets for a shape kind
pub fn template(kind: ShapeKind) -> &'static [IVec3] {
    match kind {
        ShapeKind::L => &L_CELLS,
        ShapeKind::I => &I_CELLS,
        ShapeKind::O => &O_CELLS,
        ShapeKind::T => &T_CELLS,
        ShapeKind::S => &S_CELLS,
    }
}

/// Owned copy of a template
pub fn get_shape(kind: ShapeKind) -> Shape {
    template(kind).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_have_three_or_four_cells() {
        for kind in ShapeKind::ALL {
            let len = template(kind).len();
            assert!((3..=4).contains(&len), "{:?} has {} cells", kind, len);
        }
        assert_eq!(template(ShapeKind::I).len(), 3);
    }

    #[test]
    fn templates_are_flat_and_anchored() {
        for kind in ShapeKind::ALL {
            let cells = template(kind);
            assert_eq!(cells[0], IVec3::ZERO);
            assert!(cells.iter().all(|c| c.z == 0));
            assert!(cells.iter().all(|c| c.x >= 0 && c.y >= 0));
        }
    }

    #[test]
    fn templates_have_no_duplicate_cells() {
        for kind in ShapeKind::ALL {
            let cells = template(kind);
            for (i, a) in cells.iter().enumerate() {
                for b in &cells[i + 1..] {
                    assert_ne!(a, b, "{:?} repeats a cell", kind);
                }
            }
        }
    }

    #[test]
    fn owned_copy_matches_template() {
        let shape = get_shape(ShapeKind::T);
        assert_eq!(shape.as_slice(), template(ShapeKind::T));
    }
}
