//! Geometry module - rotation matrices and grid rounding
//!
//! Rotations are built from accumulated Euler angles in degrees, applied in
//! intrinsic XYZ order (`R = Rx * Ry * Rz`), and the rotated offsets are snapped
//! back onto the integer grid. `f64` keeps multiples of 90° exact after rounding.

use glam::{DMat3, DVec3, EulerRot, IVec3};

/// Wrap each component of an angle triple into `[0, 360)`.
pub fn wrap_degrees(deg: IVec3) -> IVec3 {
    IVec3::new(
        deg.x.rem_euclid(360),
        deg.y.rem_euclid(360),
        deg.z.rem_euclid(360),
    )
}

/// Rotation matrix for Euler angles given in degrees.
pub fn rotation_matrix(deg: IVec3) -> DMat3 {
    let rad = deg.as_dvec3() * (std::f64::consts::PI / 180.0);
    DMat3::from_euler(EulerRot::XYZ, rad.x, rad.y, rad.z)
}

/// Round a continuous vector to the nearest grid cell.
#[inline]
pub fn round_to_grid(v: DVec3) -> IVec3 {
    v.round().as_ivec3()
}

/// Rotate an integer offset and snap the result back onto the grid.
#[inline]
pub fn rotate_offset(m: &DMat3, offset: IVec3) -> IVec3 {
    round_to_grid(*m * offset.as_dvec3())
}
