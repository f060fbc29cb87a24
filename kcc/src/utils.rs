use nalgebra::{UnitQuaternion, Vector3};

use crate::collision::Vec3;

/// Horizontal angle of a view offset around +Y, measured from +Z towards +X.
///
/// An offset of `(0, y, d)` (camera behind, looking towards -Z) is azimuth 0.
#[inline]
pub fn azimuth_from_offset(offset: &Vec3) -> f32 {
    offset.x.atan2(offset.z)
}

/// Rotate `v` about +Y by `angle` radians (right-handed).
#[inline]
pub fn rotate_about_up(v: &Vec3, angle: f32) -> Vec3 {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle) * v
}

/// True if every component is finite.
#[inline]
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
