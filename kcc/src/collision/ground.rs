use super::types::Vec3;

/// Classify a resolver correction as ground support.
///
/// The actor counts as standing on something when the correction lifted it by
/// more than `ground_ratio` of the vertical distance its velocity would carry
/// it this substep. Walls (horizontal corrections) and ceilings (downward
/// corrections) never qualify.
#[inline]
pub fn is_ground_correction(correction: &Vec3, velocity_y: f32, dt: f32, ground_ratio: f32) -> bool {
    correction.y > (dt * velocity_y * ground_ratio).abs()
}

/// Shorten a correction by `epsilon`, never reversing it.
///
/// Returns the displacement to apply. A zero or sub-epsilon correction yields
/// zero.
#[inline]
pub fn trimmed_correction(correction: &Vec3, epsilon: f32) -> Vec3 {
    let len = correction.norm();
    let offset = (len - epsilon).max(0.0);
    if len > 0.0 && offset > 0.0 {
        correction * (offset / len)
    } else {
        Vec3::zeros()
    }
}

/// Velocity after a contact correction.
///
/// - Grounded: the actor stops outright, no residual slide.
/// - Airborne: the component along the correction direction is removed so the
///   actor slides along whatever pushed it.
#[inline]
pub fn velocity_after_contact(velocity: &Vec3, correction: &Vec3, on_ground: bool) -> Vec3 {
    if on_ground {
        return Vec3::zeros();
    }
    match correction.try_normalize(0.0) {
        Some(n) => velocity - n * n.dot(velocity),
        None => *velocity,
    }
}
