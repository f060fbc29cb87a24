use crate::{
    collision::{CapsuleSpec, Iso, Point, Segment, Vec3},
    utils::is_finite_vec,
};

/// The single controlled character.
///
/// `position` is the actor origin in world space, which is also the top end
/// of the capsule spine.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub position: Vec3,
    pub velocity: Vec3,
    pub capsule: CapsuleSpec,
    pub on_ground: bool,
    /// Facing angle about +Y (radians).
    pub yaw: f32,
}

impl Actor {
    /// A new actor standing still at `at`, not yet on the ground.
    pub fn spawn(at: Point, capsule: CapsuleSpec) -> Self {
        Self {
            position: at.coords,
            velocity: Vec3::zeros(),
            capsule,
            on_ground: false,
            yaw: 0.0,
        }
    }

    /// Put the actor back at `at` with no velocity.
    pub fn reset(&mut self, at: Point) {
        self.position = at.coords;
        self.velocity = Vec3::zeros();
        self.on_ground = false;
    }

    /// World pose: translation plus yaw.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::new(self.position, Vec3::y() * self.yaw)
    }

    /// Capsule spine in world space.
    #[inline]
    pub fn world_segment(&self) -> Segment {
        let iso = self.iso();
        let local = self.capsule.local_segment();
        Segment::new(iso * local.a, iso * local.b)
    }

    /// Start a jump if standing on something. Returns whether it happened.
    pub fn try_jump(&mut self, jump_speed: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = jump_speed;
        self.on_ground = false;
        true
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        is_finite_vec(&self.position) && is_finite_vec(&self.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn world_segment_hangs_below_origin_regardless_of_yaw() {
        let mut actor = Actor::spawn(Point::new(1.0, 4.0, -2.0), CapsuleSpec::new(0.5, 1.5));
        actor.yaw = 1.3;

        let s = actor.world_segment();
        assert_relative_eq!(s.a, Point::new(1.0, 4.0, -2.0), epsilon = 1.0e-6);
        assert_relative_eq!(s.b, Point::new(1.0, 2.5, -2.0), epsilon = 1.0e-6);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let mut actor = Actor::spawn(Point::origin(), CapsuleSpec::new(0.5, 1.0));
        assert!(!actor.try_jump(20.0));
        assert_eq!(actor.velocity.y, 0.0);

        actor.on_ground = true;
        assert!(actor.try_jump(20.0));
        assert_eq!(actor.velocity.y, 20.0);
        assert!(!actor.on_ground);

        // No second jump while airborne.
        actor.velocity.y = 3.0;
        assert!(!actor.try_jump(20.0));
        assert_eq!(actor.velocity.y, 3.0);
    }

    #[test]
    fn reset_clears_motion() {
        let mut actor = Actor::spawn(Point::origin(), CapsuleSpec::new(0.5, 1.0));
        actor.position = Vec3::new(3.0, -40.0, 2.0);
        actor.velocity = Vec3::new(1.0, -30.0, 0.0);
        actor.on_ground = true;

        actor.reset(Point::new(0.0, 5.0, 0.0));
        assert_eq!(actor.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(actor.velocity, Vec3::zeros());
        assert!(!actor.on_ground);
    }
}
