use std::f32::consts::PI;

use crate::collision::Vec3;

/// Added to the camera azimuth to get the actor's yaw.
///
/// The actor faces away from the camera, i.e. half a turn from the direction
/// the camera looks back along.
pub const FACING_OFFSET: f32 = PI;

/// Actor-local walking directions (right-handed, -Z is forward).
pub const LOCAL_FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);
pub const LOCAL_BACKWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const LOCAL_LEFT: Vec3 = Vec3::new(-1.0, 0.0, 0.0);
pub const LOCAL_RIGHT: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Orbit distance range (meters) while looking through the actor's eyes.
///
/// Non-zero so the view offset, and therefore the azimuth, stays defined.
pub const FIRST_PERSON_ORBIT_DISTANCE: (f32, f32) = (1.0e-4, 2.0e-4);

/// Orbit distance range (meters) while looking at the actor from outside.
pub const THIRD_PERSON_ORBIT_DISTANCE: (f32, f32) = (1.0, 10.0);

/// Where the camera starts relative to the world origin before the actor exists.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(10.0, 10.0, -10.0);
