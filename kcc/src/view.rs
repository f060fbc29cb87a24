/*!
Orbit view and view-mode policy.

The controller does not render anything, but it needs two things from the
camera: the azimuth that turns actor-local input into world directions, and a
focus point that follows the actor. `OrbitView` holds exactly that state
(target plus offset); whoever draws the scene places its camera at
[`OrbitView::camera_position`].
*/

use serde::{Deserialize, Serialize};

use crate::{
    collision::{Point, Vec3},
    config::ControllerSettings,
    constants::{FIRST_PERSON_ORBIT_DISTANCE, THIRD_PERSON_ORBIT_DISTANCE},
    utils::{azimuth_from_offset, rotate_about_up},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl ViewMode {
    /// Capsule radius the actor uses while this mode is active.
    #[inline]
    pub fn capsule_radius(self, settings: &ControllerSettings) -> f32 {
        match self {
            ViewMode::FirstPerson => settings.first_person_capsule_radius,
            ViewMode::ThirdPerson => settings.capsule_radius,
        }
    }

    #[inline]
    pub fn actor_visible(self) -> bool {
        matches!(self, ViewMode::ThirdPerson)
    }

    /// Allowed camera-to-target distance `(min, max)`.
    #[inline]
    pub fn orbit_distance(self) -> (f32, f32) {
        match self {
            ViewMode::FirstPerson => FIRST_PERSON_ORBIT_DISTANCE,
            ViewMode::ThirdPerson => THIRD_PERSON_ORBIT_DISTANCE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        }
    }
}

/// Camera orbiting a target point.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitView {
    /// Focus point (world space).
    pub target: Vec3,
    /// Camera position relative to `target`.
    pub offset: Vec3,
}

impl OrbitView {
    pub fn new(target: Vec3, camera_position: Vec3) -> Self {
        Self {
            target,
            offset: camera_position - target,
        }
    }

    /// Horizontal camera angle about +Y; 0 when the camera sits on +Z.
    #[inline]
    pub fn azimuth(&self) -> f32 {
        azimuth_from_offset(&self.offset)
    }

    #[inline]
    pub fn camera_position(&self) -> Point {
        Point::from(self.target + self.offset)
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.offset.norm()
    }

    /// Move the focus to `focus`, keeping the camera at the same offset.
    #[inline]
    pub fn recenter(&mut self, focus: Vec3) {
        self.target = focus;
    }

    /// Swing the camera around the target by `delta` radians.
    pub fn orbit(&mut self, delta: f32) {
        self.offset = rotate_about_up(&self.offset, delta);
    }

    /// Keep the current direction, change the distance.
    ///
    /// A zero offset has no direction; the camera is then placed on +Z.
    pub fn set_distance(&mut self, distance: f32) {
        let dir = self.offset.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::z);
        self.offset = dir * distance;
    }

    pub fn clamp_distance(&mut self, min: f32, max: f32) {
        let d = self.distance();
        if d < min {
            self.set_distance(min);
        } else if d > max {
            self.set_distance(max);
        }
    }
}
