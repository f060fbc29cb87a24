//! Controller tunables.
//!
//! `ControllerSettings` is read fresh at the start of every substep, so a
//! change takes effect on the next one. The controller itself never validates
//! these values: out-of-range settings give odd motion, not panics.
//! [`ControllerSettings::validate`] is available for callers that load
//! settings from outside (files, UI) and want to reject nonsense early.
//!
//! Values are expressed in meters and seconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{
    Point,
    settings::{DEFAULT_CORRECTION_EPSILON, DEFAULT_GROUND_RATIO},
};

/// Largest substep count accepted by [`ControllerSettings::validate`].
pub const MAX_PHYSICS_STEPS: u32 = 30;

/// A setting that fails [`ControllerSettings::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("`{field}` must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("`{field}` must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`physics_steps` must be between 1 and {max}, got {value}")]
    PhysicsSteps { value: u32, max: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Vertical acceleration (m/s^2). Negative pulls down.
    pub gravity: f32,

    /// Walking speed per held direction (m/s).
    pub player_speed: f32,

    /// Substeps per rendered frame. Zero disables physics.
    pub physics_steps: u32,

    /// Capsule radius used in third-person view (meters).
    pub capsule_radius: f32,

    /// Capsule radius used in first-person view (meters).
    pub first_person_capsule_radius: f32,

    /// Length of the capsule spine hanging below the actor origin (meters).
    pub capsule_height: f32,

    /// Vertical speed set by a jump (m/s).
    pub jump_speed: f32,

    /// World-space height below which the actor is sent back to spawn.
    pub ground_floor_y: f32,

    /// Slack subtracted from every collision correction (meters).
    pub correction_epsilon: f32,

    /// Fraction of the substep's vertical travel an upward correction has to
    /// exceed to count as ground contact.
    pub ground_ratio: f32,

    /// Largest frame delta fed to the physics loop (seconds).
    pub max_frame_delta: f32,

    /// Where the actor appears on creation and after a reset.
    pub spawn_point: [f32; 3],
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            gravity: -30.0,
            player_speed: 10.0,
            physics_steps: 5,
            capsule_radius: 0.5,
            first_person_capsule_radius: 3.0,
            capsule_height: 1.0,
            jump_speed: 20.0,
            ground_floor_y: -25.0,
            correction_epsilon: DEFAULT_CORRECTION_EPSILON,
            ground_ratio: DEFAULT_GROUND_RATIO,
            max_frame_delta: 0.1,
            spawn_point: [0.0, 5.0, 0.0],
        }
    }
}

impl ControllerSettings {
    #[inline]
    pub fn spawn(&self) -> Point {
        Point::from(self.spawn_point)
    }

    /// Reject settings outside their meaningful domain.
    ///
    /// Radii, speed and frame delta must be positive; height, epsilon and
    /// ground ratio non-negative; substeps within `1..=MAX_PHYSICS_STEPS`;
    /// everything finite.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let finite = [
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("capsule_radius", self.capsule_radius),
            ("first_person_capsule_radius", self.first_person_capsule_radius),
            ("capsule_height", self.capsule_height),
            ("jump_speed", self.jump_speed),
            ("ground_floor_y", self.ground_floor_y),
            ("correction_epsilon", self.correction_epsilon),
            ("ground_ratio", self.ground_ratio),
            ("max_frame_delta", self.max_frame_delta),
            ("spawn_point.x", self.spawn_point[0]),
            ("spawn_point.y", self.spawn_point[1]),
            ("spawn_point.z", self.spawn_point[2]),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("capsule_radius", self.capsule_radius),
            ("first_person_capsule_radius", self.first_person_capsule_radius),
            ("player_speed", self.player_speed),
            ("max_frame_delta", self.max_frame_delta),
        ] {
            if value <= 0.0 {
                return Err(SettingsError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("capsule_height", self.capsule_height),
            ("correction_epsilon", self.correction_epsilon),
            ("ground_ratio", self.ground_ratio),
        ] {
            if value < 0.0 {
                return Err(SettingsError::Negative { field, value });
            }
        }

        if self.physics_steps == 0 || self.physics_steps > MAX_PHYSICS_STEPS {
            return Err(SettingsError::PhysicsSteps {
                value: self.physics_steps,
                max: MAX_PHYSICS_STEPS,
            });
        }

        Ok(())
    }
}
