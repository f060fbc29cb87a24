/*!
Collision tolerances.

These constants centralize the numeric guards used by the narrow phase,
resolver and ground logic. Tunables that users are expected to change live in
[`crate::config::ControllerSettings`]; these are not meant to be tuned.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Practical small distance for comparisons (meters).
/// Below this a push-out direction is considered undefined.
pub const DIST_EPS: f32 = 1.0e-6;

/// Squared length under which a segment is treated as a point (m^2).
pub const DEGENERATE_SEGMENT_SQ: f32 = 1.0e-12;

/// Relative threshold on `|ab x ac|^2 / (|ab|^2 |ac|^2)` (i.e. sin^2 of the
/// corner angle) under which a triangle is treated as having no area.
pub const DEGENERATE_TRIANGLE_SIN_SQ: f32 = 1.0e-10;

/// Default slack subtracted from every positional correction (meters).
/// Leaving the actor marginally inside contact keeps it from resolving to
/// exactly zero distance and jittering on the boundary.
pub const DEFAULT_CORRECTION_EPSILON: f32 = 1.0e-5;

/// Default fraction of this substep's vertical travel that an upward
/// correction must exceed to count as ground contact.
pub const DEFAULT_GROUND_RATIO: f32 = 0.25;
