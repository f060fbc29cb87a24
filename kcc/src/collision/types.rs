/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- broad (triangle BVH, candidate boxes)
- narrow_phase (segment vs. triangle closest points)
- resolve (capsule depenetration against the candidates)
- ground (contact classification and correction)
- the actor integrator in `movement`

Conventions
- Distances are meters, time is seconds, +Y is up.
- A capsule is a segment swept by a sphere. The segment hangs below the actor
  origin: `a` is the origin, `b` is `height` meters below it.
*/

use nalgebra as na;
use rapier3d::parry::shape as pshape;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;
pub type Mat4 = na::Matrix4<f32>;

/// Triangle with vertices `a`, `b`, `c`.
pub type Triangle = pshape::Triangle;

/// Line segment from `a` to `b`.
///
/// For capsules `a` is the start (actor origin) and `b` is the end.
pub type Segment = pshape::Segment;

/// Capsule shape for the actor.
///
/// `height` is the spine length, so the capsule spans from `radius` above the
/// origin down to `height + radius` below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub height: f32,
}

impl CapsuleSpec {
    #[inline]
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Actor-local spine: starts at the origin and points straight down.
    #[inline]
    pub fn local_segment(&self) -> Segment {
        Segment::new(Point::origin(), Point::new(0.0, -self.height, 0.0))
    }
}

/// Closest features between a segment and a triangle.
#[derive(Clone, Copy, Debug)]
pub struct SegmentTriangleClosest {
    /// Separation between the two points below (0 when the segment crosses the triangle).
    pub distance: f32,
    /// Closest point on the triangle surface.
    pub on_triangle: Point,
    /// Closest point on the segment.
    pub on_segment: Point,
}

/// Diagnostics from one resolver pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Triangles handed out by the broad phase.
    pub visited: u32,
    /// Triangles that were penetrated and pushed the segment out.
    pub contacts: u32,
}
