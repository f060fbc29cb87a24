/*!
Collision root module.

This module implements the capsule-vs-static-triangles query that the actor
integrator runs every substep. Triangles live in a parry BVH (through the
`rapier3d` re-export); the exact tests are written here. The code is split for
clarity:

- types:        shared data types (Segment, Triangle, CapsuleSpec, etc.)
- settings:     numeric tolerances
- broad:        triangle BVH and the capsule candidate box
- narrow_phase: closest points between a segment and a triangle
- resolve:      iterative push-out of a capsule spine
- ground:       ground classification, correction trimming, velocity response
*/

pub mod broad;
pub mod ground;
pub mod narrow_phase;
pub mod resolve;
pub mod settings;
pub mod types;

// Re-export commonly used types and functions.
pub use broad::{TriangleIndex, candidate_box};
pub use narrow_phase::closest_points_segment_triangle;
pub use resolve::resolve_capsule;
pub use types::{
    CapsuleSpec, Iso, Mat4, Point, Quat, ResolveReport, Segment, SegmentTriangleClosest, Triangle,
    Vec3,
};
