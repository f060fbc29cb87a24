pub mod actor;
pub mod collision;
pub mod config;
pub mod constants;
pub mod input;
pub mod movement;
pub mod simulation;
pub mod static_collider;
pub mod utils;
pub mod view;

pub use actor::Actor;
pub use collision::{
    CapsuleSpec, Mat4, Point, ResolveReport, Segment, Triangle, TriangleIndex, Vec3,
    closest_points_segment_triangle, resolve_capsule,
};
pub use config::{ControllerSettings, MAX_PHYSICS_STEPS, SettingsError};
pub use constants::{FACING_OFFSET, FIRST_PERSON_ORBIT_DISTANCE, THIRD_PERSON_ORBIT_DISTANCE};
pub use input::{InputAction, InputState};
pub use movement::{SubstepReport, step_actor, walk_offset};
pub use simulation::{FrameReport, Simulation};
pub use static_collider::{ColliderError, MeshInstance, StaticCollider};
pub use utils::{azimuth_from_offset, rotate_about_up};
pub use view::{OrbitView, ViewMode};
