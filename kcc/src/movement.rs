use crate::{
    actor::Actor,
    collision::{
        ResolveReport, Segment, Vec3,
        ground::{is_ground_correction, trimmed_correction, velocity_after_contact},
        resolve_capsule,
    },
    config::ControllerSettings,
    input::InputState,
    static_collider::StaticCollider,
    utils::rotate_about_up,
};

/// Output of a single `step_actor()` substep.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubstepReport {
    /// Broad/narrow phase counters from the overlap resolve.
    pub resolve: ResolveReport,
    /// Correction actually applied to the actor (world space).
    pub correction: Vec3,
    /// Ground contact as decided by this substep.
    pub on_ground: bool,
    /// The actor fell below the floor and was sent back to spawn.
    pub respawned: bool,
}

/// Advance the actor by one substep of `dt` seconds.
///
/// Returns `None` without touching the actor when no collider is loaded yet;
/// the world is considered not ready and the actor is frozen.
///
/// Order
/// 1. Gravity (vertical speed restarts from one step of gravity on the ground).
/// 2. Integrate velocity.
/// 3. Walk offset from held inputs, rotated by the camera azimuth.
/// 4. Capsule spine into collider space.
/// 5. Resolve overlaps against nearby triangles.
/// 6. Back to world; the correction is how far the spine start moved.
/// 7. Ground test on the raw correction.
/// 8. Apply the correction minus a small slack.
/// 9. Velocity update from the applied correction.
/// 10. Fall recovery.
pub fn step_actor(
    actor: &mut Actor,
    collider: Option<&StaticCollider>,
    input: &InputState,
    azimuth: f32,
    settings: &ControllerSettings,
    dt: f32,
) -> Option<SubstepReport> {
    let collider = collider?;

    // 1) Gravity.
    if actor.on_ground {
        actor.velocity.y = dt * settings.gravity;
    } else {
        actor.velocity.y += dt * settings.gravity;
    }

    // 2) Free flight.
    actor.position += actor.velocity * dt;

    // 3) Walking is a displacement, not a velocity: it never accumulates.
    actor.position += walk_offset(input, azimuth, settings.player_speed, dt);

    // 4) World -> collider local.
    let world = actor.world_segment();
    let mut local = Segment::new(collider.world_to_local(&world.a), collider.world_to_local(&world.b));

    // 5) Push out of the mesh.
    let resolve = resolve_capsule(collider.index(), &mut local, actor.capsule.radius);

    // 6) Local -> world.
    let resolved = collider.local_to_world(&local.a).coords;
    let correction = resolved - actor.position;

    // 7) Ground contact: pushed up by more than a fraction of this substep's fall.
    actor.on_ground =
        is_ground_correction(&correction, actor.velocity.y, dt, settings.ground_ratio);

    // 8) Apply, leaving a hair of overlap so contact persists next substep.
    let applied = trimmed_correction(&correction, settings.correction_epsilon);
    actor.position += applied;

    // 9) Velocity.
    actor.velocity = velocity_after_contact(&actor.velocity, &applied, actor.on_ground);

    if resolve.contacts > 0 {
        log::trace!(
            "substep: {} contacts, correction=({:.4}, {:.4}, {:.4}) on_ground={}",
            resolve.contacts,
            applied.x,
            applied.y,
            applied.z,
            actor.on_ground
        );
    }

    // 10) Fell out of the world.
    let respawned = actor.position.y < settings.ground_floor_y;
    if respawned {
        log::info!(
            "actor fell below y={} at ({:.2}, {:.2}, {:.2}); respawning",
            settings.ground_floor_y,
            actor.position.x,
            actor.position.y,
            actor.position.z
        );
        actor.reset(settings.spawn());
    }

    Some(SubstepReport {
        resolve,
        correction: applied,
        on_ground: actor.on_ground,
        respawned,
    })
}

/// World-space walk displacement for one substep.
///
/// Every held direction contributes `speed * dt` along its actor-local axis
/// turned by `azimuth`; diagonals are not normalized.
#[inline]
pub fn walk_offset(input: &InputState, azimuth: f32, speed: f32, dt: f32) -> Vec3 {
    input
        .held_directions()
        .fold(Vec3::zeros(), |acc, dir| acc + rotate_about_up(&dir, azimuth))
        * (speed * dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CapsuleSpec, Mat4, Point, Triangle};
    use approx::assert_relative_eq;

    fn ground(half: f32) -> StaticCollider {
        let a = Point::new(-half, 0.0, -half);
        let b = Point::new(half, 0.0, -half);
        let c = Point::new(half, 0.0, half);
        let d = Point::new(-half, 0.0, half);
        StaticCollider::from_triangles(
            vec![Triangle::new(a, d, c), Triangle::new(a, c, b)],
            Mat4::identity(),
        )
        .unwrap()
    }

    fn actor_at(y: f32, radius: f32) -> Actor {
        Actor::spawn(Point::new(0.0, y, 0.0), CapsuleSpec::new(radius, 0.0))
    }

    #[test]
    fn no_collider_is_a_no_op() {
        let mut actor = actor_at(5.0, 0.5);
        let before = actor.clone();
        let out = step_actor(
            &mut actor,
            None,
            &InputState { forward: true, ..Default::default() },
            0.0,
            &ControllerSettings::default(),
            1.0 / 60.0,
        );
        assert!(out.is_none());
        assert_eq!(actor, before);
    }

    #[test]
    fn free_fall_accumulates_gravity() {
        let collider = ground(10.0);
        let settings = ControllerSettings::default();
        let mut actor = actor_at(5.0, 0.5);
        let dt = 0.01;

        let out = step_actor(&mut actor, Some(&collider), &InputState::default(), 0.0, &settings, dt)
            .unwrap();
        assert_eq!(out.resolve.contacts, 0);
        assert!(!out.on_ground);
        assert_relative_eq!(actor.velocity.y, settings.gravity * dt);
        assert_relative_eq!(actor.position.y, 5.0 + settings.gravity * dt * dt, epsilon = 1.0e-6);
    }

    #[test]
    fn landing_sets_ground_and_stops_velocity() {
        let collider = ground(10.0);
        let settings = ControllerSettings::default();
        // Slightly sunk into the floor, falling.
        let mut actor = actor_at(0.45, 0.5);
        actor.velocity.y = -3.0;

        let out = step_actor(&mut actor, Some(&collider), &InputState::default(), 0.0, &settings, 0.01)
            .unwrap();
        assert!(out.on_ground);
        assert!(actor.on_ground);
        assert_eq!(actor.velocity, Vec3::zeros());
        assert_relative_eq!(actor.position.y, 0.5, epsilon = 1.0e-4);
    }

    /// Vertical wall in the x = 1 plane, facing -X, split along the y = z diagonal.
    fn wall() -> StaticCollider {
        StaticCollider::from_triangles(
            vec![
                Triangle::new(
                    Point::new(1.0, -5.0, -5.0),
                    Point::new(1.0, 5.0, -5.0),
                    Point::new(1.0, 5.0, 5.0),
                ),
                Triangle::new(
                    Point::new(1.0, -5.0, -5.0),
                    Point::new(1.0, 5.0, 5.0),
                    Point::new(1.0, -5.0, 5.0),
                ),
            ],
            Mat4::identity(),
        )
        .unwrap()
    }

    #[test]
    fn wall_contact_removes_normal_velocity_only() {
        let wall = wall();
        let settings = ControllerSettings::default();
        // Well inside one wall triangle, clear of the shared edge.
        let mut actor = Actor::spawn(Point::new(0.6, 2.0, 2.5), CapsuleSpec::new(0.5, 0.0));
        actor.velocity = Vec3::new(2.0, 0.0, 1.0);

        let out = step_actor(&mut actor, Some(&wall), &InputState::default(), 0.0, &settings, 0.01)
            .unwrap();
        assert_eq!(out.resolve.contacts, 1);
        assert!(!out.on_ground);
        assert!(out.correction.x < 0.0);
        assert_relative_eq!(actor.velocity.x, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(actor.velocity.z, 1.0, epsilon = 1.0e-4);
        assert!(actor.position.x <= 0.5 + 1.0e-4);
    }

    #[test]
    fn shared_wall_edge_pushes_once_per_triangle() {
        let wall = wall();
        let settings = ControllerSettings::default();
        // On the y = z edge both triangles are in reach and push in turn; the
        // second push sees the first one's result, so the combined correction
        // picks up a small tangential part.
        let mut actor = actor_at(0.0, 0.5);
        actor.position.x = 0.6;
        actor.velocity = Vec3::new(2.0, 0.0, 1.0);

        let out = step_actor(&mut actor, Some(&wall), &InputState::default(), 0.0, &settings, 0.01)
            .unwrap();
        assert_eq!(out.resolve.contacts, 2);
        assert!(actor.is_finite());
        assert_relative_eq!(out.correction.x, -0.12, epsilon = 1.0e-3);
        assert!(out.correction.y.abs() < 0.01 && out.correction.z.abs() < 0.01);
        assert!(actor.position.x <= 0.5 + 1.0e-3);
    }

    #[test]
    fn diagonal_walk_is_not_normalized() {
        let input = InputState {
            forward: true,
            right: true,
            ..Default::default()
        };
        let offset = walk_offset(&input, 0.0, 10.0, 0.1);
        assert_relative_eq!(offset, Vec3::new(1.0, 0.0, -1.0), epsilon = 1.0e-6);
        assert_relative_eq!(offset.norm(), 2.0_f32.sqrt(), epsilon = 1.0e-6);
    }

    #[test]
    fn fall_recovery_respawns() {
        let collider = ground(1.0);
        let settings = ControllerSettings {
            ground_floor_y: -25.0,
            ..Default::default()
        };
        let mut actor = actor_at(-24.99, 0.5);
        actor.velocity.y = -10.0;

        let out = step_actor(&mut actor, Some(&collider), &InputState::default(), 0.0, &settings, 0.01)
            .unwrap();
        assert!(out.respawned);
        assert_eq!(actor.position, settings.spawn().coords);
        assert_eq!(actor.velocity, Vec3::zeros());
        assert!(!actor.on_ground);
    }
}
