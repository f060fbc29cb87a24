use approx::assert_relative_eq;
use kcc::{
    Actor, CapsuleSpec, ControllerSettings, InputAction, InputState, Mat4, Point, Segment,
    Simulation, StaticCollider, Triangle, TriangleIndex, Vec3, closest_points_segment_triangle,
    resolve_capsule, step_actor,
};
use nalgebra::UnitQuaternion;

const FRAME: f32 = 1.0 / 60.0;

/// Two triangles covering `[-half, half]²` at `y = 0`, facing up.
fn floor_triangles(half: f32) -> Vec<Triangle> {
    let a = Point::new(-half, 0.0, -half);
    let b = Point::new(half, 0.0, -half);
    let c = Point::new(half, 0.0, half);
    let d = Point::new(-half, 0.0, half);
    vec![Triangle::new(a, d, c), Triangle::new(a, c, b)]
}

fn floor(half: f32) -> StaticCollider {
    StaticCollider::from_triangles(floor_triangles(half), Mat4::identity()).unwrap()
}

fn settle_settings(capsule_height: f32) -> ControllerSettings {
    ControllerSettings {
        gravity: -30.0,
        physics_steps: 5,
        capsule_radius: 0.5,
        capsule_height,
        spawn_point: [0.0, 5.0, 0.0],
        ..Default::default()
    }
}

fn run(sim: &mut Simulation, frames: usize) {
    for _ in 0..frames {
        sim.tick(FRAME);
    }
}

#[test]
fn actor_settles_on_flat_ground() {
    let mut sim = Simulation::new(settle_settings(0.0));
    sim.attach_collider(floor(10.0));
    sim.attach_actor();

    for frame in 0..120 {
        sim.tick(FRAME);
        assert!(sim.actor().unwrap().is_finite(), "non-finite state at frame {frame}");
    }

    let actor = sim.actor().unwrap();
    assert!(actor.on_ground);
    assert_relative_eq!(actor.position.y, 0.5, epsilon = 1.0e-3);
    assert_relative_eq!(actor.position.x, 0.0, epsilon = 1.0e-4);
    assert_relative_eq!(actor.position.z, 0.0, epsilon = 1.0e-4);
}

#[test]
fn tall_capsule_rests_on_its_bottom_cap() {
    let mut sim = Simulation::new(settle_settings(1.0));
    sim.attach_collider(floor(10.0));
    sim.attach_actor();

    run(&mut sim, 120);

    let actor = sim.actor().unwrap();
    assert!(actor.on_ground);
    assert_relative_eq!(actor.position.y, 1.5, epsilon = 1.0e-3);
}

#[test]
fn resting_actor_stays_put() {
    let mut sim = Simulation::new(settle_settings(0.0));
    sim.attach_collider(floor(10.0));
    sim.attach_actor();
    run(&mut sim, 120);

    let rest = sim.actor().unwrap().position;
    let tolerance = 2.0 * sim.settings().correction_epsilon;
    for frame in 0..120 {
        let report = sim.tick(FRAME);
        assert!(report.on_ground);
        let drift = (sim.actor().unwrap().position - rest).norm();
        assert!(drift <= tolerance, "drifted {drift} by frame {frame}");
    }
}

#[test]
fn one_pass_removes_penetration_against_one_triangle() {
    let tri = Triangle::new(
        Point::new(-2.0, 0.0, -2.0),
        Point::new(0.0, 0.0, 2.0),
        Point::new(2.0, 0.0, -2.0),
    );
    let index = TriangleIndex::build(vec![tri]);
    let radius = 0.5;

    for (top, bottom) in [
        (Point::new(0.0, 0.8, 0.0), Point::new(0.0, 0.2, 0.0)),
        (Point::new(0.3, 1.0, -0.5), Point::new(-0.2, 0.1, 0.0)),
        (Point::new(1.0, 0.3, 0.0), Point::new(-1.0, 0.3, 0.0)),
    ] {
        let mut segment = Segment::new(top, bottom);
        let report = resolve_capsule(&index, &mut segment, radius);
        assert_eq!(report.contacts, 1);

        let after = closest_points_segment_triangle(&segment, &tri);
        assert!(after.distance >= radius - 1.0e-4, "distance {}", after.distance);
    }
}

#[test]
fn fast_falls_do_not_tunnel_while_step_is_below_radius() {
    let collider = floor(20.0);
    let input = InputState::default();

    for radius in [0.25_f32, 0.5, 1.0] {
        for speed in [5.0_f32, 10.0, 20.0, 40.0] {
            // v * dt stays under the radius.
            let dt = 0.9 * radius / speed;
            let settings = ControllerSettings {
                gravity: 0.0,
                capsule_radius: radius,
                ..Default::default()
            };
            let mut actor =
                Actor::spawn(Point::new(0.0, radius + 2.0, 0.0), CapsuleSpec::new(radius, 0.0));

            for _ in 0..200 {
                actor.on_ground = false;
                actor.velocity = Vec3::new(0.0, -speed, 0.0);
                step_actor(&mut actor, Some(&collider), &input, 0.0, &settings, dt).unwrap();
                assert!(
                    actor.position.y > 0.0,
                    "tunneled: r={radius} v={speed} y={}",
                    actor.position.y
                );
            }
            assert_relative_eq!(actor.position.y, radius, epsilon = 1.0e-3);
        }
    }
}

#[test]
fn diagonal_walk_is_faster_by_sqrt_two() {
    let mut sim = Simulation::new(ControllerSettings {
        gravity: 0.0,
        player_speed: 10.0,
        physics_steps: 1,
        max_frame_delta: 0.1,
        ..Default::default()
    });
    // Nothing to collide with.
    sim.attach_collider(StaticCollider::from_triangles(Vec::new(), Mat4::identity()).unwrap());
    sim.attach_actor();
    let start = sim.actor().unwrap().position;

    sim.press(InputAction::Forward);
    sim.press(InputAction::Right);
    assert!(sim.is_moving());
    sim.tick(0.1);

    let moved = sim.actor().unwrap().position - start;
    assert_relative_eq!(moved.y, 0.0);
    assert_relative_eq!(moved.norm(), 10.0 * 0.1 * 2.0_f32.sqrt(), epsilon = 1.0e-4);

    sim.release(InputAction::Forward);
    sim.release(InputAction::Right);
    assert!(!sim.is_moving());
}

#[test]
fn walking_into_a_wall_stops_at_the_radius() {
    let mut triangles = floor_triangles(10.0);
    // Wall in the z = -3 plane, facing +Z.
    let (w0, w1, w2, w3) = (
        Point::new(-10.0, -1.0, -3.0),
        Point::new(10.0, -1.0, -3.0),
        Point::new(10.0, 10.0, -3.0),
        Point::new(-10.0, 10.0, -3.0),
    );
    triangles.push(Triangle::new(w0, w1, w2));
    triangles.push(Triangle::new(w0, w2, w3));

    let mut sim = Simulation::new(settle_settings(0.0));
    sim.attach_collider(StaticCollider::from_triangles(triangles, Mat4::identity()).unwrap());
    sim.attach_actor();
    // Camera on +Z behind the actor: forward is -Z.
    sim.view_mut().offset = Vec3::new(0.0, 3.0, 5.0);

    run(&mut sim, 60);
    sim.press(InputAction::Forward);
    run(&mut sim, 120);

    let actor = sim.actor().unwrap();
    assert!(actor.is_finite());
    assert_relative_eq!(actor.position.z, -2.5, epsilon = 1.0e-2);
    assert!(actor.position.z >= -2.5 - 1.0e-3);
    assert_relative_eq!(actor.position.y, 0.5, epsilon = 1.0e-2);
}

#[test]
fn transformed_collider_resolves_in_world_space() {
    let rotation = UnitQuaternion::from_axis_angle(&Vec3::y_axis(), 0.7).to_homogeneous();
    let transform = Mat4::new_translation(&Vec3::new(3.0, 2.0, -1.0)) * rotation;
    let collider = StaticCollider::from_triangles(floor_triangles(10.0), transform).unwrap();

    let mut sim = Simulation::new(ControllerSettings {
        spawn_point: [3.0, 6.0, -1.0],
        ..settle_settings(0.0)
    });
    sim.attach_collider(collider);
    sim.attach_actor();
    run(&mut sim, 120);

    let actor = sim.actor().unwrap();
    assert!(actor.on_ground);
    assert_relative_eq!(actor.position.y, 2.5, epsilon = 1.0e-3);
    assert_relative_eq!(actor.position.x, 3.0, epsilon = 1.0e-3);
    assert_relative_eq!(actor.position.z, -1.0, epsilon = 1.0e-3);
}

#[test]
fn jump_lifts_off_and_lands_again() {
    let mut sim = Simulation::new(settle_settings(0.0));
    sim.attach_collider(floor(10.0));
    sim.attach_actor();
    run(&mut sim, 120);
    assert!(sim.actor().unwrap().on_ground);

    sim.press(InputAction::Jump);
    sim.release(InputAction::Jump);
    sim.tick(FRAME);
    let actor = sim.actor().unwrap();
    assert!(!actor.on_ground);
    assert!(actor.position.y > 0.6);

    // Second press mid-air does nothing.
    let vy = actor.velocity.y;
    sim.press(InputAction::Jump);
    assert_eq!(sim.actor().unwrap().velocity.y, vy);

    // 20 m/s up under 30 m/s² is back down in about 1.3 s.
    run(&mut sim, 120);
    let actor = sim.actor().unwrap();
    assert!(actor.on_ground);
    assert_relative_eq!(actor.position.y, 0.5, epsilon = 1.0e-3);
}

#[test]
fn falling_off_the_edge_respawns() {
    let mut sim = Simulation::new(ControllerSettings {
        spawn_point: [0.0, 5.0, 0.0],
        ground_floor_y: -25.0,
        ..settle_settings(0.0)
    });
    // Floor far away from the spawn column.
    let mut triangles = floor_triangles(1.0);
    for t in &mut triangles {
        t.a.x += 50.0;
        t.b.x += 50.0;
        t.c.x += 50.0;
    }
    sim.attach_collider(StaticCollider::from_triangles(triangles, Mat4::identity()).unwrap());
    sim.attach_actor();

    // Free fall of 30 m at 30 m/s² takes about 1.41 s.
    let mut respawned = false;
    for _ in 0..120 {
        let report = sim.tick(FRAME);
        respawned |= report.respawned;
        assert!(sim.actor().unwrap().position.y >= -25.0);
    }
    assert!(respawned);
}

#[test]
fn large_frame_delta_is_clamped() {
    let mut sim = Simulation::new(ControllerSettings {
        gravity: 0.0,
        max_frame_delta: 0.1,
        ..Default::default()
    });
    sim.attach_collider(StaticCollider::from_triangles(Vec::new(), Mat4::identity()).unwrap());
    sim.attach_actor();
    let start = sim.actor().unwrap().position;

    sim.press(InputAction::Forward);
    let report = sim.tick(2.0);
    assert_relative_eq!(report.delta, 0.1);

    let moved = (sim.actor().unwrap().position - start).norm();
    assert_relative_eq!(moved, 10.0 * 0.1, epsilon = 1.0e-4);
}
