/*!
Per-frame driver.

`Simulation` owns everything the controller needs between frames: settings,
the (optional) static collider, the (optional) actor, held inputs, the orbit
view and the view mode. Hosts feed it input events and frame deltas:

```text
press/release ──► InputState ─┐
                              ├─► tick(frame_delta) ─► physics_steps × step_actor ─► view follows actor
view.azimuth() ───────────────┘
```

Until both a collider and an actor are attached, `tick` leaves the actor where
it is.
*/

use crate::{
    actor::Actor,
    collision::{CapsuleSpec, Vec3},
    config::ControllerSettings,
    constants::{FACING_OFFSET, INITIAL_CAMERA_POSITION},
    input::{InputAction, InputState},
    movement::step_actor,
    static_collider::StaticCollider,
    view::{OrbitView, ViewMode},
};

/// Summary of one `tick()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame delta after clamping (seconds).
    pub delta: f32,
    /// Substeps actually run.
    pub substeps: u32,
    /// Candidate triangles visited over all substeps.
    pub visited: u32,
    /// Triangles that produced a push over all substeps.
    pub contacts: u32,
    /// Ground contact after the last substep.
    pub on_ground: bool,
    /// At least one substep sent the actor back to spawn.
    pub respawned: bool,
}

pub struct Simulation {
    settings: ControllerSettings,
    collider: Option<StaticCollider>,
    actor: Option<Actor>,
    input: InputState,
    view: OrbitView,
    mode: ViewMode,
}

impl Simulation {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            collider: None,
            actor: None,
            input: InputState::default(),
            view: OrbitView::new(Vec3::zeros(), INITIAL_CAMERA_POSITION),
            mode: ViewMode::default(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Settings are read at the start of every substep; edits apply on the next one.
    #[inline]
    pub fn settings_mut(&mut self) -> &mut ControllerSettings {
        &mut self.settings
    }

    #[inline]
    pub fn collider(&self) -> Option<&StaticCollider> {
        self.collider.as_ref()
    }

    #[inline]
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    #[inline]
    pub fn actor_mut(&mut self) -> Option<&mut Actor> {
        self.actor.as_mut()
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn view(&self) -> &OrbitView {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut OrbitView {
        &mut self.view
    }

    #[inline]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Install the static world. The collider is built once; later calls are ignored.
    ///
    /// Returns whether the collider was accepted.
    pub fn attach_collider(&mut self, collider: StaticCollider) -> bool {
        if self.collider.is_some() {
            log::warn!("static collider already attached; ignoring the new one");
            return false;
        }
        log::info!("static collider ready: {} triangles", collider.triangle_count());
        self.collider = Some(collider);
        true
    }

    /// Create the actor at the spawn point, replacing any existing one.
    pub fn attach_actor(&mut self) -> &Actor {
        let capsule = CapsuleSpec::new(
            self.mode.capsule_radius(&self.settings),
            self.settings.capsule_height,
        );
        let actor = Actor::spawn(self.settings.spawn(), capsule);
        log::info!(
            "actor spawned at ({:.2}, {:.2}, {:.2})",
            actor.position.x,
            actor.position.y,
            actor.position.z
        );
        self.view.recenter(actor.position);
        self.actor.insert(actor)
    }

    /// Handle a key going down. Jump fires here, once per press.
    pub fn press(&mut self, action: InputAction) {
        if action == InputAction::Jump {
            let jump_speed = self.settings.jump_speed;
            if let Some(actor) = self.actor.as_mut() {
                if actor.try_jump(jump_speed) {
                    log::debug!("jump: vy={jump_speed}");
                }
            }
            return;
        }
        self.input.set(action, true);
    }

    pub fn release(&mut self, action: InputAction) {
        self.input.set(action, false);
    }

    /// Forget all held inputs, e.g. when the host window loses focus.
    pub fn release_all(&mut self) {
        self.input = InputState::default();
    }

    /// Send the actor back to spawn with no velocity.
    pub fn reset(&mut self) {
        let spawn = self.settings.spawn();
        if let Some(actor) = self.actor.as_mut() {
            actor.reset(spawn);
            self.view.recenter(actor.position);
            log::info!("actor reset to spawn");
        }
    }

    /// Switch between first- and third-person.
    ///
    /// Entering third person pulls the camera back to the far end of its
    /// range; entering first person collapses it onto the target. The capsule
    /// radius follows on the next tick.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        let (min, max) = mode.orbit_distance();
        match mode {
            ViewMode::ThirdPerson => self.view.set_distance(max),
            ViewMode::FirstPerson => self.view.clamp_distance(min, max),
        }
        log::debug!("view mode: {mode:?}");
    }

    /// True while any directional input is held.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.input.any_held()
    }

    /// Advance one rendered frame.
    ///
    /// The frame delta is clamped to `[0, max_frame_delta]` and split evenly
    /// across `physics_steps` substeps. The actor's capsule radius and yaw are
    /// refreshed from the view first, and the view is re-centred on the actor
    /// afterwards.
    pub fn tick(&mut self, frame_delta: f32) -> FrameReport {
        let delta = clamp_frame_delta(frame_delta, self.settings.max_frame_delta);
        let mut report = FrameReport {
            delta,
            ..Default::default()
        };

        let (min, max) = self.mode.orbit_distance();
        self.view.clamp_distance(min, max);

        let Some(actor) = self.actor.as_mut() else {
            return report;
        };

        let azimuth = self.view.azimuth();
        actor.capsule = CapsuleSpec::new(
            self.mode.capsule_radius(&self.settings),
            self.settings.capsule_height,
        );
        actor.yaw = azimuth + FACING_OFFSET;

        let steps = self.settings.physics_steps;
        if let Some(collider) = self.collider.as_ref() {
            if steps > 0 {
                let dt = delta / steps as f32;
                for _ in 0..steps {
                    let Some(sub) = step_actor(
                        actor,
                        Some(collider),
                        &self.input,
                        azimuth,
                        &self.settings,
                        dt,
                    ) else {
                        break;
                    };
                    report.substeps += 1;
                    report.visited += sub.resolve.visited;
                    report.contacts += sub.resolve.contacts;
                    report.respawned |= sub.respawned;
                }
            }
        }

        report.on_ground = actor.on_ground;
        self.view.recenter(actor.position);
        report
    }
}

/// Non-finite deltas count as zero; the upper bound wins over the lower one.
#[inline]
fn clamp_frame_delta(frame_delta: f32, max_frame_delta: f32) -> f32 {
    if !frame_delta.is_finite() {
        return 0.0;
    }
    frame_delta.min(max_frame_delta).max(0.0)
}
