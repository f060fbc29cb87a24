use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use kcc::{InputAction, Simulation, ViewMode};
use serde::{Deserialize, Serialize};

/// Something the script does to the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum ScriptAction {
    Press { action: InputAction },
    Release { action: InputAction },
    /// Swing the camera around the actor (radians).
    Orbit { radians: f32 },
    View { mode: ViewMode },
    /// Flip between first- and third-person.
    ToggleView,
    /// Change gravity mid-run (m/s^2, negative pulls down).
    Gravity { value: f32 },
    /// Back to spawn with every key let go.
    Reset,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Seconds since the start of the run.
    pub at: f32,
    #[serde(flatten)]
    pub action: ScriptAction,
}

impl ScriptEvent {
    pub fn apply(&self, sim: &mut Simulation) {
        log::debug!("t={:.2}s script: {:?}", self.at, self.action);
        match self.action {
            ScriptAction::Press { action } => sim.press(action),
            ScriptAction::Release { action } => sim.release(action),
            ScriptAction::Orbit { radians } => sim.view_mut().orbit(radians),
            ScriptAction::View { mode } => switch_view(sim, mode),
            ScriptAction::ToggleView => {
                let mode = sim.mode().toggled();
                switch_view(sim, mode);
            }
            ScriptAction::Gravity { value } => sim.settings_mut().gravity = value,
            ScriptAction::Reset => {
                sim.release_all();
                sim.reset();
            }
        }
    }
}

fn switch_view(sim: &mut Simulation, mode: ViewMode) {
    sim.set_view_mode(mode);
    log::info!(
        "view {mode:?}: actor {}",
        if mode.actor_visible() { "shown" } else { "hidden" }
    );
}

/// Time-ordered input events, consumed as the run advances.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    events: Vec<ScriptEvent>,
    next: usize,
}

impl Timeline {
    pub fn new(mut events: Vec<ScriptEvent>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, next: 0 }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let events: Vec<ScriptEvent> = serde_json::from_str(&text)
            .with_context(|| format!("parsing script {}", path.display()))?;
        for event in &events {
            ensure!(
                event.at.is_finite() && event.at >= 0.0,
                "script event time must be a non-negative number, got {}",
                event.at
            );
            if let ScriptAction::Gravity { value } = event.action {
                ensure!(value.is_finite(), "script gravity must be finite, got {value}");
            }
        }
        Ok(Self::new(events))
    }

    /// Walk to the ramp, climb it, turn around, hop over the gap, then try
    /// the stairs in first person. Ends with a low-gravity hop after a reset.
    pub fn demo() -> Self {
        use InputAction::*;
        use ScriptAction as A;

        let ev = |at: f32, action: ScriptAction| ScriptEvent { at, action };
        Self::new(vec![
            ev(1.0, A::Press { action: Forward }),
            ev(1.5, A::Press { action: Right }),
            ev(2.5, A::Release { action: Right }),
            ev(4.0, A::Orbit { radians: std::f32::consts::FRAC_PI_2 }),
            ev(4.2, A::Press { action: Jump }),
            ev(4.2, A::Release { action: Jump }),
            ev(6.0, A::Release { action: Forward }),
            ev(6.5, A::View { mode: ViewMode::FirstPerson }),
            ev(6.5, A::Press { action: Left }),
            ev(8.0, A::Press { action: Backward }),
            ev(9.0, A::Release { action: Left }),
            ev(9.0, A::Release { action: Backward }),
            ev(9.5, A::ToggleView),
            ev(10.0, A::Reset),
            ev(10.2, A::Press { action: Forward }),
            ev(10.5, A::Gravity { value: -8.0 }),
            ev(10.6, A::Press { action: Jump }),
            ev(10.6, A::Release { action: Jump }),
            ev(11.5, A::Gravity { value: -30.0 }),
        ])
    }

    /// Events due at or before `now` that have not fired yet.
    pub fn due(&mut self, now: f32) -> &[ScriptEvent] {
        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].at <= now {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
