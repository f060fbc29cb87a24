use serde::{Deserialize, Serialize};

use crate::{
    collision::Vec3,
    constants::{LOCAL_BACKWARD, LOCAL_FORWARD, LOCAL_LEFT, LOCAL_RIGHT},
};

/// Player actions the controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

/// Currently held directional inputs.
///
/// Only the held state matters; nothing is buffered. Jump is a trigger and is
/// handled at press time, so it has no flag here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Record a press (`held = true`) or release of a directional action.
    pub fn set(&mut self, action: InputAction, held: bool) {
        match action {
            InputAction::Forward => self.forward = held,
            InputAction::Backward => self.backward = held,
            InputAction::Left => self.left = held,
            InputAction::Right => self.right = held,
            InputAction::Jump => {}
        }
    }

    #[inline]
    pub fn any_held(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Actor-local unit directions of every held input.
    pub fn held_directions(&self) -> impl Iterator<Item = Vec3> {
        [
            (self.forward, LOCAL_FORWARD),
            (self.backward, LOCAL_BACKWARD),
            (self.left, LOCAL_LEFT),
            (self.right, LOCAL_RIGHT),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }
}
