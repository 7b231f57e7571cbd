// Controller state -> drive intent and drive actions

use crate::messages::ControllerState;
use crate::profile::ResolvedBindings;

/// Velocity/rotation intent handed to `DriveController::arcade_drive`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveIntent {
    pub velocity: f64,
    pub rotation: f64,
}

impl DriveIntent {
    /// Velocity from the left stick, rotation from the angle of the stick pair
    ///
    /// With the left stick centered the ratio is infinite, so a pure right stick
    /// push saturates the rotation at ±π/2. Both sticks centered gives 0.
    pub fn from_controller(state: &ControllerState) -> Self {
        let rotation = (state.right_x / state.left_y).atan();
        Self {
            velocity: state.left_y,
            rotation: if rotation.is_nan() { 0.0 } else { rotation },
        }
    }
}

/// Drive actions requested by the buttons during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveActions {
    pub toggle_mode: bool,
    pub increment: bool,
    pub decrement: bool,
}

/// Tracks button state across ticks
///
/// The mode switch fires once per press. Increment and decrement fire on
/// every tick the button is held.
pub struct ButtonTracker {
    bindings: ResolvedBindings,
    mode_switch_was_pressed: bool,
}

impl ButtonTracker {
    pub fn new(bindings: ResolvedBindings) -> Self {
        Self {
            bindings,
            mode_switch_was_pressed: false,
        }
    }

    pub fn update(&mut self, state: &ControllerState) -> DriveActions {
        let mode_pressed = state.is_pressed(self.bindings.mode_switch);
        let actions = DriveActions {
            toggle_mode: mode_pressed && !self.mode_switch_was_pressed,
            increment: state.is_pressed(self.bindings.increment),
            decrement: state.is_pressed(self.bindings.decrement),
        };
        self.mode_switch_was_pressed = mode_pressed;
        actions
    }

    /// Forget held buttons, e.g. after controller input went stale
    pub fn reset(&mut self) {
        self.mode_switch_was_pressed = false;
    }
}
