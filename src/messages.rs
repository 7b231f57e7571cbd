// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::drive::DriveOutput;
use crate::profile::Button;

// Controller state from the input collaborator -> runtime
// Axes follow the gamepad convention: pushing the left stick forward gives a negative left_y
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub left_y: f64,
    pub right_x: f64,
    #[serde(default)]
    pub pressed: Vec<Button>,
}

impl ControllerState {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

// Actuation output from runtime -> motor groups
// Default is a stop, sent whenever the watchdog trips
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DriveActuation {
    pub left: f64,
    pub right: f64,
}

impl From<DriveOutput> for DriveActuation {
    fn from(output: DriveOutput) -> Self {
        Self {
            left: output.left,
            right: output.right,
        }
    }
}

/// Watchdog state of the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}
