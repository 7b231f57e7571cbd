// Arcade mixing: combined velocity/rotation intent -> independent left/right duty
//
// Convention: left = v + r, right = v - r, each side clamped to [-1, 1] on its own.
// No desaturation is applied, so at full velocity a turn request only slows the
// outer side down once the inner side saturates.

/// Maximum duty magnitude accepted by the motor groups
pub const MAX_DUTY: f64 = 1.0;

/// Left/right duty commands in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveOutput {
    pub left: f64,
    pub right: f64,
}

impl DriveOutput {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Clamp a single side to the duty range; NaN becomes a stop
fn clamp_duty(duty: f64) -> f64 {
    if duty.is_nan() {
        0.0
    } else {
        duty.clamp(-MAX_DUTY, MAX_DUTY)
    }
}

/// Mix a velocity and rotation intent into per-side duty
pub fn arcade_mix(velocity: f64, rotation: f64) -> DriveOutput {
    DriveOutput {
        left: clamp_duty(velocity + rotation),
        right: clamp_duty(velocity - rotation),
    }
}
