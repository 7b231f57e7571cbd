// Differential drive kinematics for Magnus' four-motor base
// Converts raw encoder rates into wheel speeds, and wheel speeds into chassis speeds.

use serde::{Deserialize, Serialize};

/// Raw encoder velocity samples for the four drive motors (encoder ticks per time unit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorRates {
    pub front_left: f64,
    pub rear_left: f64,
    pub front_right: f64,
    pub rear_right: f64,
}

impl MotorRates {
    pub fn new(front_left: f64, rear_left: f64, front_right: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            rear_left,
            front_right,
            rear_right,
        }
    }

    /// Left side rate: the faster of the two left motors
    pub fn left(&self) -> f64 {
        self.front_left.max(self.rear_left)
    }

    /// Right side rate: the faster of the two right motors
    pub fn right(&self) -> f64 {
        self.front_right.max(self.rear_right)
    }
}

/// Linear velocity of each drivetrain side in m/s
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Wheel speeds from raw motor rates and a tick-to-meter conversion factor
    pub fn from_rates(rates: &MotorRates, ticks_to_meters: f64) -> Self {
        Self {
            left: rates.left() * ticks_to_meters,
            right: rates.right() * ticks_to_meters,
        }
    }
}

/// Robot-frame velocity: vx, vy in m/s, omega in rad/s (positive = counter-clockwise)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChassisSpeeds {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

/// Forward kinematics for a differential drivetrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDriveKinematics {
    track_width: f64, // meters, distance between left and right wheels
}

impl DifferentialDriveKinematics {
    pub fn new(track_width: f64) -> Self {
        Self { track_width }
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Convert wheel speeds to chassis speeds
    ///
    /// A differential drive cannot move sideways, so `vy` is always zero.
    pub fn to_chassis_speeds(&self, wheels: &WheelSpeeds) -> ChassisSpeeds {
        ChassisSpeeds {
            vx: (wheels.left + wheels.right) / 2.0,
            vy: 0.0,
            omega: (wheels.right - wheels.left) / self.track_width,
        }
    }
}
