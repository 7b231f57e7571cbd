// Robot heading estimate, integrated from chassis angular velocity every tick.

use std::f64::consts::{PI, TAU};

/// Wrap an angle in radians into [-π, π)
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative remainders
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Signed heading in radians, always kept in [-π, π)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Heading {
    radians: f64,
}

impl Heading {
    pub fn from_radians(radians: f64) -> Self {
        Self {
            radians: wrap_angle(radians),
        }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    /// Advance the heading by `omega` (rad/s) over `elapsed_seconds`
    pub fn integrate(&mut self, omega: f64, elapsed_seconds: f64) {
        self.radians = wrap_angle(omega * elapsed_seconds + self.radians);
    }
}
