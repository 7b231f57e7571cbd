// Loop timing, topics, drivetrain hardware constants
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Controller input timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Motor rate timeout: older samples are treated as a stopped drivetrain
pub const SENSOR_TIMEOUT: Duration = Duration::from_millis(100);

// Zenoh topics
pub const TOPIC_INPUT_CONTROLLER: &str = "magnus/input/controller"; // driver controller state
pub const TOPIC_SENSOR_DRIVE: &str = "magnus/sensor/drive"; // raw drive motor rates
pub const TOPIC_RT_DRIVE: &str = "magnus/rt/drive"; // left/right duty

// Drivetrain hardware information
pub const TRACK_WIDTH: f64 = 0.5588; // meters, 22 in between wheel centers
pub const ENCODER_TICK_TO_METER_FACTOR: f64 = 0.000_048_7; // meters per encoder tick

// Fixed multiplier applied to velocity and rotation in precision mode
pub const PRECISION_MULTIPLIER: f64 = 0.20;

// Speed coefficient at startup
pub const INITIAL_SPEED_COEFFICIENT: f64 = 1.0;

// Fixed intent driven in autonomous: turn in place
pub const AUTONOMOUS_VELOCITY: f64 = 0.0;
pub const AUTONOMOUS_ROTATION: f64 = 0.5;

/// Errors raised while resolving configuration at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown driver profile '{0}'")]
    UnknownProfile(String),
}

/// Drivetrain constants consumed by the drive controller
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub track_width: f64,
    pub ticks_to_meters: f64,
    pub precision_multiplier: f64,
    pub initial_coefficient: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            track_width: TRACK_WIDTH,
            ticks_to_meters: ENCODER_TICK_TO_METER_FACTOR,
            precision_multiplier: PRECISION_MULTIPLIER,
            initial_coefficient: INITIAL_SPEED_COEFFICIENT,
        }
    }
}

impl DriveConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: DriveConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the drive core cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.track_width.is_finite() && self.track_width > 0.0) {
            return Err(ConfigError::Invalid {
                field: "track_width",
                reason: format!("must be a positive finite number, got {}", self.track_width),
            });
        }
        let finite = [
            ("ticks_to_meters", self.ticks_to_meters),
            ("precision_multiplier", self.precision_multiplier),
            ("initial_coefficient", self.initial_coefficient),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        Ok(())
    }
}
