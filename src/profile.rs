// Driver profiles: per-driver tuning and button bindings, resolved once at startup
//
// Every profile lives in the static PROFILES table. A binding left as None falls
// back to the default profile's binding when the profile is resolved.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ConfigError;

/// Buttons on the driver's gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    LeftStick,
    RightStick,
    Back,
    Start,
}

/// Inclusive range the speed coefficient is held to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientBounds {
    pub min: f64,
    pub max: f64,
}

impl CoefficientBounds {
    /// Bounds must be finite and ordered, `f64::clamp` panics otherwise
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "coefficient_bounds",
                reason: format!("must be finite, got [{}, {}]", self.min, self.max),
            });
        }
        if self.min > self.max {
            return Err(ConfigError::Invalid {
                field: "coefficient_bounds",
                reason: format!("min {} is greater than max {}", self.min, self.max),
            });
        }
        Ok(())
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Optional bindings as written in a profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverBindings {
    pub mode_switch: Option<Button>,
    pub increment: Option<Button>,
    pub decrement: Option<Button>,
    pub intake_in: Option<Button>,
    pub intake_out: Option<Button>,
    pub left_arm: Option<Button>,
    pub right_arm: Option<Button>,
    pub control_mode_switch: Option<Button>,
}

/// Bindings after default fallback; every action has a button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBindings {
    pub mode_switch: Button,
    pub increment: Button,
    pub decrement: Button,
    pub intake_in: Button,
    pub intake_out: Button,
    pub left_arm: Button,
    pub right_arm: Button,
    pub control_mode_switch: Button,
}

/// Tuning and bindings for one driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverProfile {
    pub name: &'static str,
    pub controller_port: u8,
    pub speed_coefficient_step: f64,
    pub coefficient_bounds: Option<CoefficientBounds>,
    pub bindings: DriverBindings,
}

pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Fallback bindings used for anything a profile leaves unbound
pub const DEFAULT_BINDINGS: ResolvedBindings = ResolvedBindings {
    mode_switch: Button::A,
    increment: Button::RightBumper,
    decrement: Button::LeftBumper,
    intake_in: Button::X,
    intake_out: Button::B,
    left_arm: Button::LeftTrigger,
    right_arm: Button::RightTrigger,
    control_mode_switch: Button::Y,
};

pub static PROFILES: &[DriverProfile] = &[
    DriverProfile {
        name: DEFAULT_PROFILE_NAME,
        controller_port: 0,
        speed_coefficient_step: 0.005,
        coefficient_bounds: Some(CoefficientBounds { min: 0.1, max: 1.0 }),
        bindings: DriverBindings {
            mode_switch: Some(DEFAULT_BINDINGS.mode_switch),
            increment: Some(DEFAULT_BINDINGS.increment),
            decrement: Some(DEFAULT_BINDINGS.decrement),
            intake_in: Some(DEFAULT_BINDINGS.intake_in),
            intake_out: Some(DEFAULT_BINDINGS.intake_out),
            left_arm: Some(DEFAULT_BINDINGS.left_arm),
            right_arm: Some(DEFAULT_BINDINGS.right_arm),
            control_mode_switch: Some(DEFAULT_BINDINGS.control_mode_switch),
        },
    },
    // Competition driver: faster coefficient ramp, mode switch on the stick click
    DriverProfile {
        name: "competition",
        controller_port: 0,
        speed_coefficient_step: 0.01,
        coefficient_bounds: Some(CoefficientBounds { min: 0.2, max: 1.0 }),
        bindings: DriverBindings {
            mode_switch: Some(Button::RightStick),
            increment: Some(Button::RightBumper),
            decrement: Some(Button::LeftBumper),
            intake_in: None,
            intake_out: None,
            left_arm: Some(Button::LeftTrigger),
            right_arm: Some(Button::RightTrigger),
            control_mode_switch: None,
        },
    },
    // Pit testing: no coefficient bound, only drive bindings set
    DriverProfile {
        name: "pit",
        controller_port: 1,
        speed_coefficient_step: 0.05,
        coefficient_bounds: None,
        bindings: DriverBindings {
            mode_switch: Some(Button::Start),
            increment: Some(Button::Y),
            decrement: Some(Button::A),
            intake_in: None,
            intake_out: None,
            left_arm: None,
            right_arm: None,
            control_mode_switch: None,
        },
    },
];

impl DriverProfile {
    /// Find a profile by name
    pub fn lookup(name: &str) -> Option<&'static DriverProfile> {
        PROFILES.iter().find(|profile| profile.name == name)
    }

    pub fn default_profile() -> &'static DriverProfile {
        &PROFILES[0]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed_coefficient_step.is_finite() {
            return Err(ConfigError::Invalid {
                field: "speed_coefficient_step",
                reason: format!("must be finite, got {}", self.speed_coefficient_step),
            });
        }
        match self.coefficient_bounds {
            Some(bounds) => bounds.validate(),
            None => Ok(()),
        }
    }
}

/// Resolve a profile by name, failing on names not in the table
pub fn resolve_profile(name: &str) -> Result<DriverProfile, ConfigError> {
    let profile =
        DriverProfile::lookup(name).ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
    profile.validate()?;
    info!(
        "Driver profile '{}' (controller port {}, coefficient step {})",
        profile.name, profile.controller_port, profile.speed_coefficient_step
    );
    Ok(*profile)
}

fn or_default(binding: Option<Button>, default: Button, label: &str) -> Button {
    match binding {
        Some(button) => button,
        None => {
            warn!("{} unbound; set to default {:?}", label, default);
            default
        }
    }
}

impl DriverBindings {
    /// Fill every missing binding from the defaults
    pub fn resolve(&self) -> ResolvedBindings {
        let d = DEFAULT_BINDINGS;
        ResolvedBindings {
            mode_switch: or_default(self.mode_switch, d.mode_switch, "mode_switch"),
            increment: or_default(self.increment, d.increment, "increment"),
            decrement: or_default(self.decrement, d.decrement, "decrement"),
            intake_in: or_default(self.intake_in, d.intake_in, "intake_in"),
            intake_out: or_default(self.intake_out, d.intake_out, "intake_out"),
            left_arm: or_default(self.left_arm, d.left_arm, "left_arm"),
            right_arm: or_default(self.right_arm, d.right_arm, "right_arm"),
            control_mode_switch: or_default(
                self.control_mode_switch,
                d.control_mode_switch,
                "control_mode_switch",
            ),
        }
    }
}
