// Drivetrain controller for Magnus
//
// Owns heading, wheel speed estimate, speed coefficient and driving mode.
// `periodic_update` is the estimator tick, `arcade_drive` is the command path.
// The two touch disjoint state, so callers may run them in either order within a tick.

use tracing::debug;

use super::heading::Heading;
use super::kinematics::{ChassisSpeeds, DifferentialDriveKinematics, MotorRates, WheelSpeeds};
use super::mixing::{arcade_mix, DriveOutput};
use crate::config::DriveConfig;
use crate::profile::{CoefficientBounds, DriverProfile};

/// Driving mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrivingMode {
    /// Velocity scaled by the speed coefficient, rotation at full authority
    #[default]
    Normal,
    /// Velocity and rotation both scaled by the fixed precision multiplier
    Precision,
}

impl DrivingMode {
    pub fn toggled(self) -> Self {
        match self {
            DrivingMode::Normal => DrivingMode::Precision,
            DrivingMode::Precision => DrivingMode::Normal,
        }
    }
}

/// Target pose for the pose overload of arcade drive
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub heading: f64, // radians
}

pub struct DriveController {
    kinematics: DifferentialDriveKinematics,
    ticks_to_meters: f64,
    precision_multiplier: f64,
    coefficient_step: f64,
    coefficient_bounds: Option<CoefficientBounds>,

    heading: Heading,
    wheel_speeds: WheelSpeeds,
    chassis_speeds: ChassisSpeeds,
    speed_coefficient: f64,
    mode: DrivingMode,
    output: DriveOutput,
}

impl DriveController {
    pub fn new(config: DriveConfig, profile: &DriverProfile) -> Self {
        let mut controller = Self {
            kinematics: DifferentialDriveKinematics::new(config.track_width),
            ticks_to_meters: config.ticks_to_meters,
            precision_multiplier: config.precision_multiplier,
            coefficient_step: profile.speed_coefficient_step,
            coefficient_bounds: profile.coefficient_bounds,
            heading: Heading::default(),
            wheel_speeds: WheelSpeeds::zero(),
            chassis_speeds: ChassisSpeeds::default(),
            speed_coefficient: config.initial_coefficient,
            mode: DrivingMode::Normal,
            output: DriveOutput::zero(),
        };
        // Starting coefficient is held to the profile bounds like any later step
        controller.set_coefficient(config.initial_coefficient);
        controller
    }

    /// Mix a velocity/rotation intent into left/right duty for the active mode
    ///
    /// Both intents are negated: on this robot forward motion is a negative
    /// stick value. Out-of-range intents are not rejected, the mixer clamps
    /// each side to [-1, 1].
    pub fn arcade_drive(&mut self, velocity: f64, rotation: f64) -> DriveOutput {
        let (velocity, rotation) = match self.mode {
            DrivingMode::Precision => (
                -velocity * self.precision_multiplier,
                -rotation * self.precision_multiplier,
            ),
            DrivingMode::Normal => (-velocity * self.speed_coefficient, -rotation),
        };
        self.output = arcade_mix(velocity, rotation);
        self.output
    }

    /// Drive toward a pose: velocity is the planar distance, rotation the heading in degrees
    pub fn arcade_drive_pose(&mut self, pose: Pose2d) -> DriveOutput {
        let velocity = pose.x.hypot(pose.y);
        self.arcade_drive(velocity, pose.heading.to_degrees())
    }

    /// Estimator tick: refresh wheel speeds and integrate heading
    pub fn periodic_update(&mut self, rates: MotorRates, elapsed_seconds: f64) {
        self.wheel_speeds = WheelSpeeds::from_rates(&rates, self.ticks_to_meters);
        self.chassis_speeds = self.kinematics.to_chassis_speeds(&self.wheel_speeds);
        self.heading.integrate(self.chassis_speeds.omega, elapsed_seconds);
    }

    pub fn toggle_driving_mode(&mut self) {
        self.mode = self.mode.toggled();
        debug!("Driving mode -> {:?}", self.mode);
    }

    pub fn set_driving_mode(&mut self, mode: DrivingMode) {
        self.mode = mode;
    }

    pub fn increment_coefficient(&mut self) {
        self.set_coefficient(self.speed_coefficient + self.coefficient_step);
    }

    pub fn decrement_coefficient(&mut self) {
        self.set_coefficient(self.speed_coefficient - self.coefficient_step);
    }

    fn set_coefficient(&mut self, value: f64) {
        self.speed_coefficient = match self.coefficient_bounds {
            Some(bounds) => bounds.clamp(value),
            None => value,
        };
    }

    /// Left side velocity from the last tick, m/s
    pub fn left_velocity(&self) -> f64 {
        self.wheel_speeds.left
    }

    /// Right side velocity from the last tick, m/s
    pub fn right_velocity(&self) -> f64 {
        self.wheel_speeds.right
    }

    pub fn wheel_speeds(&self) -> WheelSpeeds {
        self.wheel_speeds
    }

    pub fn chassis_speeds(&self) -> ChassisSpeeds {
        self.chassis_speeds
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn driving_mode(&self) -> DrivingMode {
        self.mode
    }

    pub fn speed_coefficient(&self) -> f64 {
        self.speed_coefficient
    }

    /// Last duty command produced by `arcade_drive`
    pub fn output(&self) -> DriveOutput {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn unbounded_profile(step: f64) -> DriverProfile {
        DriverProfile {
            speed_coefficient_step: step,
            coefficient_bounds: None,
            ..*DriverProfile::default_profile()
        }
    }

    fn controller() -> DriveController {
        DriveController::new(DriveConfig::default(), &unbounded_profile(0.05))
    }

    #[test]
    fn test_initial_state() {
        let drive = controller();
        assert_eq!(drive.heading().radians(), 0.0);
        assert_eq!(drive.driving_mode(), DrivingMode::Normal);
        assert_eq!(drive.speed_coefficient(), 1.0);
        assert_eq!(drive.left_velocity(), 0.0);
        assert_eq!(drive.right_velocity(), 0.0);
        assert_eq!(drive.output(), DriveOutput::zero());
    }

    #[test]
    fn test_normal_mode_scales_velocity_only() {
        let mut drive = controller();
        drive.increment_coefficient(); // 1.05
        for _ in 0..10 {
            drive.decrement_coefficient();
        } // 0.55
        let out = drive.arcade_drive(0.5, 0.2);
        let v = -0.5 * drive.speed_coefficient();
        assert!((out.left - (v - 0.2)).abs() < EPS, "left = {}", out.left);
        assert!((out.right - (v + 0.2)).abs() < EPS, "right = {}", out.right);
    }

    #[test]
    fn test_precision_mode_scales_both() {
        let mut drive = controller();
        drive.set_driving_mode(DrivingMode::Precision);
        let out = drive.arcade_drive(1.0, 0.5);
        assert!((out.left - (-0.2 - 0.1)).abs() < EPS);
        assert!((out.right - (-0.2 + 0.1)).abs() < EPS);
    }

    #[test]
    fn test_precision_mode_ignores_coefficient() {
        let mut drive = controller();
        drive.decrement_coefficient();
        drive.set_driving_mode(DrivingMode::Precision);
        let out = drive.arcade_drive(1.0, 0.0);
        assert!((out.left + 0.2).abs() < EPS);
    }

    #[test]
    fn test_output_is_stored() {
        let mut drive = controller();
        let out = drive.arcade_drive(0.3, 0.0);
        assert_eq!(drive.output(), out);
    }

    #[test]
    fn test_pose_overload_delegates() {
        let mut drive = controller();
        let out = drive.arcade_drive_pose(Pose2d {
            x: 0.3,
            y: 0.4,
            heading: 0.0,
        });
        // velocity = |(0.3, 0.4)| = 0.5
        assert!((out.left + 0.5).abs() < EPS);
        assert!((out.right + 0.5).abs() < EPS);

        let mut expected = controller();
        let pose = Pose2d {
            x: 0.0,
            y: 0.0,
            heading: 0.01,
        };
        assert_eq!(
            drive.arcade_drive_pose(pose),
            expected.arcade_drive(0.0, 0.01f64.to_degrees())
        );
    }

    #[test]
    fn test_mode_changes_apply_on_next_call() {
        let mut drive = controller();
        let normal = drive.arcade_drive(0.5, 0.0);
        drive.toggle_driving_mode();
        let precise = drive.arcade_drive(0.5, 0.0);
        assert!(precise.left.abs() < normal.left.abs());
    }

    #[test]
    fn test_bounded_coefficient_clamps() {
        let profile = DriverProfile {
            speed_coefficient_step: 0.3,
            coefficient_bounds: Some(CoefficientBounds { min: 0.1, max: 1.0 }),
            ..*DriverProfile::default_profile()
        };
        let mut drive = DriveController::new(DriveConfig::default(), &profile);
        drive.increment_coefficient();
        assert_eq!(drive.speed_coefficient(), 1.0);
        for _ in 0..10 {
            drive.decrement_coefficient();
        }
        assert_eq!(drive.speed_coefficient(), 0.1);
    }

    #[test]
    fn test_initial_coefficient_clamped_to_bounds() {
        let config = DriveConfig {
            initial_coefficient: 5.0,
            ..DriveConfig::default()
        };
        let drive = DriveController::new(config, DriverProfile::default_profile());
        assert_eq!(drive.speed_coefficient(), 1.0);

        // Without bounds the configured value is used as-is
        let drive = DriveController::new(config, &unbounded_profile(0.05));
        assert_eq!(drive.speed_coefficient(), 5.0);
    }

    #[test]
    fn test_unbounded_coefficient_drifts() {
        let mut drive = controller();
        for _ in 0..40 {
            drive.decrement_coefficient();
        }
        assert!(drive.speed_coefficient() < 0.0);
        // A negative coefficient reverses the velocity intent
        let out = drive.arcade_drive(0.5, 0.0);
        assert!(out.left > 0.0);
    }

    #[test]
    fn test_periodic_update_is_deterministic() {
        let rates = MotorRates::new(1000.0, 900.0, 2000.0, 1500.0);
        let mut a = controller();
        let mut b = controller();
        for _ in 0..50 {
            a.periodic_update(rates, 0.02);
            b.periodic_update(rates, 0.02);
        }
        assert_eq!(a.heading(), b.heading());
        assert_eq!(a.wheel_speeds(), b.wheel_speeds());
    }

    #[test]
    fn test_wheel_speeds_overwritten_each_tick() {
        let mut drive = controller();
        drive.periodic_update(MotorRates::new(1000.0, 0.0, 1000.0, 0.0), 0.02);
        drive.periodic_update(MotorRates::default(), 0.02);
        assert_eq!(drive.left_velocity(), 0.0);
        assert_eq!(drive.right_velocity(), 0.0);
    }

    #[test]
    fn test_chassis_speeds_follow_wheels() {
        let config = DriveConfig {
            track_width: 0.5,
            ticks_to_meters: 0.001,
            ..DriveConfig::default()
        };
        let mut drive = DriveController::new(config, DriverProfile::default_profile());
        drive.periodic_update(MotorRates::new(-1000.0, -1000.0, 1000.0, 1000.0), 0.0);
        let chassis = drive.chassis_speeds();
        assert!(chassis.vx.abs() < EPS);
        assert!((chassis.omega - 4.0).abs() < EPS);
        // Zero elapsed time leaves the heading alone
        assert_eq!(drive.heading().radians(), 0.0);
    }
}
