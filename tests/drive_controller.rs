use std::f64::consts::PI;

use magnus_drive_runtime::config::DriveConfig;
use magnus_drive_runtime::drive::{
    arcade_mix, wrap_angle, DriveController, DrivingMode, MotorRates,
};
use magnus_drive_runtime::profile::DriverProfile;

const EPS: f64 = 1e-9;

fn profile(step: f64) -> DriverProfile {
    DriverProfile {
        speed_coefficient_step: step,
        coefficient_bounds: None,
        ..*DriverProfile::default_profile()
    }
}

fn intents() -> Vec<f64> {
    (0..=20).map(|i| -1.0 + 0.1 * i as f64).collect()
}

fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_angle(a - b).abs()
}

#[test]
fn normal_mode_matches_scaled_mix() {
    let mut drive = DriveController::new(DriveConfig::default(), &profile(0.25));
    drive.decrement_coefficient(); // 0.75
    let coefficient = drive.speed_coefficient();

    for &v in &intents() {
        for &r in &intents() {
            let out = drive.arcade_drive(v, r);
            let expected = arcade_mix(-v * coefficient, -r);
            assert_eq!(out, expected, "v={} r={}", v, r);
            assert!(out.left.abs() <= 1.0 && out.right.abs() <= 1.0);
        }
    }
}

#[test]
fn precision_mode_matches_fixed_multiplier() {
    let mut drive = DriveController::new(DriveConfig::default(), &profile(0.25));
    drive.increment_coefficient();
    drive.set_driving_mode(DrivingMode::Precision);

    for &v in &intents() {
        for &r in &intents() {
            let out = drive.arcade_drive(v, r);
            assert_eq!(out, arcade_mix(-v * 0.20, -r * 0.20), "v={} r={}", v, r);
        }
    }
}

#[test]
fn toggle_twice_restores_mode() {
    let mut drive = DriveController::new(DriveConfig::default(), &profile(0.05));
    for start in [DrivingMode::Normal, DrivingMode::Precision] {
        drive.set_driving_mode(start);
        drive.toggle_driving_mode();
        assert_ne!(drive.driving_mode(), start);
        drive.toggle_driving_mode();
        assert_eq!(drive.driving_mode(), start);
    }
}

#[test]
fn increment_then_decrement_restores_coefficient() {
    for step in [0.005, 0.01, 0.05, 0.1, 0.3] {
        let mut drive = DriveController::new(DriveConfig::default(), &profile(step));
        let before = drive.speed_coefficient();
        drive.increment_coefficient();
        drive.decrement_coefficient();
        assert!(
            (drive.speed_coefficient() - before).abs() < EPS,
            "step {} drifted to {}",
            step,
            drive.speed_coefficient()
        );
    }
}

#[test]
fn heading_integrates_and_wraps() {
    // omega = (right - left) / track_width = π rad/s
    let config = DriveConfig {
        track_width: 1.0,
        ticks_to_meters: 1.0,
        ..DriveConfig::default()
    };
    let mut drive = DriveController::new(config, &profile(0.05));
    let rates = MotorRates::new(-PI / 2.0, -PI / 2.0, PI / 2.0, PI / 2.0);
    let dt = 0.02;

    let mut wrapped = false;
    let mut previous = drive.heading().radians();
    for n in 1..=200 {
        drive.periodic_update(rates, dt);
        let heading = drive.heading().radians();
        assert!((-PI..PI).contains(&heading), "heading {} out of range", heading);
        let expected = PI * dt * n as f64;
        assert!(
            angle_diff(heading, expected) < EPS,
            "tick {}: heading {} expected {}",
            n,
            heading,
            wrap_angle(expected)
        );
        if heading < previous {
            wrapped = true;
        }
        previous = heading;
    }

    assert!(wrapped, "heading never wrapped");
    assert!(angle_diff(drive.heading().radians(), 0.0) < EPS);
}

#[test]
fn wheel_speeds_use_matching_side_motors() {
    let config = DriveConfig {
        ticks_to_meters: 0.001,
        ..DriveConfig::default()
    };
    let mut drive = DriveController::new(config, &profile(0.05));
    drive.periodic_update(MotorRates::new(10.0, 8.0, 6.0, 4.0), 0.02);
    assert!((drive.left_velocity() - 0.010).abs() < EPS);
    assert!((drive.right_velocity() - 0.006).abs() < EPS);
}

#[test]
fn full_forward_intent_saturates_both_sides() {
    let mut drive = DriveController::new(DriveConfig::default(), DriverProfile::default_profile());
    let out = drive.arcade_drive(1.0, 0.0);
    assert_eq!(out.left, -1.0);
    assert_eq!(out.right, -1.0);
}

#[test]
fn drive_and_estimator_order_does_not_matter() {
    let rates = MotorRates::new(1200.0, 1100.0, 900.0, 950.0);

    let mut a = DriveController::new(DriveConfig::default(), DriverProfile::default_profile());
    let out_a = a.arcade_drive(0.4, -0.3);
    a.periodic_update(rates, 0.02);

    let mut b = DriveController::new(DriveConfig::default(), DriverProfile::default_profile());
    b.periodic_update(rates, 0.02);
    let out_b = b.arcade_drive(0.4, -0.3);

    assert_eq!(out_a, out_b);
    assert_eq!(a.heading(), b.heading());
    assert_eq!(a.wheel_speeds(), b.wheel_speeds());
}
