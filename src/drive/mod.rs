// Drive subsystem for Magnus' differential base
//
// Provides:
// - Differential drive kinematics (encoder rates -> wheel speeds -> chassis speeds)
// - Arcade mixing (velocity/rotation intent -> left/right duty)
// - Heading integration with wrap-around
// - The drive controller tying them together

mod controller;
pub mod heading;
pub mod kinematics;
pub mod mixing;

pub use controller::{DriveController, DrivingMode, Pose2d};
pub use heading::{wrap_angle, Heading};
pub use kinematics::{ChassisSpeeds, DifferentialDriveKinematics, MotorRates, WheelSpeeds};
pub use mixing::{arcade_mix, DriveOutput};
