//! Command types for robot control and inter-task communication.
//!
//! Defines the motion command sampled from the external input decoder and
//! the pulse frame handed to the external servo bus driver.
use crate::gait::pattern::Gait;
use crate::kinematics::vector::Vec3;
use crate::robot::config::{RobotConfig, SERVO_COUNT};
use crate::robot::leg::Leg;

/// Desired body motion, refreshed by the input collaborator each sample.
#[derive(Debug, Clone, Copy)]
pub struct MotionCommand {
    /// Body velocity [m/s]; x right, y forward, z ignored.
    pub velocity: Vec3,
    /// Yaw rate [rad/s], positive counter-clockwise seen from above.
    pub turn_rate: f32,
    pub gait: Gait,
    /// Explicit foothold for the positioning gait, body frame.
    pub foot_target: Option<(Leg, Vec3)>,
}

impl MotionCommand {
    /// Bound the command to the configured speed limits.
    pub fn clamped(&self, config: &RobotConfig) -> Self {
        let mut out = *self;
        out.velocity.z = 0.0;
        let speed = out.velocity.length();
        if speed > config.speed_limit {
            out.velocity = out.velocity * (config.speed_limit / speed);
        }
        out.turn_rate = out
            .turn_rate
            .clamp(-config.turn_rate_limit, config.turn_rate_limit);
        out
    }
}

impl Default for MotionCommand {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            turn_rate: 0.0,
            gait: Gait::Target,
            foot_target: None,
        }
    }
}

/// One calibrated pulse on the servo bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseCommand {
    pub channel: u8,
    pub width_us: u16,
}

/// One servo-update tick of bus traffic, in fixed channel order
/// (legs fr..bl, joints tibia, femur, coxa).
#[derive(Debug, Clone, Copy)]
pub struct ServoFrame {
    pub pulses: [PulseCommand; SERVO_COUNT],
}
