use core::fmt::Display;

use micromath::F32Ext;

use crate::kinematics::conversion::DEG_TO_RAD;
use crate::kinematics::vector::Vec3;
use crate::robot::leg::Leg;

pub const LEG_COUNT: usize = 6;
pub const SERVOS_PER_LEG: usize = 3;
pub const SERVO_COUNT: usize = LEG_COUNT * SERVOS_PER_LEG;

/// Task cadences [ms]. Input sampling runs in the external decoder.
pub const SERVO_INTERVAL_MS: u64 = 100;
pub const INPUT_INTERVAL_MS: u64 = 50;
pub const TELEMETRY_INTERVAL_MS: u64 = 500;

/// Leg segment lengths [m], proximal to distal.
#[derive(Debug, Clone, Copy)]
pub struct LegDimensions {
    pub coxa: f32,
    pub femur: f32,
    pub tibia: f32,
}

const DIMENSIONS: LegDimensions = LegDimensions {
    coxa: 0.0266,
    femur: 0.08,
    tibia: 0.13,
};

/// Per-leg, per-joint pulse trim [µs]; rows fr..bl, columns tibia, femur, coxa.
const SERVO_TRIMS: [[i16; SERVOS_PER_LEG]; LEG_COUNT] = [
    [-50, 50, 0],
    [-20, -100, -70],
    [-90, -40, 30],
    [-40, 20, 90],
    [-70, -40, 20],
    [20, -80, -60],
];

/// Coxa mount headings [rad], counter-clockwise from +x (right).
const MOUNT_ANGLES: [f32; LEG_COUNT] = [
    30.0 * DEG_TO_RAD,
    150.0 * DEG_TO_RAD,
    0.0,
    180.0 * DEG_TO_RAD,
    330.0 * DEG_TO_RAD,
    210.0 * DEG_TO_RAD,
];

// Coxa pivot positions relative to the body centre [m].
const CORNER_LEG_FORWARD: f32 = 0.08;
const CORNER_LEG_LATERAL: f32 = 0.04;
const MID_LEG_LATERAL: f32 = 0.06;

const MOUNT_POSITIONS: [Vec3; LEG_COUNT] = [
    Vec3::new(CORNER_LEG_LATERAL, CORNER_LEG_FORWARD, 0.0),
    Vec3::new(-CORNER_LEG_LATERAL, CORNER_LEG_FORWARD, 0.0),
    Vec3::new(MID_LEG_LATERAL, 0.0, 0.0),
    Vec3::new(-MID_LEG_LATERAL, 0.0, 0.0),
    Vec3::new(CORNER_LEG_LATERAL, -CORNER_LEG_FORWARD, 0.0),
    Vec3::new(-CORNER_LEG_LATERAL, -CORNER_LEG_FORWARD, 0.0),
];

/// Rejected at startup; the engine refuses to run on a corrupted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    BadDimensions,
    BadTiming,
    TrimOutOfRange,
    NeutralUnreachable,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::BadDimensions => f.write_str("non-positive leg dimension"),
            ConfigError::BadTiming => f.write_str("non-positive swing duration or tolerance"),
            ConfigError::TrimOutOfRange => f.write_str("servo trim out of range"),
            ConfigError::NeutralUnreachable => f.write_str("neutral stance outside leg workspace"),
        }
    }
}

/// Immutable robot configuration, built once at startup and passed by
/// reference; derived values that need runtime math live here rather
/// than in consts.
#[derive(Debug, Clone)]
pub struct RobotConfig {
    pub dims: LegDimensions,
    pub trims: [[i16; SERVOS_PER_LEG]; LEG_COUNT],
    pub mount_angles: [f32; LEG_COUNT],
    pub mount_positions: [Vec3; LEG_COUNT],
    /// Horizontal distance from coxa pivot to the neutral foothold [m].
    pub neutral_reach: f32,
    /// Foothold height below the body at the neutral stance [m].
    pub neutral_height: f32,
    pub step_length_max: f32,
    pub swing_height: f32,
    pub swing_duration: f32,
    pub translation_limit: f32,
    pub rotation_limit: f32,
    pub speed_limit: f32,
    pub turn_rate_limit: f32,
    /// Body pose slew rate between ticks [m/s].
    pub body_speed: f32,
    /// Foot speed in single-leg positioning mode [m/s].
    pub target_speed: f32,
    /// Foot speed when easing back to neutral after stopping [m/s].
    pub ease_speed: f32,
    pub settle_tolerance: f32,
}

impl RobotConfig {
    pub fn new() -> Self {
        let dims = DIMENSIONS;
        let step_length_max = (25.0 * DEG_TO_RAD).sin() * (dims.coxa + dims.femur);

        Self {
            dims,
            trims: SERVO_TRIMS,
            mount_angles: MOUNT_ANGLES,
            mount_positions: MOUNT_POSITIONS,
            neutral_reach: dims.coxa + dims.femur,
            neutral_height: -dims.tibia,
            step_length_max,
            swing_height: 0.03,
            swing_duration: 0.4,
            translation_limit: 0.05,
            rotation_limit: 15.0 * DEG_TO_RAD,
            speed_limit: 0.035,
            turn_rate_limit: 0.5,
            body_speed: 0.05,
            target_speed: 0.3,
            ease_speed: 0.01,
            settle_tolerance: 0.005,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dims.coxa <= 0.0 || self.dims.femur <= 0.0 || self.dims.tibia <= 0.0 {
            return Err(ConfigError::BadDimensions);
        }
        if self.swing_duration <= 0.0 || self.settle_tolerance <= 0.0 {
            return Err(ConfigError::BadTiming);
        }
        for row in &self.trims {
            for &trim in row {
                if trim.unsigned_abs() > 500 {
                    return Err(ConfigError::TrimOutOfRange);
                }
            }
        }
        Ok(())
    }

    /// Neutral foothold for a leg, in the body frame.
    pub fn neutral_foot(&self, leg: Leg) -> Vec3 {
        let i = leg as usize;
        let heading = self.mount_angles[i];
        self.mount_positions[i]
            + Vec3::new(
                heading.cos() * self.neutral_reach,
                heading.sin() * self.neutral_reach,
                self.neutral_height,
            )
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::new()
    }
}
