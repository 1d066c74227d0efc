//! Unit conversions and the calibrated servo pulse mapper.
//!
//! Joint angles are radians around the neutral stance; a centred servo
//! sits at [`SERVO_CENTER_US`] and ±π/2 of travel spans ±1000 µs. The
//! per-joint trim from the calibration table is applied after the linear
//! mapping, and the result saturates at the pulse bounds.
use core::f32::consts::{FRAC_PI_2, PI};

use micromath::F32Ext;

use crate::robot::config::SERVOS_PER_LEG;
use crate::robot::joint::Joint;
use crate::robot::leg::Leg;

pub const DEG_TO_RAD: f32 = 0.017_453_292_519_943_295;
pub const RAD_TO_DEG: f32 = 1.0 / DEG_TO_RAD;

/// Pulse width of a centred servo; zero joint angle before trim.
pub const SERVO_CENTER_US: u16 = 1500;
pub const SERVO_MIN_US: u16 = 500;
pub const SERVO_MAX_US: u16 = 2500;

pub const RAD_TO_SERVO: f32 = 1000.0 / FRAC_PI_2;
pub const SERVO_TO_RAD: f32 = 1.0 / RAD_TO_SERVO;

pub fn deg_to_rad(angle: f32) -> f32 {
    angle * DEG_TO_RAD
}

pub fn rad_to_deg(angle: f32) -> f32 {
    angle * RAD_TO_DEG
}

/// Normalize an angle to (-π, π].
pub fn wrap_angle(mut angle: f32) -> f32 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// A clamped pulse, plus whether clamping cut the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub width_us: u16,
    pub saturated: bool,
}

/// Map a joint angle to its calibrated pulse width.
pub fn angle_to_pulse(angle: f32, trim: i16) -> Pulse {
    let nominal = SERVO_CENTER_US as f32 + angle * RAD_TO_SERVO + trim as f32;
    let clamped = nominal.clamp(SERVO_MIN_US as f32, SERVO_MAX_US as f32);
    Pulse {
        width_us: clamped.round() as u16,
        saturated: clamped != nominal,
    }
}

/// Fixed (leg, joint) → bus channel map: legs fr..bl, joints tibia,
/// femur, coxa within each leg.
pub fn servo_channel(leg: Leg, joint: Joint) -> u8 {
    (leg as usize * SERVOS_PER_LEG + joint as usize) as u8
}
