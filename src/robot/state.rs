use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::gait::pattern::LegState;
use crate::robot::config::{LEG_COUNT, SERVOS_PER_LEG};
use crate::robot::leg::Leg;

/// Snapshot of the locomotion state, refreshed every servo tick and
/// consumed by the telemetry reporter.
#[derive(Debug, Clone, Copy)]
pub struct RobotState {
    pub phases: [LegState; LEG_COUNT],
    /// Servo-frame joint angles [rad]; columns tibia, femur, coxa.
    pub angles: [[f32; SERVOS_PER_LEG]; LEG_COUNT],
    /// Legs currently holding their last valid pose after an
    /// unreachable target.
    pub faults: [bool; LEG_COUNT],
    /// Joints whose pulse hit a mechanical/configuration limit.
    pub saturated: [[bool; SERVOS_PER_LEG]; LEG_COUNT],
}

impl RobotState {
    pub const fn empty() -> Self {
        Self {
            phases: [LegState::Stop; LEG_COUNT],
            angles: [[0.0; SERVOS_PER_LEG]; LEG_COUNT],
            faults: [false; LEG_COUNT],
            saturated: [[false; SERVOS_PER_LEG]; LEG_COUNT],
        }
    }

    pub fn faulted_legs(&self) -> Vec<Leg, LEG_COUNT> {
        let mut legs = Vec::new();
        for leg in Leg::ALL {
            if self.faults[leg as usize] {
                let _ = legs.push(leg);
            }
        }
        legs
    }
}

pub static ROBOT_STATE: Mutex<CriticalSectionRawMutex, RefCell<RobotState>> =
    Mutex::new(RefCell::new(RobotState::empty()));
