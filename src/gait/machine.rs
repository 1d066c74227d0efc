//! The per-leg gait state machine.
//!
//! One tick advances every leg's phase: airborne legs travel their swing
//! trajectory, grounded legs slide opposite the body's motion, and the
//! next step group lifts off once every foot is down. Pattern changes
//! are committed only at such a boundary, never mid-swing.
use core::f32::consts::PI;

use log::{debug, info};
use micromath::F32Ext;

use crate::gait::pattern::{Gait, LegState};
use crate::kinematics::vector::Vec3;
use crate::robot::commands::MotionCommand;
use crate::robot::config::{RobotConfig, LEG_COUNT};
use crate::robot::leg::Leg;

/// Below this per-leg ground speed the robot counts as stationary [m/s].
const DRIVE_EPSILON: f32 = 1e-3;

/// Phase bookkeeping for one leg.
#[derive(Debug, Clone, Copy)]
pub struct LegPhase {
    pub state: LegState,
    /// Swing completion in [0, 1].
    progress: f32,
    /// Current foot offset from the neutral foothold, body frame.
    pub offset: Vec3,
    /// Offset at lift-off; start point of the swing interpolation.
    swing_origin: Vec3,
}

impl LegPhase {
    const fn resting() -> Self {
        Self {
            state: LegState::Stop,
            progress: 0.0,
            offset: Vec3::ZERO,
            swing_origin: Vec3::ZERO,
        }
    }
}

pub struct GaitMachine {
    gait: Gait,
    pending: Option<Gait>,
    phases: [LegPhase; LEG_COUNT],
    /// Index into the gait's step sequence of the group now airborne.
    active_group: usize,
}

impl GaitMachine {
    pub fn new(gait: Gait) -> Self {
        let mut machine = Self {
            gait,
            pending: None,
            phases: [LegPhase::resting(); LEG_COUNT],
            active_group: 0,
        };
        machine.apply_start_states();
        machine
    }

    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn state(&self, leg: Leg) -> LegState {
        self.phases[leg as usize].state
    }

    pub fn offset(&self, leg: Leg) -> Vec3 {
        self.phases[leg as usize].offset
    }

    /// Ask for a new pattern; takes effect at the next quiescent boundary.
    pub fn request(&mut self, gait: Gait) {
        if gait != self.gait {
            if self.pending != Some(gait) {
                info!("gait change to {gait} requested");
            }
            self.pending = Some(gait);
        } else {
            self.pending = None;
        }
    }

    /// Advance every leg's phase by one control tick of `dt` seconds.
    pub fn tick(&mut self, config: &RobotConfig, cmd: &MotionCommand, dt: f32) {
        // Re-point the positioning mode at the commanded leg.
        if self.gait == Gait::Target {
            if let Some((leg, _)) = cmd.foot_target {
                let phase = &mut self.phases[leg as usize];
                if phase.state == LegState::Stop {
                    phase.state = LegState::TargetSwing;
                }
            }
        }

        let mut drives = [Vec3::ZERO; LEG_COUNT];
        for leg in Leg::ALL {
            drives[leg as usize] = self.drive(config, cmd, leg);
        }
        let moving = self.gait != Gait::Target
            && drives.iter().any(|d| d.length() > DRIVE_EPSILON);

        for leg in Leg::ALL {
            let i = leg as usize;
            match self.phases[i].state {
                LegState::Swing => self.advance_swing(config, drives[i], i, dt),
                LegState::Stance => self.advance_stance(config, drives[i], moving, i, dt),
                LegState::TargetSwing => self.advance_target(config, cmd, leg, dt),
                LegState::Stop => {}
            }
        }

        // Pattern changes commit only at a phase boundary.
        if let Some(next) = self.pending {
            if self.quiescent(cmd) {
                info!("gait change committed: {} -> {}", self.gait, next);
                self.gait = next;
                self.pending = None;
                self.apply_start_states();
            }
        }

        // Fire the next step group once every foot is grounded.
        if moving && !self.any_airborne() {
            let sequence = self.gait.step_sequence();
            if !sequence.is_empty() {
                self.active_group = (self.active_group + 1) % sequence.len();
                for &leg in sequence[self.active_group] {
                    let phase = &mut self.phases[leg as usize];
                    debug!("{leg} lifts off");
                    phase.state = LegState::Swing;
                    phase.progress = 0.0;
                    phase.swing_origin = phase.offset;
                }
                // Parked legs rejoin propulsion duty when a new step
                // cycle starts.
                for phase in self.phases.iter_mut() {
                    if phase.state == LegState::Stop {
                        phase.state = LegState::Stance;
                    }
                }
            }
        }
    }

    fn apply_start_states(&mut self) {
        let starts = self.gait.start_states();
        for (phase, start) in self.phases.iter_mut().zip(starts) {
            phase.state = start;
            phase.progress = 0.0;
            phase.swing_origin = phase.offset;
        }
        self.active_group = 0;
    }

    fn any_airborne(&self) -> bool {
        self.phases.iter().any(|p| p.state == LegState::Swing)
    }

    /// Safe to commit a pattern change: nothing airborne, and the
    /// positioning mode not actively chasing a target.
    fn quiescent(&self, cmd: &MotionCommand) -> bool {
        self.phases.iter().enumerate().all(|(i, p)| match p.state {
            LegState::Stance | LegState::Stop => true,
            LegState::Swing => false,
            LegState::TargetSwing => {
                !matches!(cmd.foot_target, Some((leg, _)) if leg as usize == i)
            }
        })
    }

    /// Per-leg ground-speed vector: commanded velocity plus the
    /// yaw-rate tangential term at the leg's neutral foothold.
    fn drive(&self, config: &RobotConfig, cmd: &MotionCommand, leg: Leg) -> Vec3 {
        let foot = config.neutral_foot(leg);
        let mut drive = Vec3::new(
            cmd.velocity.x - cmd.turn_rate * foot.y,
            cmd.velocity.y + cmd.turn_rate * foot.x,
            0.0,
        );
        let speed = drive.length();
        if speed > config.speed_limit {
            drive = drive * (config.speed_limit / speed);
        }
        drive
    }

    /// Stride for the current pattern: what the body covers while a leg
    /// is grounded, never more than the configured step length.
    fn stride(&self, config: &RobotConfig, drive_speed: f32) -> f32 {
        let groups = self.gait.step_sequence().len();
        if groups < 2 {
            return 0.0;
        }
        (drive_speed * (groups - 1) as f32 * config.swing_duration).min(config.step_length_max)
    }

    fn advance_swing(&mut self, config: &RobotConfig, drive: Vec3, i: usize, dt: f32) {
        let stride = self.stride(config, drive.length());
        let landing = drive.normalized_or_zero() * (stride * 0.5);

        let phase = &mut self.phases[i];
        phase.progress = (phase.progress + dt / config.swing_duration).min(1.0);
        let t = phase.progress;
        phase.offset = Vec3::new(
            phase.swing_origin.x + (landing.x - phase.swing_origin.x) * t,
            phase.swing_origin.y + (landing.y - phase.swing_origin.y) * t,
            config.swing_height * (PI * t).sin(),
        );

        if phase.progress >= 1.0 {
            phase.state = LegState::Stance;
            phase.progress = 0.0;
            phase.offset = Vec3::new(landing.x, landing.y, 0.0);
        }
    }

    fn advance_stance(&mut self, config: &RobotConfig, drive: Vec3, moving: bool, i: usize, dt: f32) {
        let phase = &mut self.phases[i];
        if moving {
            // Grounded foot slides opposite the body's travel, within
            // the stride budget.
            phase.offset = phase.offset - drive * dt;
            let budget = config.step_length_max * 0.5;
            let travel = phase.offset.horizontal_length();
            if travel > budget {
                let scale = budget / travel;
                phase.offset.x *= scale;
                phase.offset.y *= scale;
            }
            return;
        }

        // Stationary: a displaced foot eases home and parks; a foot
        // already at neutral stays in stance.
        let distance = phase.offset.length();
        if distance > config.settle_tolerance {
            let step = (config.ease_speed * dt).min(distance);
            phase.offset = phase.offset - phase.offset.normalized_or_zero() * step;
            if phase.offset.length() <= config.settle_tolerance {
                phase.offset = Vec3::ZERO;
                phase.state = LegState::Stop;
                debug!("{} parked", Leg::from(i));
            }
        }
    }

    fn advance_target(&mut self, config: &RobotConfig, cmd: &MotionCommand, leg: Leg, dt: f32) {
        let Some((target_leg, point)) = cmd.foot_target else {
            return;
        };
        if target_leg != leg {
            return;
        }

        let goal = point - config.neutral_foot(leg);
        let phase = &mut self.phases[leg as usize];
        let delta = goal - phase.offset;
        let distance = delta.length();
        if distance <= config.settle_tolerance {
            phase.offset = goal;
            phase.state = LegState::Stop;
            info!("{leg} reached its target");
        } else {
            let step = (config.target_speed * dt).min(distance);
            phase.offset = phase.offset + delta.normalized_or_zero() * step;
        }
    }
}
