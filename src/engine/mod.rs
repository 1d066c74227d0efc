//! Locomotion engine: the per-tick orchestration pipeline.
//!
//! Each servo-update tick the engine clamps the incoming command,
//! arbitrates gait changes, advances the gait state machine, composes a
//! pose-adjusted foot target per leg, solves the leg kinematics, and
//! maps the joint angles to calibrated pulses for the external bus.
//! A leg whose target is unreachable holds its last valid joints and
//! raises a fault flag; the tick itself never aborts.
use log::{info, warn};

use crate::gait::machine::GaitMachine;
use crate::gait::pattern::{Gait, LegState};
use crate::kinematics::conversion::{angle_to_pulse, servo_channel};
use crate::kinematics::ik::{self, JointAngles};
use crate::robot::commands::{MotionCommand, PulseCommand, ServoFrame};
use crate::robot::config::{ConfigError, RobotConfig, LEG_COUNT, SERVOS_PER_LEG, SERVO_COUNT};
use crate::robot::joint::Joint;
use crate::robot::leg::Leg;
use crate::robot::state::RobotState;

pub mod pose;

use pose::{compose_foot_target, BodyPose};

pub struct LocomotionEngine {
    config: RobotConfig,
    machine: GaitMachine,
    /// Geometric joint angles currently commanded, per leg.
    angles: [JointAngles; LEG_COUNT],
    /// Geometric joint angles of the neutral stance; the servo zero
    /// reference, solved once at startup.
    rest_angles: [JointAngles; LEG_COUNT],
    faults: [bool; LEG_COUNT],
    saturated: [[bool; SERVOS_PER_LEG]; LEG_COUNT],
}

impl LocomotionEngine {
    /// Build an engine from a validated configuration. A configuration
    /// whose neutral stance cannot be solved is rejected outright.
    pub fn new(config: RobotConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rest_angles = [JointAngles::default(); LEG_COUNT];
        for leg in Leg::ALL {
            let i = leg as usize;
            let local = config.neutral_foot(leg) - config.mount_positions[i];
            rest_angles[i] = ik::solve(&config.dims, config.mount_angles[i], local)
                .map_err(|_| ConfigError::NeutralUnreachable)?;
        }

        info!("locomotion engine ready, {LEG_COUNT} legs");
        Ok(Self {
            config,
            machine: GaitMachine::new(Gait::Target),
            angles: rest_angles,
            rest_angles,
            faults: [false; LEG_COUNT],
            saturated: [[false; SERVOS_PER_LEG]; LEG_COUNT],
        })
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn gait(&self) -> Gait {
        self.machine.gait()
    }

    pub fn leg_state(&self, leg: Leg) -> LegState {
        self.machine.state(leg)
    }

    pub fn fault(&self, leg: Leg) -> bool {
        self.faults[leg as usize]
    }

    /// Run one servo-update tick and return the pulse frame for the bus.
    pub fn tick(&mut self, cmd: &MotionCommand, pose: &BodyPose, dt: f32) -> ServoFrame {
        let cmd = cmd.clamped(&self.config);
        let pose = pose.clamped(&self.config);

        // Re-selecting the active gait cancels any still-pending change.
        self.machine.request(cmd.gait);
        self.machine.tick(&self.config, &cmd, dt);

        let mut frame = ServoFrame {
            pulses: [PulseCommand::default(); SERVO_COUNT],
        };
        for leg in Leg::ALL {
            let i = leg as usize;
            let target = compose_foot_target(&self.config, leg, self.machine.offset(leg), &pose);
            let local = target - self.config.mount_positions[i];
            match ik::solve(&self.config.dims, self.config.mount_angles[i], local) {
                Ok(angles) => {
                    self.angles[i] = angles;
                    self.faults[i] = false;
                }
                Err(e) => {
                    // Hold the last valid pose for this leg; the tick
                    // goes on for the other five.
                    if !self.faults[i] {
                        warn!("{leg} target unreachable ({e:?}), holding joints");
                    }
                    self.faults[i] = true;
                }
            }

            for joint in Joint::ALL {
                let j = joint as usize;
                let travel = self.angles[i].get(joint) - self.rest_angles[i].get(joint);
                let pulse = angle_to_pulse(travel, self.config.trims[i][j]);
                self.saturated[i][j] = pulse.saturated;
                let channel = servo_channel(leg, joint);
                frame.pulses[channel as usize] = PulseCommand {
                    channel,
                    width_us: pulse.width_us,
                };
            }
        }
        frame
    }

    /// Telemetry view of the current engine state.
    pub fn snapshot(&self) -> RobotState {
        let mut state = RobotState::empty();
        for leg in Leg::ALL {
            let i = leg as usize;
            state.phases[i] = self.machine.state(leg);
            state.faults[i] = self.faults[i];
            for joint in Joint::ALL {
                let j = joint as usize;
                state.angles[i][j] = self.angles[i].get(joint) - self.rest_angles[i].get(joint);
                state.saturated[i][j] = self.saturated[i][j];
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::vector::Vec3;
    use micromath::F32Ext;

    const DT: f32 = 0.1;

    fn engine() -> LocomotionEngine {
        LocomotionEngine::new(RobotConfig::new()).expect("valid default configuration")
    }

    fn resting_inputs() -> (MotionCommand, BodyPose) {
        (MotionCommand::default(), BodyPose::default())
    }

    #[test]
    fn startup_frame_is_the_trimmed_centre_pose() {
        let mut engine = engine();
        let (cmd, pose) = resting_inputs();
        let frame = engine.tick(&cmd, &pose, DT);

        // Channels come out in bus order.
        for (index, pulse) in frame.pulses.iter().enumerate() {
            assert_eq!(pulse.channel as usize, index);
        }

        // At the neutral stance every joint sits at its trimmed centre:
        // front-right tibia 1450, femur 1550, coxa 1500.
        let expected_fr = [1450i32, 1550, 1500];
        for (channel, expected) in expected_fr.into_iter().enumerate() {
            let width = frame.pulses[channel].width_us as i32;
            assert!(
                (width - expected).abs() <= 2,
                "channel {channel}: {width} vs {expected}"
            );
        }
        for leg in Leg::ALL {
            for joint in Joint::ALL {
                let channel = servo_channel(leg, joint) as usize;
                let trim = engine.config().trims[leg as usize][joint as usize];
                let expected = 1500 + trim as i32;
                let width = frame.pulses[channel].width_us as i32;
                assert!((width - expected).abs() <= 2);
            }
        }
    }

    #[test]
    fn tripod_walk_splits_legs_three_and_three() {
        let mut engine = engine();
        let cmd = MotionCommand {
            velocity: Vec3::new(0.0, 0.02, 0.0),
            gait: Gait::Tripod,
            ..Default::default()
        };
        let pose = BodyPose::default();

        for _ in 0..30 {
            engine.tick(&cmd, &pose, DT);
            let swinging = Leg::ALL
                .iter()
                .filter(|&&leg| engine.leg_state(leg) == LegState::Swing)
                .count();
            let grounded = Leg::ALL
                .iter()
                .filter(|&&leg| engine.leg_state(leg) == LegState::Stance)
                .count();
            assert_eq!(swinging, 3);
            assert_eq!(grounded, 3);
        }
    }

    #[test]
    fn unreachable_target_freezes_the_leg_and_flags_it() {
        let mut engine = engine();
        let pose = BodyPose::default();

        // Ask the positioning mode for a foothold far outside the
        // front-right workspace.
        let cmd = MotionCommand {
            gait: Gait::Target,
            foot_target: Some((Leg::FrontRight, Vec3::new(0.6, 0.6, -0.1))),
            ..Default::default()
        };

        let mut last_fr = [0u16; 3];
        let mut frozen = [0u16; 3];
        let mut faulted = false;
        for _ in 0..40 {
            let frame = engine.tick(&cmd, &pose, DT);
            let fr = [
                frame.pulses[0].width_us,
                frame.pulses[1].width_us,
                frame.pulses[2].width_us,
            ];
            if engine.fault(Leg::FrontRight) {
                if !faulted {
                    // First faulted tick: joints held at the last
                    // reachable solution.
                    assert_eq!(fr, last_fr);
                    frozen = fr;
                    faulted = true;
                } else {
                    assert_eq!(fr, frozen);
                }
            }
            last_fr = fr;
        }
        assert!(faulted, "the target never left the workspace");

        // The other legs keep ticking without faults.
        for leg in [Leg::FrontLeft, Leg::MidRight, Leg::BackLeft] {
            assert!(!engine.fault(leg));
        }
    }

    #[test]
    fn saturated_joint_is_flagged_and_clamped() {
        let mut engine = engine();
        let pose = BodyPose::default();

        // A reachable foothold swivelled far around the coxa needs more
        // than the ±1000 µs of pulse travel.
        let config = RobotConfig::new();
        let mount = config.mount_angles[Leg::FrontRight as usize];
        let heading = mount + 1.8;
        let point = config.mount_positions[Leg::FrontRight as usize]
            + Vec3::new(heading.cos() * 0.15, heading.sin() * 0.15, -0.13);
        let cmd = MotionCommand {
            gait: Gait::Target,
            foot_target: Some((Leg::FrontRight, point)),
            ..Default::default()
        };

        let mut frame = engine.tick(&cmd, &pose, DT);
        for _ in 0..40 {
            frame = engine.tick(&cmd, &pose, DT);
        }
        assert!(!engine.fault(Leg::FrontRight));

        let snapshot = engine.snapshot();
        let coxa = Joint::Coxa as usize;
        assert!(snapshot.saturated[Leg::FrontRight as usize][coxa]);
        let channel = servo_channel(Leg::FrontRight, Joint::Coxa) as usize;
        assert_eq!(frame.pulses[channel].width_us, 2500);
    }

    #[test]
    fn gait_change_is_deferred_until_quiescent() {
        let mut engine = engine();
        let pose = BodyPose::default();
        let walk = MotionCommand {
            velocity: Vec3::new(0.0, 0.02, 0.0),
            gait: Gait::Tripod,
            ..Default::default()
        };

        engine.tick(&walk, &pose, DT);
        assert_eq!(engine.gait(), Gait::Tripod);
        engine.tick(&walk, &pose, DT);

        // Mid-swing request: the active pattern must not change yet.
        let switch = MotionCommand {
            velocity: Vec3::new(0.0, 0.02, 0.0),
            gait: Gait::Wave,
            ..Default::default()
        };
        engine.tick(&switch, &pose, DT);
        assert_eq!(engine.gait(), Gait::Tripod);

        // Halting lets every leg land, then the change commits.
        let halt = MotionCommand {
            gait: Gait::Wave,
            ..Default::default()
        };
        for _ in 0..8 {
            engine.tick(&halt, &pose, DT);
        }
        assert_eq!(engine.gait(), Gait::Wave);
    }

    #[test]
    fn snapshot_mirrors_the_machine() {
        let mut engine = engine();
        let (cmd, pose) = resting_inputs();
        engine.tick(&cmd, &pose, DT);

        let snapshot = engine.snapshot();
        for leg in Leg::ALL {
            assert_eq!(snapshot.phases[leg as usize], engine.leg_state(leg));
            assert!(!snapshot.faults[leg as usize]);
        }
        assert!(snapshot.faulted_legs().is_empty());
    }
}
