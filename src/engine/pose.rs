//! Body pose composition.
//!
//! The body can translate and tilt while the feet stay planted; seen
//! from the body frame every foothold moves the opposite way. Composing
//! a foot target therefore applies the inverse body transform to the
//! neutral foothold plus the gait's phase offset.
use crate::kinematics::vector::Vec3;
use crate::robot::config::RobotConfig;
use crate::robot::leg::Leg;

/// Commanded body posture relative to the neutral stance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyPose {
    /// Body translation [m].
    pub translation: Vec3,
    /// Roll, pitch, yaw [rad] as x, y, z.
    pub orientation: Vec3,
}

impl BodyPose {
    /// Bound the pose to the configured translation/rotation limits, so
    /// no commanded posture can push a leg past its reach.
    pub fn clamped(&self, config: &RobotConfig) -> Self {
        let t = config.translation_limit;
        let r = config.rotation_limit;
        Self {
            translation: Vec3::new(
                self.translation.x.clamp(-t, t),
                self.translation.y.clamp(-t, t),
                self.translation.z.clamp(-t, t),
            ),
            orientation: Vec3::new(
                self.orientation.x.clamp(-r, r),
                self.orientation.y.clamp(-r, r),
                self.orientation.z.clamp(-r, r),
            ),
        }
    }
}

impl BodyPose {
    /// Move at most `translation_step`/`rotation_step` toward `goal`,
    /// per component. Keeps commanded posture jumps from turning into
    /// servo steps between two ticks.
    pub fn approach(&self, goal: &BodyPose, translation_step: f32, rotation_step: f32) -> Self {
        fn step(from: f32, to: f32, max: f32) -> f32 {
            from + (to - from).clamp(-max, max)
        }

        Self {
            translation: Vec3::new(
                step(self.translation.x, goal.translation.x, translation_step),
                step(self.translation.y, goal.translation.y, translation_step),
                step(self.translation.z, goal.translation.z, translation_step),
            ),
            orientation: Vec3::new(
                step(self.orientation.x, goal.orientation.x, rotation_step),
                step(self.orientation.y, goal.orientation.y, rotation_step),
                step(self.orientation.z, goal.orientation.z, rotation_step),
            ),
        }
    }
}

/// Foot target for one leg in the body frame: the world-fixed foothold
/// seen from a body that has moved away from its neutral pose. The
/// caller clamps the pose first.
pub fn compose_foot_target(
    config: &RobotConfig,
    leg: Leg,
    gait_offset: Vec3,
    pose: &BodyPose,
) -> Vec3 {
    let foothold = config.neutral_foot(leg) + gait_offset;
    (foothold - pose.translation)
        .rotate_z(-pose.orientation.z)
        .rotate_y(-pose.orientation.y)
        .rotate_x(-pose.orientation.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::conversion::deg_to_rad;
    use micromath::F32Ext;

    #[test]
    fn neutral_pose_is_the_identity() {
        let config = RobotConfig::new();
        let pose = BodyPose::default();
        for leg in Leg::ALL {
            let target = compose_foot_target(&config, leg, Vec3::ZERO, &pose);
            assert!((target - config.neutral_foot(leg)).length() < 1e-4);
        }
    }

    #[test]
    fn raising_the_body_lowers_every_foothold() {
        let config = RobotConfig::new();
        let pose = BodyPose {
            translation: Vec3::new(0.0, 0.0, 0.03),
            ..Default::default()
        };
        for leg in Leg::ALL {
            let target = compose_foot_target(&config, leg, Vec3::ZERO, &pose);
            assert!((target.z - (config.neutral_height - 0.03)).abs() < 1e-4);
        }
    }

    #[test]
    fn yaw_swings_footholds_the_opposite_way() {
        let config = RobotConfig::new();
        let yaw = deg_to_rad(10.0);
        let pose = BodyPose {
            orientation: Vec3::new(0.0, 0.0, yaw),
            ..Default::default()
        };
        let neutral = config.neutral_foot(Leg::MidRight);
        let target = compose_foot_target(&config, Leg::MidRight, Vec3::ZERO, &pose);
        // Counter-clockwise body yaw pushes the right-side foothold
        // backwards in the body frame.
        assert!(target.y < neutral.y - 1e-3);
        assert!((target.length() - neutral.length()).abs() < 1e-3);
    }

    #[test]
    fn approach_is_rate_limited_and_converges() {
        let goal = BodyPose {
            translation: Vec3::new(0.02, 0.0, -0.04),
            orientation: Vec3::new(0.0, 0.0, 0.1),
        };
        let mut pose = BodyPose::default();
        for _ in 0..3 {
            let next = pose.approach(&goal, 0.005, 0.02);
            assert!((next.translation.z - pose.translation.z).abs() <= 0.005 + 1e-6);
            assert!((next.orientation.z - pose.orientation.z).abs() <= 0.02 + 1e-6);
            pose = next;
        }
        for _ in 0..20 {
            pose = pose.approach(&goal, 0.005, 0.02);
        }
        assert!((pose.translation - goal.translation).length() < 1e-5);
        assert!((pose.orientation - goal.orientation).length() < 1e-5);
    }

    #[test]
    fn pose_limits_cap_the_command() {
        let config = RobotConfig::new();
        let wild = BodyPose {
            translation: Vec3::new(0.4, -0.4, 0.2),
            orientation: Vec3::new(1.0, -1.0, 2.0),
        };
        let clamped = wild.clamped(&config);
        assert_eq!(clamped.translation.x, config.translation_limit);
        assert_eq!(clamped.translation.y, -config.translation_limit);
        assert_eq!(clamped.orientation.z, config.rotation_limit);
        assert_eq!(clamped.orientation.y, -config.rotation_limit);
    }
}
