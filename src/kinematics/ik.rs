//! Per-leg inverse kinematics.
//!
//! The coxa's horizontal swivel is removed first, then the femur/tibia
//! pair is solved in the vertical plane with the law of cosines. The
//! knee always flexes the same way (tibia angle ≤ 0) so a continuous
//! foot path never flips between elbow configurations.
use micromath::F32Ext;

use crate::kinematics::conversion::wrap_angle;
use crate::kinematics::vector::Vec3;
use crate::robot::config::LegDimensions;
use crate::robot::joint::Joint;

/// Joint angles for one leg [rad], in the solver's geometric frame:
/// coxa from the mount heading, femur from horizontal, tibia from the
/// femur's extension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    pub coxa: f32,
    pub femur: f32,
    pub tibia: f32,
}

impl JointAngles {
    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Tibia => self.tibia,
            Joint::Femur => self.femur,
            Joint::Coxa => self.coxa,
        }
    }
}

/// The requested foothold lies outside the leg's workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IkError {
    /// Farther from the femur pivot than femur + tibia.
    BeyondReach,
    /// Closer to the femur pivot than |femur − tibia|.
    UnderReach,
}

/// Solve joint angles for a foot target given relative to the coxa
/// pivot, in the body frame. The caller keeps its previous angles when
/// this fails.
pub fn solve(dims: &LegDimensions, mount_angle: f32, target: Vec3) -> Result<JointAngles, IkError> {
    let coxa = wrap_angle(target.y.atan2(target.x) - mount_angle);

    // Planar problem in the leg's vertical plane, from the femur pivot.
    let radial = target.horizontal_length() - dims.coxa;
    let height = target.z;
    let d_sq = radial * radial + height * height;
    let d = d_sq.sqrt();

    if d > dims.femur + dims.tibia {
        return Err(IkError::BeyondReach);
    }
    if d < (dims.femur - dims.tibia).abs() {
        return Err(IkError::UnderReach);
    }

    let elevation = height.atan2(radial);
    let femur_cos =
        (dims.femur * dims.femur + d_sq - dims.tibia * dims.tibia) / (2.0 * dims.femur * d);
    let femur = elevation + femur_cos.clamp(-1.0, 1.0).acos();

    let knee_cos =
        (dims.femur * dims.femur + dims.tibia * dims.tibia - d_sq) / (2.0 * dims.femur * dims.tibia);
    let tibia = knee_cos.clamp(-1.0, 1.0).acos() - core::f32::consts::PI;

    Ok(JointAngles { coxa, femur, tibia })
}

/// Foot position produced by a set of joint angles; the inverse of
/// [`solve`], used to close the loop in tests and telemetry.
pub fn forward(dims: &LegDimensions, mount_angle: f32, angles: &JointAngles) -> Vec3 {
    let radial = dims.coxa
        + dims.femur * angles.femur.cos()
        + dims.tibia * (angles.femur + angles.tibia).cos();
    let height = dims.femur * angles.femur.sin() + dims.tibia * (angles.femur + angles.tibia).sin();
    let heading = mount_angle + angles.coxa;
    Vec3::new(radial * heading.cos(), radial * heading.sin(), height)
}
