//! Minimal 3D vector for foot targets and body offsets.
//!
//! Body frame convention: x points right, y points forward, z points up;
//! the origin is the centre of the body at the neutral stance height.
use core::ops::{Add, Mul, Sub};

use micromath::F32Ext;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Length of the projection onto the ground plane.
    pub fn horizontal_length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or zero when the length is numerically zero.
    pub fn normalized_or_zero(&self) -> Self {
        let length = self.length();
        if length < 1e-9 {
            Vec3::ZERO
        } else {
            *self * (1.0 / length)
        }
    }

    pub fn rotate_x(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Vec3::new(self.x, c * self.y - s * self.z, s * self.y + c * self.z)
    }

    pub fn rotate_y(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Vec3::new(c * self.x + s * self.z, self.y, c * self.z - s * self.x)
    }

    pub fn rotate_z(&self, angle: f32) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        Vec3::new(c * self.x - s * self.y, s * self.x + c * self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn length_of_unit_axes() {
        assert!((Vec3::new(1.0, 0.0, 0.0).length() - 1.0).abs() < 1e-3);
        // The fast square root is a few percent off at worst.
        assert!((Vec3::new(0.0, 3.0, 4.0).length() - 5.0).abs() < 0.2);
    }

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vec3::ZERO.normalized_or_zero(), Vec3::ZERO);
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let rotated = Vec3::new(1.0, 0.0, 0.5).rotate_z(FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-6);
        assert!((rotated.y - 1.0).abs() < 1e-6);
        assert!((rotated.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn opposite_rotations_cancel() {
        let v = Vec3::new(0.2, -0.4, 0.6);
        let back = v.rotate_y(0.3).rotate_y(-0.3);
        assert!((back - v).length() < 5e-3);
    }
}
