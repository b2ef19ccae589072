use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::math::EPSILON;

/// 3D vector used for positions, directions and normals alike.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector with the same direction. Degenerate vectors (norm below
    /// [`EPSILON`]) are returned unchanged.
    pub fn normalize(self) -> Self {
        let norm = self.norm();
        if norm < EPSILON {
            self
        } else {
            self * (1.0 / norm)
        }
    }

    /// Homothety about `center` with the given factor.
    pub fn scale_about(self, center: Self, factor: f32) -> Self {
        center + (self - center) * factor
    }

    pub fn rot_x_about(self, pivot: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self - pivot;
        pivot
            + Self::new(
                d.x,
                d.y * cos - d.z * sin,
                d.y * sin + d.z * cos,
            )
    }

    pub fn rot_y_about(self, pivot: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self - pivot;
        pivot
            + Self::new(
                d.z * sin + d.x * cos,
                d.y,
                d.z * cos - d.x * sin,
            )
    }

    pub fn rot_z_about(self, pivot: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self - pivot;
        pivot
            + Self::new(
                d.x * cos - d.y * sin,
                d.x * sin + d.y * cos,
                d.z,
            )
    }

    /// Rodrigues rotation of a direction about an arbitrary unit axis through
    /// the origin.
    pub fn rotate_around(self, axis: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * (axis.dot(self) * (1.0 - cos))
    }
}

impl Add for Point {
    type Output = Self;

    fn add(mut self, other: Self) -> Self::Output {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self::Output {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(mut self, scalar: f32) -> Self::Output {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
        self
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}
