//! 2D vectors and their dual-number counterparts

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::autodiff::DualNum;
use crate::geometry::rotation::Rotation2Dual;

/// 2D vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn sqr_norm(&self) -> f64 {
        self.dot(*self)
    }

    pub fn norm(&self) -> f64 {
        self.sqr_norm().sqrt()
    }

    /// Interprets this (unit) vector as a rotation.
    pub fn angle_cast(&self) -> crate::geometry::Rotation2 {
        crate::geometry::Rotation2::new(self.x, self.y)
    }

    pub fn to_na(&self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x, self.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Vector2 {
    fn from(v: nalgebra::Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, c: f64) -> Vector2 {
        Vector2::new(self.x * c, self.y * c)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;

    fn div(self, c: f64) -> Vector2 {
        Vector2::new(self.x / c, self.y / c)
    }
}

/// 2D vector of dual numbers
pub struct Vector2Dual<Param> {
    pub x: DualNum<Param>,
    pub y: DualNum<Param>,
}

impl<Param> Clone for Vector2Dual<Param> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Param> Copy for Vector2Dual<Param> {}

impl<Param> fmt::Debug for Vector2Dual<Param> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector2Dual")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<Param> Vector2Dual<Param> {
    pub fn new(x: DualNum<Param>, y: DualNum<Param>) -> Self {
        Self { x, y }
    }

    pub fn constant(v: Vector2, n: usize) -> Self {
        Self::new(DualNum::constant(v.x, n), DualNum::constant(v.y, n))
    }

    pub fn value(&self) -> Vector2 {
        Vector2::new(self.x.value(), self.y.value())
    }

    pub fn drop_first(&self, n: usize) -> Self {
        Self::new(self.x.drop_first(n), self.y.drop_first(n))
    }

    pub fn dot(&self, other: Vector2Dual<Param>) -> DualNum<Param> {
        self.x * other.x + self.y * other.y
    }

    pub fn sqr_norm(&self) -> DualNum<Param> {
        self.dot(*self)
    }

    pub fn norm(&self) -> DualNum<Param> {
        self.sqr_norm().sqrt()
    }

    /// Interprets this (unit) vector as a rotation with its derivatives.
    pub fn angle_cast(&self) -> Rotation2Dual<Param> {
        Rotation2Dual::new(self.x, self.y)
    }

    pub fn reparam<NewParam>(&self, old_param: DualNum<NewParam>) -> Vector2Dual<NewParam> {
        Vector2Dual::new(self.x.reparam(old_param), self.y.reparam(old_param))
    }
}

impl<Param> Add for Vector2Dual<Param> {
    type Output = Vector2Dual<Param>;

    fn add(self, other: Vector2Dual<Param>) -> Vector2Dual<Param> {
        Vector2Dual::new(self.x + other.x, self.y + other.y)
    }
}

impl<Param> Sub for Vector2Dual<Param> {
    type Output = Vector2Dual<Param>;

    fn sub(self, other: Vector2Dual<Param>) -> Vector2Dual<Param> {
        Vector2Dual::new(self.x - other.x, self.y - other.y)
    }
}

impl<Param> Add<Vector2> for Vector2Dual<Param> {
    type Output = Vector2Dual<Param>;

    fn add(self, v: Vector2) -> Vector2Dual<Param> {
        Vector2Dual::new(self.x + v.x, self.y + v.y)
    }
}

impl<Param> Mul<Vector2> for DualNum<Param> {
    type Output = Vector2Dual<Param>;

    fn mul(self, v: Vector2) -> Vector2Dual<Param> {
        Vector2Dual::new(self * v.x, self * v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestParam;

    #[test]
    fn test_vector_ops() {
        let a = Vector2::new(3.0, 4.0);
        assert!((a.norm() - 5.0).abs() < 1e-10);
        assert!((a.dot(Vector2::new(1.0, 1.0)) - 7.0).abs() < 1e-10);

        let b = a - Vector2::new(1.0, 1.0);
        assert_eq!(b, Vector2::new(2.0, 3.0));
        assert_eq!(a / 2.0, Vector2::new(1.5, 2.0));
    }

    #[test]
    fn test_dual_norm_derivative() {
        // |(t, t)| = sqrt(2) t, derivative sqrt(2)
        let t = DualNum::<TestParam>::variable(1.0, 2);
        let v = Vector2Dual::new(t, t);
        let norm = v.norm();
        assert!((norm.value() - 2.0_f64.sqrt()).abs() < 1e-10);
        assert!((norm[1] - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_scalar_times_vector() {
        let t = DualNum::<TestParam>::variable(2.0, 2);
        let v = t * Vector2::new(1.0, -1.0);
        assert_eq!(v.value(), Vector2::new(2.0, -2.0));
        assert_eq!(v.x[1], 1.0);
        assert_eq!(v.y[1], -1.0);
    }

    #[test]
    fn test_na_round_trip() {
        let v = Vector2::new(1.5, -2.5);
        assert_eq!(Vector2::from(v.to_na()), v);
    }
}
