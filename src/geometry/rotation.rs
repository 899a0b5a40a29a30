//! Unit-complex rotations and their dual-number counterparts

use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::autodiff::DualNum;
use crate::geometry::vector::{Vector2, Vector2Dual};

/// 2D rotation represented as a unit complex number.
///
/// Construct with [`Rotation2::exp`]; the unit-norm invariant is preserved
/// by composition (not actively renormalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation2 {
    pub real: f64,
    pub imag: f64,
}

impl Rotation2 {
    pub fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Rotation by angle `theta`.
    pub fn exp(theta: f64) -> Self {
        Self::new(theta.cos(), theta.sin())
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }

    /// The angle of this rotation in (-pi, pi].
    pub fn log(&self) -> f64 {
        self.imag.atan2(self.real)
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.real, -self.imag)
    }

    /// The unit direction vector of this rotation.
    pub fn vec(&self) -> Vector2 {
        Vector2::new(self.real, self.imag)
    }
}

impl Mul for Rotation2 {
    type Output = Rotation2;

    fn mul(self, other: Rotation2) -> Rotation2 {
        Rotation2::new(
            self.real * other.real - self.imag * other.imag,
            self.real * other.imag + self.imag * other.real,
        )
    }
}

impl Mul<Vector2> for Rotation2 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        Vector2::new(
            self.real * v.x - self.imag * v.y,
            self.imag * v.x + self.real * v.y,
        )
    }
}

/// Rotates by the angle `theta`.
impl Add<f64> for Rotation2 {
    type Output = Rotation2;

    fn add(self, theta: f64) -> Rotation2 {
        self * Rotation2::exp(theta)
    }
}

/// The shortest signed angle from `other` to `self`, never exceeding pi in
/// magnitude.
impl Sub for Rotation2 {
    type Output = f64;

    fn sub(self, other: Rotation2) -> f64 {
        (other.inverse() * self).log()
    }
}

/// Rotation with derivatives with respect to `Param`
pub struct Rotation2Dual<Param> {
    pub real: DualNum<Param>,
    pub imag: DualNum<Param>,
}

impl<Param> Clone for Rotation2Dual<Param> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Param> Copy for Rotation2Dual<Param> {}

impl<Param> fmt::Debug for Rotation2Dual<Param> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rotation2Dual")
            .field("real", &self.real)
            .field("imag", &self.imag)
            .finish()
    }
}

impl<Param> Rotation2Dual<Param> {
    pub fn new(real: DualNum<Param>, imag: DualNum<Param>) -> Self {
        Self { real, imag }
    }

    pub fn exp(theta: DualNum<Param>) -> Self {
        Self::new(theta.cos(), theta.sin())
    }

    pub fn constant(r: Rotation2, n: usize) -> Self {
        Self::new(DualNum::constant(r.real, n), DualNum::constant(r.imag, n))
    }

    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    pub fn value(&self) -> Rotation2 {
        Rotation2::new(self.real.value(), self.imag.value())
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.real, -self.imag)
    }

    /// Angular velocity with respect to `Param` and its derivatives.
    pub fn velocity(&self) -> DualNum<Param> {
        self.real * self.imag.drop_first(1) - self.imag * self.real.drop_first(1)
    }

    /// Replaces the 0th-order entries with `r`, keeping the derivatives.
    pub fn with_value(&self, r: Rotation2) -> Self {
        let replace = |d: DualNum<Param>, x: f64| {
            let mut vs: Vec<f64> = d.values().to_vec();
            vs[0] = x;
            DualNum::new(&vs)
        };
        Self::new(replace(self.real, r.real), replace(self.imag, r.imag))
    }

    pub fn reparam<NewParam>(&self, old_param: DualNum<NewParam>) -> Rotation2Dual<NewParam> {
        Rotation2Dual::new(self.real.reparam(old_param), self.imag.reparam(old_param))
    }
}

impl<Param> Mul for Rotation2Dual<Param> {
    type Output = Rotation2Dual<Param>;

    fn mul(self, other: Rotation2Dual<Param>) -> Rotation2Dual<Param> {
        Rotation2Dual::new(
            self.real * other.real - self.imag * other.imag,
            self.real * other.imag + self.imag * other.real,
        )
    }
}

impl<Param> Mul<Rotation2> for Rotation2Dual<Param> {
    type Output = Rotation2Dual<Param>;

    fn mul(self, other: Rotation2) -> Rotation2Dual<Param> {
        self * Rotation2Dual::constant(other, self.len())
    }
}

impl<Param> Mul<Vector2Dual<Param>> for Rotation2Dual<Param> {
    type Output = Vector2Dual<Param>;

    fn mul(self, v: Vector2Dual<Param>) -> Vector2Dual<Param> {
        Vector2Dual::new(
            self.real * v.x - self.imag * v.y,
            self.imag * v.x + self.real * v.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    struct TestParam;

    #[test]
    fn test_exp_log_round_trip() {
        for &theta in &[0.0, 0.5, -1.2, 3.0, -3.0] {
            assert!((Rotation2::exp(theta).log() - theta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_shortest_angle_difference() {
        let a = Rotation2::exp(0.9 * PI);
        let b = Rotation2::exp(-0.9 * PI);
        // going from a to b the short way crosses pi
        let diff = b - a;
        assert!((diff.abs() - 0.2 * PI).abs() < 1e-12);
        assert!(diff.abs() <= PI);
    }

    #[test]
    fn test_rotate_vector() {
        let r = Rotation2::exp(PI / 2.0);
        let v = r * Vector2::new(1.0, 0.0);
        assert!((v.x - 0.0).abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dual_velocity() {
        // heading theta(s) = 0.3 s => velocity 0.3
        let theta = DualNum::<TestParam>::variable(2.0, 3) * 0.3;
        let r = Rotation2Dual::exp(theta);
        let vel = r.velocity();
        assert!((vel.value() - 0.3).abs() < 1e-12);
        assert!(vel[1].abs() < 1e-12);
    }

    #[test]
    fn test_with_value_keeps_derivatives() {
        let theta = DualNum::<TestParam>::variable(0.4, 3);
        let r = Rotation2Dual::exp(theta);
        let replaced = r.with_value(Rotation2::exp(1.0));
        assert!((replaced.value().log() - 1.0).abs() < 1e-12);
        assert_eq!(replaced.real[1], r.real[1]);
        assert_eq!(replaced.imag[2], r.imag[2]);
    }
}
