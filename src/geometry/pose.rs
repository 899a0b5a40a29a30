//! Rigid 2D poses, twists, and the SE(2) exp/log maps

use std::fmt;
use std::ops::Mul;

use crate::autodiff::DualNum;
use crate::geometry::rotation::{Rotation2, Rotation2Dual};
use crate::geometry::vector::{Vector2, Vector2Dual};
use crate::math::snz;

/// Rigid transform / robot pose in the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2 {
    pub position: Vector2,
    pub heading: Rotation2,
}

/// Element of the tangent space of SE(2): linear and angular velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twist2 {
    pub line: Vector2,
    pub angle: f64,
}

impl Twist2 {
    pub fn new(line: Vector2, angle: f64) -> Self {
        Self { line, angle }
    }
}

impl Pose2 {
    pub fn new(position: Vector2, heading: Rotation2) -> Self {
        Self { position, heading }
    }

    pub fn from_parts(x: f64, y: f64, heading: f64) -> Self {
        Self::new(Vector2::new(x, y), Rotation2::exp(heading))
    }

    pub fn identity() -> Self {
        Self::new(Vector2::zero(), Rotation2::identity())
    }

    /// The exponential map from a twist to the pose reached by following it
    /// for unit time.
    pub fn exp(t: Twist2) -> Pose2 {
        let heading = Rotation2::exp(t.angle);

        let u = t.angle + snz(t.angle);
        let c = 1.0 - u.cos();
        let s = u.sin();
        let position = Vector2::new(
            (s * t.line.x - c * t.line.y) / u,
            (c * t.line.x + s * t.line.y) / u,
        );

        Pose2::new(position, heading)
    }

    /// The logarithmic map: the constant twist that reaches this pose from
    /// the identity in unit time.
    pub fn log(&self) -> Twist2 {
        let theta = self.heading.log();

        let half_u = 0.5 * theta + snz(theta);
        let v = half_u / half_u.tan();
        Twist2::new(
            Vector2::new(
                v * self.position.x + half_u * self.position.y,
                -half_u * self.position.x + v * self.position.y,
            ),
            theta,
        )
    }

    pub fn inverse(&self) -> Pose2 {
        let inv_heading = self.heading.inverse();
        Pose2::new(inv_heading * -self.position, inv_heading)
    }
}

impl Mul for Pose2 {
    type Output = Pose2;

    fn mul(self, other: Pose2) -> Pose2 {
        Pose2::new(
            self.heading * other.position + self.position,
            self.heading * other.heading,
        )
    }
}

impl Mul<Vector2> for Pose2 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        self.heading * v + self.position
    }
}

/// Twist with derivatives with respect to `Param`
pub struct Twist2Dual<Param> {
    pub line: Vector2Dual<Param>,
    pub angle: DualNum<Param>,
}

impl<Param> Clone for Twist2Dual<Param> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Param> Copy for Twist2Dual<Param> {}

impl<Param> fmt::Debug for Twist2Dual<Param> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Twist2Dual")
            .field("line", &self.line)
            .field("angle", &self.angle)
            .finish()
    }
}

impl<Param> Twist2Dual<Param> {
    pub fn new(line: Vector2Dual<Param>, angle: DualNum<Param>) -> Self {
        Self { line, angle }
    }

    pub fn value(&self) -> Twist2 {
        Twist2::new(self.line.value(), self.angle.value())
    }
}

/// Pose with derivatives with respect to `Param`
pub struct Pose2Dual<Param> {
    pub position: Vector2Dual<Param>,
    pub heading: Rotation2Dual<Param>,
}

impl<Param> Clone for Pose2Dual<Param> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Param> Copy for Pose2Dual<Param> {}

impl<Param> fmt::Debug for Pose2Dual<Param> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pose2Dual")
            .field("position", &self.position)
            .field("heading", &self.heading)
            .finish()
    }
}

impl<Param> Pose2Dual<Param> {
    pub fn new(position: Vector2Dual<Param>, heading: Rotation2Dual<Param>) -> Self {
        Self { position, heading }
    }

    pub fn constant(pose: Pose2, n: usize) -> Self {
        Self::new(
            Vector2Dual::constant(pose.position, n),
            Rotation2Dual::constant(pose.heading, n),
        )
    }

    pub fn value(&self) -> Pose2 {
        Pose2::new(self.position.value(), self.heading.value())
    }

    /// Linear and angular velocity with respect to `Param`.
    pub fn velocity(&self) -> Twist2Dual<Param> {
        Twist2Dual::new(self.position.drop_first(1), self.heading.velocity())
    }

    pub fn reparam<NewParam>(&self, old_param: DualNum<NewParam>) -> Pose2Dual<NewParam> {
        Pose2Dual::new(
            self.position.reparam(old_param),
            self.heading.reparam(old_param),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_exp_log_round_trip() {
        for &(x, y, theta) in &[
            (1.0, 2.0, 0.5),
            (-3.0, 0.1, -2.0),
            (0.0, 0.0, 0.0),
            (5.0, -5.0, 3.0),
        ] {
            let t = Twist2::new(Vector2::new(x, y), theta);
            let back = Pose2::exp(t).log();
            assert!((back.line.x - x).abs() < 1e-9);
            assert!((back.line.y - y).abs() < 1e-9);
            assert!((back.angle - theta).abs() < 1e-9);
        }
    }

    #[test]
    fn test_compose_inverse() {
        let a = Pose2::from_parts(1.0, 2.0, PI / 3.0);
        let ident = a * a.inverse();
        assert!(ident.position.norm() < 1e-12);
        assert!((ident.heading.log()).abs() < 1e-12);
    }

    #[test]
    fn test_dual_velocity() {
        struct TestParam;

        // straight-line motion along +x at unit rate, fixed heading
        let s = DualNum::<TestParam>::variable(3.0, 3);
        let pose = Pose2Dual::new(
            Vector2Dual::new(s, DualNum::constant(0.0, 3)),
            Rotation2Dual::constant(Rotation2::exp(0.7), 3),
        );
        let v = pose.velocity();
        assert!((v.value().line - Vector2::new(1.0, 0.0)).norm() < 1e-12);
        assert!(v.value().angle.abs() < 1e-12);
    }

    #[test]
    fn test_pure_rotation_exp() {
        let t = Twist2::new(Vector2::zero(), PI / 2.0);
        let pose = Pose2::exp(t);
        assert!(pose.position.norm() < 1e-9);
        assert!((pose.heading.log() - PI / 2.0).abs() < 1e-12);
    }
}
