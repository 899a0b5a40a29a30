//! Parametric position paths, heading strategies, and pose paths
//!
//! Position paths map a parameter (arc length after reparameterization) to
//! a point with derivatives; pose paths add a heading. All queries return
//! dual numbers so consumers obtain velocity and acceleration alongside
//! values.

pub mod arclength;
pub mod heading;
pub mod quintic;
pub mod segments;

pub use arclength::ArclengthReparamCurve2;
pub use heading::{
    CompositePosePath, ConstantHeadingPath, HeadingPosePath, LinearHeadingPath, SplineHeadingPath,
    TangentPath,
};
pub use quintic::{QuinticPolynomial, QuinticSpline2};
pub use segments::{CompositePositionPath, Line, PositionPathView};

use crate::autodiff::Arclength;
use crate::geometry::{Pose2Dual, Rotation2Dual, Vector2Dual};

/// Position with derivatives as a function of a scalar parameter.
pub trait PositionPath<Param>: Send + Sync {
    fn length(&self) -> f64;

    /// The point at `param` with `n` dual entries (value + derivatives).
    fn get(&self, param: f64, n: usize) -> Vector2Dual<Param>;

    /// The point at `param` approached from below. Differs from
    /// [`Self::get`] only at the interior joins of composite paths, where
    /// `get` evaluates the later piece.
    fn get_left(&self, param: f64, n: usize) -> Vector2Dual<Param> {
        self.get(param, n)
    }

    fn begin(&self, n: usize) -> Vector2Dual<Param> {
        self.get(0.0, n)
    }

    fn end(&self, n: usize) -> Vector2Dual<Param> {
        self.get(self.length(), n)
    }
}

/// Heading with derivatives as a function of arc length.
pub trait HeadingPath: Send + Sync {
    fn length(&self) -> f64;

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<Arclength>;
}

/// Pose (position + heading) with derivatives as a function of arc length.
pub trait PosePath: Send + Sync {
    fn length(&self) -> f64;

    fn get(&self, s: f64, n: usize) -> Pose2Dual<Arclength>;

    fn begin(&self, n: usize) -> Pose2Dual<Arclength> {
        self.get(0.0, n)
    }

    fn end(&self, n: usize) -> Pose2Dual<Arclength> {
        self.get(self.length(), n)
    }
}
