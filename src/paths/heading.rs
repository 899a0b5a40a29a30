//! Heading strategies and pose paths built over position paths

use std::sync::Arc;

use crate::autodiff::{Arclength, DualNum};
use crate::geometry::{Pose2, Pose2Dual, Rotation2, Rotation2Dual};
use crate::paths::quintic::QuinticPolynomial;
use crate::paths::segments::PositionPathView;
use crate::paths::{HeadingPath, PosePath, PositionPath};

/// Fixed heading along the whole interval
#[derive(Debug, Clone, Copy)]
pub struct ConstantHeadingPath {
    pub heading: Rotation2,
    pub length: f64,
}

impl HeadingPath for ConstantHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, _s: f64, n: usize) -> Rotation2Dual<Arclength> {
        Rotation2Dual::constant(self.heading, n)
    }
}

/// Heading interpolated at a constant angular rate
#[derive(Debug, Clone, Copy)]
pub struct LinearHeadingPath {
    pub begin: Rotation2,
    pub angle: f64,
    pub length: f64,
}

impl HeadingPath for LinearHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<Arclength> {
        Rotation2Dual::exp(DualNum::variable(s, n) / self.length * self.angle) * self.begin
    }
}

/// Heading interpolated by a quintic in the angle offset, matching angular
/// velocity and acceleration at both ends.
#[derive(Debug, Clone, Copy)]
pub struct SplineHeadingPath {
    pub begin: Rotation2Dual<Arclength>,
    pub length: f64,
    spline: QuinticPolynomial,
}

impl SplineHeadingPath {
    pub fn new(
        begin: Rotation2Dual<Arclength>,
        end: Rotation2Dual<Arclength>,
        length: f64,
    ) -> Self {
        assert!(begin.len() >= 3 && end.len() >= 3);
        assert!(length > 0.0);

        // endpoint triples in the unit parameter t = s / length
        let begin_vel = begin.velocity();
        let end_vel = end.velocity();
        let spline = QuinticPolynomial::new(
            DualNum::new(&[
                0.0,
                begin_vel.value() * length,
                begin_vel[1] * length * length,
            ]),
            DualNum::new(&[
                end.value() - begin.value(),
                end_vel.value() * length,
                end_vel[1] * length * length,
            ]),
        );

        Self {
            begin,
            length,
            spline,
        }
    }
}

impl HeadingPath for SplineHeadingPath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Rotation2Dual<Arclength> {
        let t = s / self.length;
        let offset = self
            .spline
            .get(t, n)
            .reparam(DualNum::variable(s, n) / self.length);
        Rotation2Dual::exp(offset) * self.begin.value()
    }
}

/// Pose path whose heading follows the position path's tangent, optionally
/// rotated by a fixed offset (pi for driving in reverse).
#[derive(Clone)]
pub struct TangentPath {
    pub path: PositionPathView,
    pub offset: f64,
}

impl PosePath for TangentPath {
    fn length(&self) -> f64 {
        self.path.length()
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<Arclength> {
        // the heading derivatives live one order above the position's; at
        // the dual storage cap the heading loses its top order instead
        let point = self.path.get(s, (n + 1).min(4));
        let heading = point.drop_first(1).angle_cast() * Rotation2::exp(self.offset);
        Pose2Dual::new(point, heading)
    }

    fn end(&self, n: usize) -> Pose2Dual<Arclength> {
        // left-sided so a join right after this segment cannot leak in
        let point = self.path.get_left(self.path.length(), (n + 1).min(4));
        let heading = point.drop_first(1).angle_cast() * Rotation2::exp(self.offset);
        Pose2Dual::new(point, heading)
    }
}

/// Pose path pairing a position view with an independent heading strategy
#[derive(Clone)]
pub struct HeadingPosePath<H> {
    pub pos: PositionPathView,
    pub heading: H,
}

impl<H> HeadingPosePath<H> {
    pub fn new(pos: PositionPathView, heading: H) -> Self {
        Self { pos, heading }
    }
}

impl<H: HeadingPath> PosePath for HeadingPosePath<H> {
    fn length(&self) -> f64 {
        self.pos.length()
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<Arclength> {
        Pose2Dual::new(self.pos.get(s, n), self.heading.get(s, n))
    }
}

/// Concatenation of pose paths laid end to end.
///
/// Queries past either end clamp to the boundary pose with zero
/// derivatives.
#[derive(Clone)]
pub struct CompositePosePath {
    pub paths: Vec<Arc<dyn PosePath>>,
    pub offsets: Vec<f64>,
    length: f64,
}

impl CompositePosePath {
    pub fn new(paths: Vec<Arc<dyn PosePath>>) -> Self {
        assert!(!paths.is_empty());
        let mut offsets = vec![0.0];
        for path in &paths {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + path.length());
        }
        let length = offsets[offsets.len() - 1];
        Self {
            paths,
            offsets,
            length,
        }
    }
}

impl PosePath for CompositePosePath {
    fn length(&self) -> f64 {
        self.length
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<Arclength> {
        if s > self.length {
            let last = &self.paths[self.paths.len() - 1];
            return Pose2Dual::constant(last.end(1).value(), n);
        }

        for (i, path) in self.paths.iter().enumerate().rev() {
            let offset = self.offsets[i];
            if s >= offset {
                return path.get(s - offset, n);
            }
        }

        Pose2Dual::constant(self.paths[0].begin(1).value(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vector2, Vector2Dual};
    use crate::paths::segments::Line;
    use std::f64::consts::PI;

    fn line_view(begin: Vector2, end: Vector2) -> PositionPathView {
        let line = Line::new(begin, end);
        let length = line.length();
        PositionPathView::new(Arc::new(line), 0.0, length)
    }

    #[test]
    fn test_constant_heading() {
        let h = ConstantHeadingPath {
            heading: Rotation2::exp(1.0),
            length: 5.0,
        };
        let r = h.get(2.0, 3);
        assert!((r.value().log() - 1.0).abs() < 1e-12);
        assert!(r.velocity().value().abs() < 1e-12);
    }

    #[test]
    fn test_linear_heading_rate() {
        let h = LinearHeadingPath {
            begin: Rotation2::exp(0.5),
            angle: 1.0,
            length: 4.0,
        };
        assert!((h.get(0.0, 1).value().log() - 0.5).abs() < 1e-12);
        assert!((h.get(4.0, 1).value().log() - 1.5).abs() < 1e-12);
        let mid = h.get(2.0, 3);
        assert!((mid.value().log() - 1.0).abs() < 1e-12);
        assert!((mid.velocity().value() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_spline_heading_endpoints() {
        let begin = Rotation2Dual::exp(DualNum::<Arclength>::constant(0.2, 3));
        let end = Rotation2Dual::exp(DualNum::<Arclength>::constant(1.7, 3));
        let h = SplineHeadingPath::new(begin, end, 3.0);

        let b = h.get(0.0, 3);
        assert!((b.value().log() - 0.2).abs() < 1e-9);
        assert!(b.velocity().value().abs() < 1e-9);

        let e = h.get(3.0, 3);
        assert!((e.value().log() - 1.7).abs() < 1e-9);
        assert!(e.velocity().value().abs() < 1e-9);
    }

    #[test]
    fn test_tangent_path_heading() {
        let path = TangentPath {
            path: line_view(Vector2::new(0.0, 0.0), Vector2::new(0.0, 5.0)),
            offset: 0.0,
        };
        let pose = path.get(1.0, 3);
        assert!((pose.heading.value().log() - PI / 2.0).abs() < 1e-12);
        assert!(pose.heading.velocity().value().abs() < 1e-12);

        let reversed = TangentPath {
            path: line_view(Vector2::new(0.0, 0.0), Vector2::new(0.0, 5.0)),
            offset: PI,
        };
        assert!((reversed.get(1.0, 2).heading.value().log().abs() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_path_order_four_query() {
        // the position dual is already at capacity, so the heading drops
        // its top derivative instead of overrunning the storage
        let path = TangentPath {
            path: line_view(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0)),
            offset: 0.0,
        };
        let pose = path.get(2.0, 4);
        assert_eq!(pose.position.x.len(), 4);
        assert_eq!(pose.heading.real.len(), 3);
        assert!((pose.heading.value().log() - (4.0f64).atan2(3.0)).abs() < 1e-12);

        let end = path.end(4);
        assert!((end.position.value() - Vector2::new(3.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn test_composite_pose_clamp() {
        let a = TangentPath {
            path: line_view(Vector2::new(0.0, 0.0), Vector2::new(2.0, 0.0)),
            offset: 0.0,
        };
        let composite = CompositePosePath::new(vec![Arc::new(a)]);
        let past = composite.get(10.0, 3);
        assert!((past.position.value() - Vector2::new(2.0, 0.0)).norm() < 1e-12);
        assert!(past.position.drop_first(1).value().norm() < 1e-12);
    }
}
