//! Persistent builder for C2 position path sequences

use std::sync::Arc;

use crate::autodiff::{Arclength, DualNum};
use crate::builders::HEADING_EPS;
use crate::geometry::{Rotation2, Vector2, Vector2Dual};
use crate::paths::{
    ArclengthReparamCurve2, CompositePositionPath, Line, PositionPath, QuinticSpline2,
};

/// Builds a sequence of C2 position paths parameterized by arc length.
///
/// A new path is started silently whenever extending the current one would
/// break position or tangent continuity. Invoke the builder multiple times
/// to insert manual path breaks.
#[derive(Clone)]
pub struct PositionPathSeqBuilder {
    eps: f64,
    paths: Vec<CompositePositionPath>,
    // invariant: the last segment ends at next_begin_pos with
    // next_begin_tangent if any segments are pending
    segments: Vec<Arc<dyn PositionPath<Arclength>>>,
    next_begin_pos: Vector2,
    next_begin_tangent: Rotation2,
}

impl PositionPathSeqBuilder {
    /// `eps` is both the positional continuity tolerance and the arc length
    /// quadrature tolerance for spline segments.
    pub fn new(begin_pos: Vector2, begin_tangent: Rotation2, eps: f64) -> Self {
        Self {
            eps,
            paths: Vec::new(),
            segments: Vec::new(),
            next_begin_pos: begin_pos,
            next_begin_tangent: begin_tangent,
        }
    }

    /// Ends the current path, forcing the next segment to start a new one.
    pub fn end_path(mut self) -> Self {
        if !self.segments.is_empty() {
            let segments = std::mem::take(&mut self.segments);
            self.paths.push(CompositePositionPath::new(segments));
        }
        self
    }

    /// Points the next segment in a new direction, splitting the path if
    /// the tangent actually changes.
    pub fn set_tangent(self, new_tangent: Rotation2) -> Self {
        if (self.next_begin_tangent - new_tangent).abs() < HEADING_EPS {
            self
        } else {
            let mut b = self.end_path();
            b.next_begin_tangent = new_tangent;
            b
        }
    }

    fn add_segment(self, seg: Arc<dyn PositionPath<Arclength>>) -> Self {
        let begin = seg.begin(2);
        let begin_pos = begin.value();
        let begin_tangent = begin.drop_first(1).value().angle_cast();

        let end = seg.end(2);
        let end_pos = end.value();
        let end_tangent = end.drop_first(1).value().angle_cast();

        let discontinuous = (self.next_begin_pos.x - begin_pos.x).abs() > self.eps
            || (self.next_begin_pos.y - begin_pos.y).abs() > self.eps
            || (self.next_begin_tangent - begin_tangent).abs() > HEADING_EPS;

        let mut b = if discontinuous { self.end_path() } else { self };
        b.segments.push(seg);
        b.next_begin_pos = end_pos;
        b.next_begin_tangent = end_tangent;
        b
    }

    /// Adds a line segment to x-coordinate `pos_x` along the current
    /// tangent.
    pub fn line_to_x(self, pos_x: f64) -> Self {
        assert!(
            self.next_begin_tangent.real.abs() > HEADING_EPS,
            "path tangent orthogonal to the x-axis, try line_to_y() instead"
        );

        let begin = self.next_begin_pos;
        let tangent = self.next_begin_tangent;
        let end = Vector2::new(
            pos_x,
            (pos_x - begin.x) / tangent.real * tangent.imag + begin.y,
        );
        self.add_segment(Arc::new(Line::new(begin, end)))
    }

    /// Adds a line segment to y-coordinate `pos_y` along the current
    /// tangent.
    pub fn line_to_y(self, pos_y: f64) -> Self {
        assert!(
            self.next_begin_tangent.imag.abs() > HEADING_EPS,
            "path tangent orthogonal to the y-axis, try line_to_x() instead"
        );

        let begin = self.next_begin_pos;
        let tangent = self.next_begin_tangent;
        let end = Vector2::new(
            (pos_y - begin.y) / tangent.imag * tangent.real + begin.x,
            pos_y,
        );
        self.add_segment(Arc::new(Line::new(begin, end)))
    }

    /// Sets the tangent toward `pos` and adds a line segment there.
    pub fn strafe_to(self, pos: Vector2) -> Self {
        let begin = self.next_begin_pos;
        let diff = pos - begin;
        let norm = diff.norm();
        assert!(norm > 0.0, "strafe requires a distinct target position");

        let b = self.set_tangent(Rotation2::new(diff.x / norm, diff.y / norm));
        b.add_segment(Arc::new(Line::new(begin, pos)))
    }

    /// Adds a spline segment to position `pos` arriving with tangent
    /// `tangent`.
    pub fn spline_to(self, pos: Vector2, tangent: Rotation2) -> Self {
        let begin = self.next_begin_pos;
        let dist = (pos - begin).norm();
        assert!(dist > 0.0, "spline requires a distinct target position");

        // first derivatives are normalized by the arc length reparam, so
        // only their direction matters at the knots
        let begin_deriv = self.next_begin_tangent.vec() * dist;
        let end_deriv = tangent.vec() * dist;

        let spline = ArclengthReparamCurve2::new(
            QuinticSpline2::new(
                Vector2Dual::new(
                    DualNum::new(&[begin.x, begin_deriv.x, 0.0]),
                    DualNum::new(&[begin.y, begin_deriv.y, 0.0]),
                ),
                Vector2Dual::new(
                    DualNum::new(&[pos.x, end_deriv.x, 0.0]),
                    DualNum::new(&[pos.y, end_deriv.y, 0.0]),
                ),
            ),
            self.eps,
        );
        self.add_segment(Arc::new(spline))
    }

    pub fn build(self) -> Vec<CompositePositionPath> {
        self.end_path().paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_continuous_chain_is_one_path() {
        let paths = PositionPathSeqBuilder::new(Vector2::zero(), Rotation2::identity(), EPS)
            .line_to_x(4.0)
            .spline_to(Vector2::new(8.0, 4.0), Rotation2::exp(PI / 2.0))
            .build();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].paths.len(), 2);

        // the composite starts and ends where requested
        let path = &paths[0];
        assert!((path.begin(1).value() - Vector2::zero()).norm() < 1e-9);
        assert!((path.end(1).value() - Vector2::new(8.0, 4.0)).norm() < 1e-6);
    }

    #[test]
    fn test_tangent_reversal_splits() {
        // driving +x then requesting a segment back toward -x flips the
        // tangent, so the builder starts a second path
        let paths = PositionPathSeqBuilder::new(Vector2::zero(), Rotation2::identity(), EPS)
            .line_to_x(4.0)
            .set_tangent(Rotation2::exp(PI))
            .line_to_x(0.0)
            .build();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].paths.len(), 1);
        assert_eq!(paths[1].paths.len(), 1);
    }

    #[test]
    fn test_strafe_to_splits_on_turn() {
        let paths = PositionPathSeqBuilder::new(Vector2::zero(), Rotation2::identity(), EPS)
            .line_to_x(2.0)
            .strafe_to(Vector2::new(2.0, 5.0))
            .build();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_spline_between_opposite_tangents_loops() {
        // opposite tangents at the two knots force the spline to curve, so
        // its arc length strictly exceeds the straight-line distance
        let paths = PositionPathSeqBuilder::new(Vector2::zero(), Rotation2::identity(), EPS)
            .spline_to(Vector2::new(10.0, 0.0), Rotation2::exp(PI))
            .build();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].length() > 10.0 + 1e-3);
    }

    #[test]
    fn test_set_tangent_same_direction_is_noop() {
        let paths = PositionPathSeqBuilder::new(Vector2::zero(), Rotation2::identity(), EPS)
            .line_to_x(2.0)
            .set_tangent(Rotation2::identity())
            .line_to_x(4.0)
            .build();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].paths.len(), 2);
    }
}
