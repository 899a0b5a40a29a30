//! Combined position + heading path builder

use std::sync::Arc;

use crate::autodiff::Arclength;
use crate::builders::pose::PosePathSeqBuilder;
use crate::builders::position::PositionPathSeqBuilder;
use crate::common::PlannerResult;
use crate::geometry::{Pose2, Rotation2, Vector2};
use crate::paths::{CompositePosePath, PosePath, PositionPath};

#[derive(Debug, Clone, Copy)]
enum HeadingKind {
    Tangent,
    Constant,
    Linear(Rotation2),
    Spline(Rotation2),
}

/// Builds pose paths by pairing each position segment with a heading
/// strategy, then replaying the headings over the continuity-split
/// position paths.
///
/// Heading discontinuities surface as
/// [`PlannerError::ContinuityViolation`](crate::common::PlannerError) from
/// [`Self::build`]; position discontinuities split the result instead.
#[derive(Clone)]
pub struct PathBuilder {
    begin_heading: Rotation2,
    position_builder: PositionPathSeqBuilder,
    heading_segments: Vec<HeadingKind>,
    end_heading: Rotation2,
}

impl PathBuilder {
    pub fn new(begin_pose: Pose2, eps: f64) -> Self {
        Self {
            begin_heading: begin_pose.heading,
            position_builder: PositionPathSeqBuilder::new(
                begin_pose.position,
                begin_pose.heading,
                eps,
            ),
            heading_segments: Vec::new(),
            end_heading: begin_pose.heading,
        }
    }

    fn add(mut self, position_builder: PositionPathSeqBuilder, kind: HeadingKind) -> Self {
        self.position_builder = position_builder;
        self.heading_segments.push(kind);
        if let HeadingKind::Linear(heading) | HeadingKind::Spline(heading) = kind {
            self.end_heading = heading;
        }
        self
    }

    // tangent segments drag the end heading along with the tangent sweep
    fn add_tangent(mut self, position_builder: PositionPathSeqBuilder) -> Self {
        let paths = position_builder.clone().build();
        let last_path = &paths[paths.len() - 1];
        let last_seg = &last_path.paths[last_path.paths.len() - 1];
        let heading_diff = last_seg.end(2).drop_first(1).value().angle_cast()
            - last_seg.begin(2).drop_first(1).value().angle_cast();

        self.position_builder = position_builder;
        self.heading_segments.push(HeadingKind::Tangent);
        self.end_heading = self.end_heading + heading_diff;
        self
    }

    pub fn set_tangent(mut self, tangent: Rotation2) -> Self {
        self.position_builder = self.position_builder.set_tangent(tangent);
        self
    }

    /// Faces the next segments backward (or forward again).
    pub fn set_reversed(self, reversed: bool) -> Self {
        let tangent = self.end_heading + if reversed { std::f64::consts::PI } else { 0.0 };
        self.set_tangent(tangent)
    }

    pub fn line_to_x(self, pos_x: f64) -> Self {
        let b = self.position_builder.clone().line_to_x(pos_x);
        self.add_tangent(b)
    }

    pub fn line_to_x_constant_heading(self, pos_x: f64) -> Self {
        let b = self.position_builder.clone().line_to_x(pos_x);
        self.add(b, HeadingKind::Constant)
    }

    pub fn line_to_x_linear_heading(self, pos_x: f64, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().line_to_x(pos_x);
        self.add(b, HeadingKind::Linear(heading))
    }

    pub fn line_to_x_spline_heading(self, pos_x: f64, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().line_to_x(pos_x);
        self.add(b, HeadingKind::Spline(heading))
    }

    pub fn line_to_y(self, pos_y: f64) -> Self {
        let b = self.position_builder.clone().line_to_y(pos_y);
        self.add_tangent(b)
    }

    pub fn line_to_y_constant_heading(self, pos_y: f64) -> Self {
        let b = self.position_builder.clone().line_to_y(pos_y);
        self.add(b, HeadingKind::Constant)
    }

    pub fn line_to_y_linear_heading(self, pos_y: f64, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().line_to_y(pos_y);
        self.add(b, HeadingKind::Linear(heading))
    }

    pub fn line_to_y_spline_heading(self, pos_y: f64, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().line_to_y(pos_y);
        self.add(b, HeadingKind::Spline(heading))
    }

    pub fn strafe_to(self, pos: Vector2) -> Self {
        let b = self.position_builder.clone().strafe_to(pos);
        self.add_tangent(b)
    }

    pub fn strafe_to_constant_heading(self, pos: Vector2) -> Self {
        let b = self.position_builder.clone().strafe_to(pos);
        self.add(b, HeadingKind::Constant)
    }

    pub fn strafe_to_linear_heading(self, pos: Vector2, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().strafe_to(pos);
        self.add(b, HeadingKind::Linear(heading))
    }

    pub fn strafe_to_spline_heading(self, pos: Vector2, heading: Rotation2) -> Self {
        let b = self.position_builder.clone().strafe_to(pos);
        self.add(b, HeadingKind::Spline(heading))
    }

    pub fn spline_to(self, pos: Vector2, tangent: Rotation2) -> Self {
        let b = self.position_builder.clone().spline_to(pos, tangent);
        self.add_tangent(b)
    }

    pub fn spline_to_constant_heading(self, pos: Vector2, tangent: Rotation2) -> Self {
        let b = self.position_builder.clone().spline_to(pos, tangent);
        self.add(b, HeadingKind::Constant)
    }

    pub fn spline_to_linear_heading(self, pose: Pose2, tangent: Rotation2) -> Self {
        let b = self.position_builder.clone().spline_to(pose.position, tangent);
        self.add(b, HeadingKind::Linear(pose.heading))
    }

    pub fn spline_to_spline_heading(self, pose: Pose2, tangent: Rotation2) -> Self {
        let b = self.position_builder.clone().spline_to(pose.position, tangent);
        self.add(b, HeadingKind::Spline(pose.heading))
    }

    pub fn build(self) -> PlannerResult<Vec<CompositePosePath>> {
        let pos_paths = self.position_builder.build();

        let mut pose_paths: Vec<CompositePosePath> = Vec::new();
        let mut i = 0;
        let mut next_heading = self.begin_heading;
        for pos_path in pos_paths {
            let knots: Vec<f64> = pos_path.offsets.iter().skip(1).cloned().collect();
            let shared: Arc<dyn PositionPath<Arclength>> = Arc::new(pos_path);

            let mut b = PosePathSeqBuilder::new(shared, next_heading);
            for s in knots {
                b = match self.heading_segments[i] {
                    HeadingKind::Tangent => b.tangent_until(s)?,
                    HeadingKind::Constant => b.constant_until(s)?,
                    HeadingKind::Linear(heading) => b.linear_until(s, heading)?,
                    HeadingKind::Spline(heading) => b.spline_until(s, heading),
                };
                i += 1;
            }

            let built = b.build();
            if let Some(last) = built.last() {
                next_heading = last.end(1).value().heading;
            }
            pose_paths.extend(built);
        }

        Ok(pose_paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlannerError;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_tangent_line_and_spline() {
        let paths = PathBuilder::new(Pose2::identity(), EPS)
            .line_to_x(4.0)
            .spline_to(Vector2::new(8.0, 4.0), Rotation2::exp(PI / 2.0))
            .build()
            .unwrap();
        assert_eq!(paths.len(), 1);

        let end = paths[0].end(1).value();
        assert!((end.position - Vector2::new(8.0, 4.0)).norm() < 1e-4);
        assert!((end.heading.log() - PI / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_reversed_replay_across_split() {
        // drive out facing forward, then back up over the same line; the
        // tangent reversal splits the position path and the heading replay
        // keeps the robot facing forward on both pieces
        let paths = PathBuilder::new(Pose2::identity(), EPS)
            .line_to_x(4.0)
            .set_reversed(true)
            .line_to_x(0.0)
            .build()
            .unwrap();
        assert_eq!(paths.len(), 2);

        for path in &paths {
            for i in 0..5 {
                let s = path.length() * i as f64 / 4.0;
                let heading = path.get(s, 1).value().heading;
                assert!(heading.log().abs() < 1e-9);
            }
        }
        assert!((paths[1].end(1).value().position - Vector2::zero()).norm() < 1e-9);
    }

    #[test]
    fn test_linear_then_tangent_is_rejected() {
        // the linear sweep ends with nonzero heading velocity; a tangent
        // segment over a line starts with zero
        let result = PathBuilder::new(Pose2::identity(), EPS)
            .line_to_x_linear_heading(4.0, Rotation2::exp(1.0))
            .set_tangent(Rotation2::identity())
            .line_to_x(8.0)
            .build();
        assert!(matches!(result, Err(PlannerError::ContinuityViolation(_))));
    }

    #[test]
    fn test_spline_heading_bridges_linear() {
        let paths = PathBuilder::new(Pose2::identity(), EPS)
            .line_to_x_linear_heading(4.0, Rotation2::exp(1.0))
            .line_to_x_spline_heading(8.0, Rotation2::identity())
            .build()
            .unwrap();
        assert_eq!(paths.len(), 1);

        let end = paths[0].end(1).value();
        assert!(end.heading.log().abs() < 1e-9);
    }

    #[test]
    fn test_strafe_to_linear_heading() {
        let paths = PathBuilder::new(Pose2::identity(), EPS)
            .strafe_to_linear_heading(Vector2::new(0.0, 6.0), Rotation2::exp(PI / 4.0))
            .build()
            .unwrap();
        assert_eq!(paths.len(), 1);
        let end = paths[0].end(1).value();
        assert!((end.heading.log() - PI / 4.0).abs() < 1e-9);
        assert!((end.position - Vector2::new(0.0, 6.0)).norm() < 1e-9);
    }
}
