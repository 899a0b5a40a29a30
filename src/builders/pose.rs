//! Persistent builder for heading-continuous pose path sequences

use std::sync::Arc;

use crate::autodiff::{Arclength, DualNum};
use crate::builders::HEADING_EPS;
use crate::common::{PlannerError, PlannerResult};
use crate::geometry::{Rotation2, Rotation2Dual};
use crate::paths::{
    CompositePosePath, ConstantHeadingPath, HeadingPosePath, LinearHeadingPath, PosePath,
    PositionPath, PositionPathView, SplineHeadingPath, TangentPath,
};

type MakePaths = Arc<dyn Fn(Rotation2Dual<Arclength>) -> Vec<Arc<dyn PosePath>> + Send + Sync>;

#[derive(Clone)]
enum State {
    /// All segments so far are concrete; the end heading carries its
    /// derivatives.
    Eager {
        segments: Vec<Arc<dyn PosePath>>,
        end_heading_dual: Rotation2Dual<Arclength>,
    },
    /// The last segment was a heading spline whose end derivatives depend
    /// on the following segment; building is deferred.
    Lazy {
        make_paths: MakePaths,
        end_heading: Rotation2,
    },
}

impl State {
    fn end_heading(&self) -> Rotation2 {
        match self {
            State::Eager {
                end_heading_dual, ..
            } => end_heading_dual.value(),
            State::Lazy { end_heading, .. } => *end_heading,
        }
    }
}

fn dual_eps_eq<Param>(a: &DualNum<Param>, b: &DualNum<Param>) -> bool {
    a.values()
        .iter()
        .zip(b.values().iter())
        .all(|(x, y)| (x - y).abs() < HEADING_EPS)
}

fn rotation_eps_eq<Param>(a: &Rotation2Dual<Param>, b: &Rotation2Dual<Param>) -> bool {
    dual_eps_eq(&a.real, &b.real) && dual_eps_eq(&a.imag, &b.imag)
}

/// Builds a sequence of pose paths with C1-continuous heading over a
/// C2-continuous position path.
///
/// Extending an eager builder with a heading whose value or derivatives
/// disagree with the current path end is rejected with
/// [`PlannerError::ContinuityViolation`]; insert a [`Self::spline_until`]
/// to bridge the gap, or use [`SafePosePathBuilder`] to rule violations out
/// at compile time.
#[derive(Clone)]
pub struct PosePathSeqBuilder {
    // precondition: pos_path is C2-continuous
    pos_path: Arc<dyn PositionPath<Arclength>>,
    pose_paths: Vec<CompositePosePath>,
    end_disp: f64,
    state: State,
}

impl PosePathSeqBuilder {
    pub fn new(pos_path: Arc<dyn PositionPath<Arclength>>, begin_heading: Rotation2) -> Self {
        Self {
            pos_path,
            pose_paths: Vec::new(),
            end_disp: 0.0,
            state: State::Lazy {
                make_paths: Arc::new(|_| Vec::new()),
                end_heading: begin_heading,
            },
        }
    }

    fn view_until(&self, disp: f64) -> PositionPathView {
        PositionPathView::new(self.pos_path.clone(), self.end_disp, disp - self.end_disp)
    }

    fn check_continuity(&self, begin_heading_dual: &Rotation2Dual<Arclength>) -> PlannerResult<()> {
        if let State::Eager {
            end_heading_dual, ..
        } = &self.state
        {
            if !rotation_eps_eq(end_heading_dual, begin_heading_dual) {
                return Err(PlannerError::ContinuityViolation(format!(
                    "heading discontinuity at displacement {}: path ends at {:.6} rad but the \
                     next segment begins at {:.6} rad (or their derivatives disagree); insert \
                     spline_until() to bridge",
                    self.end_disp,
                    end_heading_dual.value().log(),
                    begin_heading_dual.value().log(),
                )));
            }
        }
        Ok(())
    }

    // precondition: continuity with the eager state already validated
    fn push_pose_path(mut self, disp: f64, segment: Arc<dyn PosePath>) -> Self {
        assert!(self.end_disp <= disp && disp <= self.pos_path.length());

        let begin_heading_dual = segment.begin(3).heading;
        let end_heading_dual = segment.end(3).heading;
        self.state = match self.state {
            State::Eager { mut segments, .. } => {
                segments.push(segment);
                State::Eager {
                    segments,
                    end_heading_dual,
                }
            }
            State::Lazy { make_paths, .. } => {
                let mut segments = make_paths(begin_heading_dual);
                segments.push(segment);
                State::Eager {
                    segments,
                    end_heading_dual,
                }
            }
        };
        self.end_disp = disp;
        self
    }

    fn make_tangent(&self, disp: f64) -> TangentPath {
        // the offset is measured against the tangent already traversed; a
        // tangent jump at end_disp then surfaces in the continuity check
        // instead of being absorbed into the offset
        TangentPath {
            path: self.view_until(disp),
            offset: self.state.end_heading()
                - self
                    .pos_path
                    .get_left(self.end_disp, 2)
                    .drop_first(1)
                    .value()
                    .angle_cast(),
        }
    }

    fn make_constant(&self, disp: f64) -> HeadingPosePath<ConstantHeadingPath> {
        HeadingPosePath::new(
            self.view_until(disp),
            ConstantHeadingPath {
                heading: self.state.end_heading(),
                length: disp - self.end_disp,
            },
        )
    }

    fn make_linear(&self, disp: f64, heading: Rotation2) -> HeadingPosePath<LinearHeadingPath> {
        let begin = self.state.end_heading();
        HeadingPosePath::new(
            self.view_until(disp),
            LinearHeadingPath {
                begin,
                angle: heading - begin,
                length: disp - self.end_disp,
            },
        )
    }

    /// Follows the position path tangent (plus the current offset from it)
    /// until displacement `disp`.
    pub fn tangent_until(self, disp: f64) -> PlannerResult<Self> {
        let segment = Arc::new(self.make_tangent(disp));
        self.check_continuity(&segment.begin(3).heading)?;
        Ok(self.push_pose_path(disp, segment))
    }

    /// Holds the current heading until displacement `disp`.
    pub fn constant_until(self, disp: f64) -> PlannerResult<Self> {
        let segment = Arc::new(self.make_constant(disp));
        self.check_continuity(&segment.begin(3).heading)?;
        Ok(self.push_pose_path(disp, segment))
    }

    /// Interpolates the heading linearly to `heading` at displacement
    /// `disp`.
    pub fn linear_until(self, disp: f64, heading: Rotation2) -> PlannerResult<Self> {
        let segment = Arc::new(self.make_linear(disp, heading));
        self.check_continuity(&segment.begin(3).heading)?;
        Ok(self.push_pose_path(disp, segment))
    }

    pub(crate) fn tangent_until_unchecked(self, disp: f64) -> Self {
        let segment = Arc::new(self.make_tangent(disp));
        self.push_pose_path(disp, segment)
    }

    pub(crate) fn constant_until_unchecked(self, disp: f64) -> Self {
        let segment = Arc::new(self.make_constant(disp));
        self.push_pose_path(disp, segment)
    }

    pub(crate) fn linear_until_unchecked(self, disp: f64, heading: Rotation2) -> Self {
        let segment = Arc::new(self.make_linear(disp, heading));
        self.push_pose_path(disp, segment)
    }

    /// Interpolates the heading with a spline to `heading` at displacement
    /// `disp`.
    ///
    /// The spline's free endpoint derivatives let it follow and precede any
    /// other heading segment with C2 continuity, so this method never
    /// fails.
    pub fn spline_until(mut self, disp: f64, heading: Rotation2) -> Self {
        assert!(self.end_disp < disp && disp <= self.pos_path.length());

        let view = self.view_until(disp);
        let length = disp - self.end_disp;
        self.state = match self.state {
            State::Eager {
                segments,
                end_heading_dual,
            } => State::Lazy {
                make_paths: Arc::new(move |end| {
                    let mut segs = segments.clone();
                    segs.push(Arc::new(HeadingPosePath::new(
                        view.clone(),
                        SplineHeadingPath::new(end_heading_dual, end, length),
                    )));
                    segs
                }),
                end_heading: heading,
            },
            State::Lazy {
                make_paths,
                end_heading,
            } => {
                let pos_path = self.pos_path.clone();
                let end_disp = self.end_disp;
                State::Lazy {
                    make_paths: Arc::new(move |end| {
                        let begin_tangent =
                            pos_path.get(end_disp, 4).drop_first(1).angle_cast();
                        let begin_heading = begin_tangent.with_value(end_heading);

                        let mut segs = make_paths(begin_heading);
                        segs.push(Arc::new(HeadingPosePath::new(
                            view.clone(),
                            SplineHeadingPath::new(begin_heading, end, length),
                        )));
                        segs
                    }),
                    end_heading: heading,
                }
            }
        };
        self.end_disp = disp;
        self
    }

    pub fn tangent_until_end(self) -> PlannerResult<Vec<CompositePosePath>> {
        let length = self.pos_path.length();
        Ok(self.tangent_until(length)?.build())
    }

    pub fn constant_until_end(self) -> PlannerResult<Vec<CompositePosePath>> {
        let length = self.pos_path.length();
        Ok(self.constant_until(length)?.build())
    }

    pub fn linear_until_end(self, heading: Rotation2) -> PlannerResult<Vec<CompositePosePath>> {
        let length = self.pos_path.length();
        Ok(self.linear_until(length, heading)?.build())
    }

    pub fn spline_until_end(self, heading: Rotation2) -> Vec<CompositePosePath> {
        let length = self.pos_path.length();
        self.spline_until(length, heading).build()
    }

    pub(crate) fn build(mut self) -> Vec<CompositePosePath> {
        assert!(self.end_disp == self.pos_path.length());

        let segments = match self.state {
            State::Eager { segments, .. } => segments,
            State::Lazy {
                make_paths,
                end_heading,
            } => {
                let end_tangent = self
                    .pos_path
                    .get(self.end_disp, 4)
                    .drop_first(1)
                    .angle_cast();
                make_paths(end_tangent.with_value(end_heading))
            }
        };
        self.pose_paths.push(CompositePosePath::new(segments));
        self.pose_paths
    }
}

/// Pose path builder whose type rules out continuity violations.
///
/// Directly after construction or a heading spline, any segment may follow.
/// Tangent, constant, and linear segments pin the end heading derivatives,
/// so they return a [`RestrictedPosePathBuilder`] that only admits heading
/// splines until the derivatives are free again.
#[derive(Clone)]
pub struct SafePosePathBuilder {
    inner: PosePathSeqBuilder,
}

/// See [`SafePosePathBuilder`].
#[derive(Clone)]
pub struct RestrictedPosePathBuilder {
    inner: PosePathSeqBuilder,
}

impl SafePosePathBuilder {
    pub fn new(pos_path: Arc<dyn PositionPath<Arclength>>, begin_heading: Rotation2) -> Self {
        Self {
            inner: PosePathSeqBuilder::new(pos_path, begin_heading),
        }
    }

    pub fn tangent_until(self, disp: f64) -> RestrictedPosePathBuilder {
        RestrictedPosePathBuilder {
            inner: self.inner.tangent_until_unchecked(disp),
        }
    }

    pub fn constant_until(self, disp: f64) -> RestrictedPosePathBuilder {
        RestrictedPosePathBuilder {
            inner: self.inner.constant_until_unchecked(disp),
        }
    }

    pub fn linear_until(self, disp: f64, heading: Rotation2) -> RestrictedPosePathBuilder {
        RestrictedPosePathBuilder {
            inner: self.inner.linear_until_unchecked(disp, heading),
        }
    }

    pub fn spline_until(self, disp: f64, heading: Rotation2) -> SafePosePathBuilder {
        SafePosePathBuilder {
            inner: self.inner.spline_until(disp, heading),
        }
    }

    pub fn tangent_until_end(self) -> Vec<CompositePosePath> {
        let length = self.inner.pos_path.length();
        self.inner.tangent_until_unchecked(length).build()
    }

    pub fn constant_until_end(self) -> Vec<CompositePosePath> {
        let length = self.inner.pos_path.length();
        self.inner.constant_until_unchecked(length).build()
    }

    pub fn linear_until_end(self, heading: Rotation2) -> Vec<CompositePosePath> {
        let length = self.inner.pos_path.length();
        self.inner.linear_until_unchecked(length, heading).build()
    }

    pub fn spline_until_end(self, heading: Rotation2) -> Vec<CompositePosePath> {
        self.inner.spline_until_end(heading)
    }
}

impl RestrictedPosePathBuilder {
    pub fn spline_until(self, disp: f64, heading: Rotation2) -> SafePosePathBuilder {
        SafePosePathBuilder {
            inner: self.inner.spline_until(disp, heading),
        }
    }

    pub fn spline_until_end(self, heading: Rotation2) -> Vec<CompositePosePath> {
        self.inner.spline_until_end(heading)
    }

    pub fn build(self) -> Vec<CompositePosePath> {
        self.inner.build()
    }
}
