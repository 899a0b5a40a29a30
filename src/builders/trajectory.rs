//! Trajectory builder: paths, per-segment constraints, and profiles

use std::sync::Arc;

use crate::autodiff::Arclength;
use crate::builders::path::PathBuilder;
use crate::common::PlannerResult;
use crate::geometry::{Pose2, Pose2Dual, Rotation2, Vector2};
use crate::paths::PosePath;
use crate::profile::{
    profile, AccelConstraint, CompositeAccelConstraint, CompositeVelConstraint, ProfileParams,
    VelConstraint,
};
use crate::trajectory::Trajectory;

/// Transform applied to path poses before constraint evaluation and output,
/// e.g. for field-relative mirroring.
pub trait PoseMap: Send + Sync {
    fn map(&self, pose: Pose2Dual<Arclength>) -> Pose2Dual<Arclength>;
}

pub struct IdentityPoseMap;

impl PoseMap for IdentityPoseMap {
    fn map(&self, pose: Pose2Dual<Arclength>) -> Pose2Dual<Arclength> {
        pose
    }
}

/// Pose path seen through a [`PoseMap`]
#[derive(Clone)]
pub struct MappedPosePath {
    pub base_path: Arc<dyn PosePath>,
    pub pose_map: Arc<dyn PoseMap>,
}

impl PosePath for MappedPosePath {
    fn length(&self) -> f64 {
        self.base_path.length()
    }

    fn get(&self, s: f64, n: usize) -> Pose2Dual<Arclength> {
        self.pose_map.map(self.base_path.get(s, n))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryBuilderParams {
    /// Arc length quadrature tolerance for spline segments
    pub arc_length_sampling_eps: f64,
    pub profile_params: ProfileParams,
}

/// Builds trajectories segment by segment, threading per-segment velocity
/// and acceleration constraint overrides through to profile generation.
#[derive(Clone)]
pub struct TrajectoryBuilder {
    profile_params: ProfileParams,
    path_builder: PathBuilder,
    begin_end_vel: f64,
    base_vel_constraint: Arc<dyn VelConstraint>,
    base_accel_constraint: Arc<dyn AccelConstraint>,
    pose_map: Arc<dyn PoseMap>,
    vel_constraints: Vec<Arc<dyn VelConstraint>>,
    accel_constraints: Vec<Arc<dyn AccelConstraint>>,
}

impl TrajectoryBuilder {
    pub fn new(
        params: TrajectoryBuilderParams,
        begin_pose: Pose2,
        begin_end_vel: f64,
        base_vel_constraint: Arc<dyn VelConstraint>,
        base_accel_constraint: Arc<dyn AccelConstraint>,
    ) -> Self {
        Self {
            profile_params: params.profile_params,
            path_builder: PathBuilder::new(begin_pose, params.arc_length_sampling_eps),
            begin_end_vel,
            base_vel_constraint,
            base_accel_constraint,
            pose_map: Arc::new(IdentityPoseMap),
            vel_constraints: Vec::new(),
            accel_constraints: Vec::new(),
        }
    }

    pub fn with_pose_map(mut self, pose_map: Arc<dyn PoseMap>) -> Self {
        self.pose_map = pose_map;
        self
    }

    fn add(
        mut self,
        path_builder: PathBuilder,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        self.path_builder = path_builder;
        let vel = vel_override.unwrap_or_else(|| self.base_vel_constraint.clone());
        let accel = accel_override.unwrap_or_else(|| self.base_accel_constraint.clone());
        self.vel_constraints.push(vel);
        self.accel_constraints.push(accel);
        self
    }

    pub fn set_tangent(mut self, tangent: Rotation2) -> Self {
        self.path_builder = self.path_builder.set_tangent(tangent);
        self
    }

    pub fn set_reversed(mut self, reversed: bool) -> Self {
        self.path_builder = self.path_builder.set_reversed(reversed);
        self
    }

    pub fn line_to_x(
        self,
        pos_x: f64,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().line_to_x(pos_x);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_x_constant_heading(
        self,
        pos_x: f64,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().line_to_x_constant_heading(pos_x);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_x_linear_heading(
        self,
        pos_x: f64,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .line_to_x_linear_heading(pos_x, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_x_spline_heading(
        self,
        pos_x: f64,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .line_to_x_spline_heading(pos_x, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_y(
        self,
        pos_y: f64,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().line_to_y(pos_y);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_y_constant_heading(
        self,
        pos_y: f64,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().line_to_y_constant_heading(pos_y);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_y_linear_heading(
        self,
        pos_y: f64,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .line_to_y_linear_heading(pos_y, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn line_to_y_spline_heading(
        self,
        pos_y: f64,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .line_to_y_spline_heading(pos_y, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn strafe_to(
        self,
        pos: Vector2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().strafe_to(pos);
        self.add(b, vel_override, accel_override)
    }

    pub fn strafe_to_constant_heading(
        self,
        pos: Vector2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().strafe_to_constant_heading(pos);
        self.add(b, vel_override, accel_override)
    }

    pub fn strafe_to_linear_heading(
        self,
        pos: Vector2,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .strafe_to_linear_heading(pos, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn strafe_to_spline_heading(
        self,
        pos: Vector2,
        heading: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .strafe_to_spline_heading(pos, heading);
        self.add(b, vel_override, accel_override)
    }

    pub fn spline_to(
        self,
        pos: Vector2,
        tangent: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self.path_builder.clone().spline_to(pos, tangent);
        self.add(b, vel_override, accel_override)
    }

    pub fn spline_to_constant_heading(
        self,
        pos: Vector2,
        tangent: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .spline_to_constant_heading(pos, tangent);
        self.add(b, vel_override, accel_override)
    }

    pub fn spline_to_linear_heading(
        self,
        pose: Pose2,
        tangent: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .spline_to_linear_heading(pose, tangent);
        self.add(b, vel_override, accel_override)
    }

    pub fn spline_to_spline_heading(
        self,
        pose: Pose2,
        tangent: Rotation2,
        vel_override: Option<Arc<dyn VelConstraint>>,
        accel_override: Option<Arc<dyn AccelConstraint>>,
    ) -> Self {
        let b = self
            .path_builder
            .clone()
            .spline_to_spline_heading(pose, tangent);
        self.add(b, vel_override, accel_override)
    }

    /// Builds one trajectory per continuity-split pose path, profiling
    /// each with the composite of its segments' constraints.
    pub fn build(self) -> PlannerResult<Vec<Trajectory>> {
        let raw_paths = self.path_builder.build()?;

        let mut trajectories = Vec::with_capacity(raw_paths.len());
        let mut constraint_offset = 0;
        for raw_path in raw_paths {
            let segment_count = raw_path.paths.len();
            let offsets = raw_path.offsets.clone();

            let path: Arc<dyn PosePath> = Arc::new(MappedPosePath {
                base_path: Arc::new(raw_path),
                pose_map: self.pose_map.clone(),
            });

            let vel_constraint = CompositeVelConstraint::new(
                self.vel_constraints[constraint_offset..constraint_offset + segment_count]
                    .to_vec(),
                offsets.clone(),
            );
            let accel_constraint = CompositeAccelConstraint::new(
                self.accel_constraints[constraint_offset..constraint_offset + segment_count]
                    .to_vec(),
                offsets.clone(),
            );

            let profile = profile(
                &self.profile_params,
                &*path,
                self.begin_end_vel,
                &vel_constraint,
                &accel_constraint,
            );
            trajectories.push(Trajectory {
                path,
                profile,
                offsets,
            });
            constraint_offset += segment_count;
        }

        Ok(trajectories)
    }
}
