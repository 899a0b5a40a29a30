//! Velocity and acceleration constraints consulted during profiling

use std::sync::Arc;

use crate::autodiff::Arclength;
use crate::geometry::Pose2Dual;
use crate::math::MinMax;
use crate::paths::PosePath;

/// Upper bound on robot velocity at a point of a pose path
pub trait VelConstraint: Send + Sync {
    fn max_robot_vel(&self, robot_pose: &Pose2Dual<Arclength>, path: &dyn PosePath, s: f64)
        -> f64;
}

/// Feasible profile acceleration interval at a point of a pose path
pub trait AccelConstraint: Send + Sync {
    fn min_max_profile_accel(
        &self,
        robot_pose: &Pose2Dual<Arclength>,
        path: &dyn PosePath,
        s: f64,
    ) -> MinMax;
}

#[derive(Debug, Clone, Copy)]
pub struct TranslationalVelConstraint {
    pub max_trans_vel: f64,
}

impl TranslationalVelConstraint {
    pub fn new(max_trans_vel: f64) -> Self {
        assert!(max_trans_vel > 0.0);
        Self { max_trans_vel }
    }
}

impl VelConstraint for TranslationalVelConstraint {
    fn max_robot_vel(&self, _: &Pose2Dual<Arclength>, _: &dyn PosePath, _: f64) -> f64 {
        self.max_trans_vel
    }
}

/// Caps the profile velocity so the heading rate stays within bounds.
#[derive(Debug, Clone, Copy)]
pub struct AngularVelConstraint {
    pub max_ang_vel: f64,
}

impl AngularVelConstraint {
    pub fn new(max_ang_vel: f64) -> Self {
        assert!(max_ang_vel > 0.0);
        Self { max_ang_vel }
    }
}

impl VelConstraint for AngularVelConstraint {
    fn max_robot_vel(&self, robot_pose: &Pose2Dual<Arclength>, _: &dyn PosePath, _: f64) -> f64 {
        // d(theta)/ds caps ds/dt
        (self.max_ang_vel / robot_pose.velocity().angle.value()).abs()
    }
}

/// Pointwise minimum of several velocity constraints
#[derive(Clone)]
pub struct MinVelConstraint {
    pub constraints: Vec<Arc<dyn VelConstraint>>,
}

impl VelConstraint for MinVelConstraint {
    fn max_robot_vel(
        &self,
        robot_pose: &Pose2Dual<Arclength>,
        path: &dyn PosePath,
        s: f64,
    ) -> f64 {
        self.constraints
            .iter()
            .map(|c| c.max_robot_vel(robot_pose, path, s))
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfileAccelConstraint {
    pub min_accel: f64,
    pub max_accel: f64,
}

impl ProfileAccelConstraint {
    pub fn new(min_accel: f64, max_accel: f64) -> Self {
        assert!(min_accel < 0.0);
        assert!(max_accel > 0.0);
        Self {
            min_accel,
            max_accel,
        }
    }
}

impl AccelConstraint for ProfileAccelConstraint {
    fn min_max_profile_accel(&self, _: &Pose2Dual<Arclength>, _: &dyn PosePath, _: f64) -> MinMax {
        MinMax::new(self.min_accel, self.max_accel)
    }
}

/// Velocity constraint that switches by displacement interval.
///
/// `offsets` has one more entry than `constraints`; constraint `i` governs
/// `[offsets[i], offsets[i + 1])`.
#[derive(Clone)]
pub struct CompositeVelConstraint {
    pub constraints: Vec<Arc<dyn VelConstraint>>,
    pub offsets: Vec<f64>,
}

impl CompositeVelConstraint {
    pub fn new(constraints: Vec<Arc<dyn VelConstraint>>, offsets: Vec<f64>) -> Self {
        assert_eq!(constraints.len() + 1, offsets.len());
        Self {
            constraints,
            offsets,
        }
    }
}

impl VelConstraint for CompositeVelConstraint {
    fn max_robot_vel(
        &self,
        robot_pose: &Pose2Dual<Arclength>,
        path: &dyn PosePath,
        s: f64,
    ) -> f64 {
        for (i, constraint) in self.constraints.iter().enumerate().skip(1).rev() {
            if s >= self.offsets[i] {
                return constraint.max_robot_vel(robot_pose, path, s);
            }
        }
        self.constraints[0].max_robot_vel(robot_pose, path, s)
    }
}

/// Acceleration constraint that switches by displacement interval
#[derive(Clone)]
pub struct CompositeAccelConstraint {
    pub constraints: Vec<Arc<dyn AccelConstraint>>,
    pub offsets: Vec<f64>,
}

impl CompositeAccelConstraint {
    pub fn new(constraints: Vec<Arc<dyn AccelConstraint>>, offsets: Vec<f64>) -> Self {
        assert_eq!(constraints.len() + 1, offsets.len());
        Self {
            constraints,
            offsets,
        }
    }
}

impl AccelConstraint for CompositeAccelConstraint {
    fn min_max_profile_accel(
        &self,
        robot_pose: &Pose2Dual<Arclength>,
        path: &dyn PosePath,
        s: f64,
    ) -> MinMax {
        for (i, constraint) in self.constraints.iter().enumerate().skip(1).rev() {
            if s >= self.offsets[i] {
                return constraint.min_max_profile_accel(robot_pose, path, s);
            }
        }
        self.constraints[0].min_max_profile_accel(robot_pose, path, s)
    }
}
