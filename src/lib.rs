//! motion_planning - 2D motion planning for wheeled mobile robots
//!
//! This crate provides the core pipeline for planning time-parameterized
//! trajectories: dual-number automatic differentiation, planar geometry,
//! arc-length-parameterized spline paths, heading interpolation,
//! constraint-based motion profiles, and trajectory assembly.

pub mod autodiff;
pub mod builders;
pub mod common;
pub mod geometry;
pub mod math;
pub mod paths;
pub mod profile;
pub mod trajectory;

// Re-export the main entry points for convenience
pub use builders::{PathBuilder, TrajectoryBuilder, TrajectoryBuilderParams};
pub use common::{PlannerError, PlannerResult};
pub use geometry::{Pose2, Rotation2, Vector2};
pub use trajectory::{DisplacementTrajectory, TimeTrajectory, Trajectory};
