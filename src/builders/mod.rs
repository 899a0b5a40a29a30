//! Persistent, continuity-checked path and trajectory builders
//!
//! Every builder is an immutable value: each call consumes the builder and
//! returns a new one, so intermediate builders can be kept and extended in
//! several directions.

pub mod path;
pub mod pose;
pub mod position;
pub mod trajectory;

pub use path::PathBuilder;
pub use pose::{PosePathSeqBuilder, RestrictedPosePathBuilder, SafePosePathBuilder};
pub use position::PositionPathSeqBuilder;
pub use trajectory::{
    IdentityPoseMap, MappedPosePath, PoseMap, TrajectoryBuilder, TrajectoryBuilderParams,
};

/// Tolerance for tangent and heading continuity checks, in radians
pub const HEADING_EPS: f64 = 1e-6;
