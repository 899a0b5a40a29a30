//! Planar geometry: vectors, unit-complex rotations, rigid poses, and
//! their dual-number counterparts

pub mod pose;
pub mod rotation;
pub mod vector;

pub use pose::{Pose2, Pose2Dual, Twist2, Twist2Dual};
pub use rotation::{Rotation2, Rotation2Dual};
pub use vector::{Vector2, Vector2Dual};
