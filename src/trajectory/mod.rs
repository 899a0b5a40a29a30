//! Trajectories: pose paths paired with motion profiles

use std::sync::Arc;

use crate::autodiff::Time;
use crate::geometry::{Pose2Dual, Vector2};
use crate::paths::PosePath;
use crate::profile::{CancelableProfile, DisplacementProfile, TimeProfile};

/// Pose path with a cancelable motion profile and the displacement offsets
/// of its constituent segments.
#[derive(Clone)]
pub struct Trajectory {
    pub path: Arc<dyn PosePath>,
    pub profile: CancelableProfile,
    pub offsets: Vec<f64>,
}

impl Trajectory {
    pub fn length(&self) -> f64 {
        self.path.length()
    }

    pub fn to_displacement(&self) -> DisplacementTrajectory {
        DisplacementTrajectory {
            path: self.path.clone(),
            profile: self.profile.base_profile.clone(),
        }
    }

    pub fn to_time(&self) -> TimeTrajectory {
        TimeTrajectory::new(self.path.clone(), TimeProfile::new(self.profile.base_profile.clone()))
    }
}

/// Trajectory sampled by displacement
#[derive(Clone)]
pub struct DisplacementTrajectory {
    pub path: Arc<dyn PosePath>,
    pub profile: DisplacementProfile,
}

impl DisplacementTrajectory {
    pub fn new(path: Arc<dyn PosePath>, profile: DisplacementProfile) -> Self {
        Self { path, profile }
    }

    pub fn length(&self) -> f64 {
        self.path.length()
    }

    /// The time-parameterized pose at displacement `s`.
    pub fn get(&self, s: f64) -> Pose2Dual<Time> {
        self.path.get(s, 3).reparam(self.profile.get(s))
    }
}

/// Trajectory sampled by time
#[derive(Clone)]
pub struct TimeTrajectory {
    pub path: Arc<dyn PosePath>,
    pub profile: TimeProfile,
}

impl TimeTrajectory {
    pub fn new(path: Arc<dyn PosePath>, profile: TimeProfile) -> Self {
        Self { path, profile }
    }

    pub fn duration(&self) -> f64 {
        self.profile.duration
    }

    /// The pose with time derivatives at time `t`.
    pub fn get(&self, t: f64) -> Pose2Dual<Time> {
        let x = self.profile.get(t);
        self.path.get(x.value(), 3).reparam(x)
    }
}

/// The displacement of the point on `path` closest to `query`, refined
/// from `init` by a few clamped Newton iterations.
pub fn project(path: &dyn PosePath, query: Vector2, init: f64) -> f64 {
    (0..10).fold(init, |s, _| {
        let guess = path.get(s, 3).position;
        let ds = (query - guess.value()).dot(guess.drop_first(1).value());
        (s + ds).clamp(0.0, path.length())
    })
}
