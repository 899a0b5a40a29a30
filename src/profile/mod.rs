//! Constraint-driven motion profile generation
//!
//! Profiles are generated over displacement by a forward pass (acceleration
//! limits), a backward pass (deceleration limits), and a merge that keeps
//! the pointwise minimum velocity, then consumed over displacement or time.

pub mod constraints;
pub mod displacement;
pub mod generator;

pub use constraints::{
    AccelConstraint, AngularVelConstraint, CompositeAccelConstraint, CompositeVelConstraint,
    MinVelConstraint, ProfileAccelConstraint, TranslationalVelConstraint, VelConstraint,
};
pub use displacement::{CancelableProfile, DisplacementProfile, TimeProfile};
pub use generator::{
    backward_profile_sampled, constant_profile, forward_profile_sampled, merge, profile,
    profile_sampled, sample_path_by_rotation, ProfileParams,
};
