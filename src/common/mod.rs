//! Common error definitions for motion_planning

pub mod error;

pub use error::*;
