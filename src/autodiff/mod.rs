//! Forward automatic differentiation via truncated dual numbers
//!
//! Quantities carry their value and up to three derivatives with respect
//! to a single parameter, identified at compile time by a zero-sized
//! marker type so that e.g. arc-length and time derivatives cannot be
//! mixed by accident.

pub mod dual_number;

pub use dual_number::DualNum;

/// Marker for quantities differentiated with respect to arc length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arclength;

/// Marker for quantities differentiated with respect to time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time;

/// Marker for quantities differentiated with respect to a curve's internal
/// parameter (prior to arc-length reparameterization).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParam;
