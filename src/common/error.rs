//! Error types for motion_planning

use std::fmt;

/// Main error type for the planning pipeline
#[derive(Debug)]
pub enum PlannerError {
    /// A heading segment's begin state failed to match the running end state
    ContinuityViolation(String),
    /// Invalid parameter
    InvalidParameter(String),
    /// Numerical computation failed
    NumericalError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::ContinuityViolation(msg) => write!(f, "Continuity violation: {}", msg),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planning operations
pub type PlannerResult<T> = Result<T, PlannerError>;
