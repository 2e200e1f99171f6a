use thiserror::Error;

use crate::constraint::ConstraintHandle;

/// Failures at the solver boundary. All of them indicate a malformed
/// constraint graph rather than a numerical problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("particle index {index} is out of range for {count} particles")]
    ParticleOutOfRange { index: u32, count: usize },
    #[error("unknown constraint handle {0:?}")]
    UnknownConstraint(ConstraintHandle),
    #[error("constraint {0:?} is not a distance constraint")]
    NotDistance(ConstraintHandle),
    #[error("invalid distance range [{min}, {max}]")]
    InvalidRange { min: f32, max: f32 },
}
