use num_traits::{Float, FloatConst, FromPrimitive};
use std::fmt::Debug;

use crate::constraint::{Constraint, ConstraintHandle, PointConstraint};
use crate::error::SolverError;

/// A trait for types that can be used as scalars in the profile curves.
/// Must support basic arithmetic, debug printing, pi, and conversion from f64.
pub trait Scalar: Float + FloatConst + FromPrimitive + Debug + 'static {}

impl<T: Float + FloatConst + FromPrimitive + Debug + 'static> Scalar for T {}

/// A particle engine that owns the position buffers and relaxes constraints.
///
/// Positions are flat `[x, y, z]` triples; particle `i` lives at `3 * i`.
pub trait ConstraintSolver {
    /// Allocates storage for `positions.len() / 3` particles.
    /// `iterations` is the number of relaxation passes per tick.
    fn create(positions: Vec<f32>, iterations: usize) -> Self
    where
        Self: Sized;

    fn particle_count(&self) -> usize;

    /// Registers a constraint. Must happen before the first tick.
    fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle, SolverError>;

    /// Registers an absolute pin, applied after every other constraint.
    fn add_pin_constraint(&mut self, pin: PointConstraint) -> Result<(), SolverError>;

    /// Weight 0 excludes a particle from force integration.
    fn set_weight(&mut self, index: u32, weight: f32) -> Result<(), SolverError>;

    /// Rewrites the `[min, max]` range of a registered distance constraint in place.
    fn set_distance_range(
        &mut self,
        handle: ConstraintHandle,
        min: f32,
        max: f32,
    ) -> Result<(), SolverError>;

    /// Advances positions one simulation step.
    fn tick(&mut self, dt: f32);

    fn positions(&self) -> &[f32];

    fn positions_prev(&self) -> &[f32];
}
