use nalgebra::Vector3;
use tracing::warn;

use crate::constraint::{
    AxisConstraint, Constraint, ConstraintHandle, DistanceConstraint, PointConstraint,
};
use crate::error::SolverError;
use crate::traits::ConstraintSolver;

/// Position-based Verlet particle system with iterative constraint relaxation.
///
/// Velocity is implicit in `positions - positions_prev`. Each tick integrates
/// every weighted particle, then runs `iterations` passes over the registered
/// constraints, applying pins at the end of every pass.
pub struct VerletSystem {
    positions: Vec<f32>,
    positions_prev: Vec<f32>,
    weights: Vec<f32>,
    iterations: usize,
    friction: f32,
    force: Vector3<f32>,
    constraints: Vec<Constraint>,
    pins: Vec<PointConstraint>,
}

impl VerletSystem {
    pub fn new(positions: Vec<f32>, iterations: usize) -> Self {
        assert!(
            positions.len() % 3 == 0,
            "positions must hold xyz triples, got {} values",
            positions.len()
        );
        let count = positions.len() / 3;
        Self {
            positions_prev: positions.clone(),
            positions,
            weights: vec![1.0; count],
            iterations,
            friction: 0.01,
            force: Vector3::zeros(),
            constraints: Vec::new(),
            pins: Vec::new(),
        }
    }

    /// Uniform acceleration applied to every weighted particle.
    pub fn with_force(mut self, force: [f32; 3]) -> Self {
        self.force = Vector3::from(force);
        self
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle.index())
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn pins(&self) -> &[PointConstraint] {
        &self.pins
    }

    fn check_index(&self, index: u32) -> Result<(), SolverError> {
        let count = self.weights.len();
        if (index as usize) < count {
            Ok(())
        } else {
            Err(SolverError::ParticleOutOfRange { index, count })
        }
    }

    fn integrate(&mut self, dt: f32) {
        let keep = 1.0 - self.friction;
        let accel = self.force * (dt * dt);
        for (i, &weight) in self.weights.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let current = read(&self.positions, i);
            let previous = read(&self.positions_prev, i);
            let next = current + (current - previous) * keep + accel * weight;
            write(&mut self.positions_prev, i, current);
            write(&mut self.positions, i, next);
        }
    }

    fn satisfy_constraints(&mut self) {
        for _ in 0..self.iterations {
            for constraint in &self.constraints {
                match constraint {
                    Constraint::Distance(c) => {
                        apply_distance(&mut self.positions, &self.weights, c)
                    }
                    Constraint::Axis(c) => apply_axis(&mut self.positions, c),
                    Constraint::Point(c) => {
                        apply_point(&mut self.positions, &mut self.positions_prev, c)
                    }
                }
            }
            for pin in &self.pins {
                apply_point(&mut self.positions, &mut self.positions_prev, pin);
            }
        }
    }
}

impl ConstraintSolver for VerletSystem {
    fn create(positions: Vec<f32>, iterations: usize) -> Self {
        Self::new(positions, iterations)
    }

    fn particle_count(&self) -> usize {
        self.weights.len()
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintHandle, SolverError> {
        if let Some(max) = constraint.max_index() {
            self.check_index(max)?;
        }
        let handle = ConstraintHandle(self.constraints.len());
        self.constraints.push(constraint);
        Ok(handle)
    }

    fn add_pin_constraint(&mut self, pin: PointConstraint) -> Result<(), SolverError> {
        self.check_index(pin.index)?;
        self.pins.push(pin);
        Ok(())
    }

    fn set_weight(&mut self, index: u32, weight: f32) -> Result<(), SolverError> {
        self.check_index(index)?;
        self.weights[index as usize] = weight;
        Ok(())
    }

    fn set_distance_range(
        &mut self,
        handle: ConstraintHandle,
        min: f32,
        max: f32,
    ) -> Result<(), SolverError> {
        self.constraints
            .get_mut(handle.index())
            .ok_or(SolverError::UnknownConstraint(handle))?
            .as_distance_mut()
            .ok_or(SolverError::NotDistance(handle))?
            .set_range(min, max)
    }

    fn tick(&mut self, dt: f32) {
        self.integrate(dt);
        self.satisfy_constraints();

        let finite = self.positions.iter().all(|v| v.is_finite());
        if !finite {
            warn!(dt, "particle positions became non-finite");
        }
        debug_assert!(finite, "particle positions became non-finite after tick");
    }

    fn positions(&self) -> &[f32] {
        &self.positions
    }

    fn positions_prev(&self) -> &[f32] {
        &self.positions_prev
    }
}

fn read(buf: &[f32], index: usize) -> Vector3<f32> {
    Vector3::from_column_slice(&buf[index * 3..index * 3 + 3])
}

fn write(buf: &mut [f32], index: usize, value: Vector3<f32>) {
    buf[index * 3..index * 3 + 3].copy_from_slice(value.as_slice());
}

/// Moves each pair toward the allowed range, split by relative weight.
fn apply_distance(positions: &mut [f32], weights: &[f32], constraint: &DistanceConstraint) {
    let [min, max] = constraint.range();
    for (a, b) in constraint.pairs() {
        let wa = weights[a];
        let wb = weights[b];
        let total = wa + wb;
        if total <= 0.0 {
            continue;
        }

        let pa = read(positions, a);
        let pb = read(positions, b);
        let delta = pb - pa;
        let length = delta.norm();
        if length <= f32::EPSILON {
            continue;
        }
        let target = if length < min {
            min
        } else if length > max {
            max
        } else {
            continue;
        };

        let correction = delta * ((length - target) / length);
        write(positions, a, pa + correction * (wa / total));
        write(positions, b, pb - correction * (wb / total));
    }
}

/// Projects each particle onto the line through the two anchors.
fn apply_axis(positions: &mut [f32], constraint: &AxisConstraint) {
    let origin = read(positions, constraint.start as usize);
    let axis = read(positions, constraint.end as usize) - origin;
    let length_sq = axis.norm_squared();
    if length_sq <= f32::EPSILON {
        return;
    }
    for &index in &constraint.indices {
        let p = read(positions, index as usize);
        let along = (p - origin).dot(&axis) / length_sq;
        write(positions, index as usize, origin + axis * along);
    }
}

fn apply_point(positions: &mut [f32], positions_prev: &mut [f32], constraint: &PointConstraint) {
    let target = Vector3::from(constraint.position);
    write(positions, constraint.index as usize, target);
    write(positions_prev, constraint.index as usize, target);
}
