//! Constraint kinds and the registry that queues them during generation.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::traits::ConstraintSolver;

/// Stable index of a constraint, either in a [`ConstraintRegistry`] or in a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintHandle(pub usize);

impl ConstraintHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index pairs kept within a mutable `[min, max]` length range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceConstraint {
    range: [f32; 2],
    /// Flat `[a0, b0, a1, b1, ...]` pairs.
    indices: Vec<u32>,
}

impl DistanceConstraint {
    pub fn new(range: [f32; 2], indices: Vec<u32>) -> Self {
        assert!(
            indices.len() % 2 == 0,
            "distance constraint needs index pairs, got {} indices",
            indices.len()
        );
        assert!(
            range[0] <= range[1],
            "distance range [{}, {}] is inverted",
            range[0],
            range[1]
        );
        Self { range, indices }
    }

    pub fn range(&self) -> [f32; 2] {
        self.range
    }

    pub fn set_range(&mut self, min: f32, max: f32) -> Result<(), SolverError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(SolverError::InvalidRange { min, max });
        }
        self.range = [min, max];
        Ok(())
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices
            .chunks_exact(2)
            .map(|p| (p[0] as usize, p[1] as usize))
    }
}

/// A single particle held at an absolute coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointConstraint {
    pub index: u32,
    pub position: [f32; 3],
}

impl PointConstraint {
    pub fn new(index: u32, position: [f32; 3]) -> Self {
        Self { index, position }
    }
}

/// Particles held on the line through two anchor particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConstraint {
    pub start: u32,
    pub end: u32,
    pub indices: Vec<u32>,
}

impl AxisConstraint {
    pub fn new(start: u32, end: u32, indices: Vec<u32>) -> Self {
        assert!(start != end, "axis anchors must differ, both are {start}");
        Self {
            start,
            end,
            indices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    Distance(DistanceConstraint),
    Point(PointConstraint),
    Axis(AxisConstraint),
}

impl Constraint {
    /// Largest particle index the constraint touches.
    pub fn max_index(&self) -> Option<u32> {
        match self {
            Constraint::Distance(c) => c.indices.iter().copied().max(),
            Constraint::Point(c) => Some(c.index),
            Constraint::Axis(c) => c
                .indices
                .iter()
                .copied()
                .chain([c.start, c.end])
                .max(),
        }
    }

    pub fn as_distance(&self) -> Option<&DistanceConstraint> {
        match self {
            Constraint::Distance(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_distance_mut(&mut self) -> Option<&mut DistanceConstraint> {
        match self {
            Constraint::Distance(c) => Some(c),
            _ => None,
        }
    }
}

impl From<DistanceConstraint> for Constraint {
    fn from(value: DistanceConstraint) -> Self {
        Constraint::Distance(value)
    }
}

impl From<AxisConstraint> for Constraint {
    fn from(value: AxisConstraint) -> Self {
        Constraint::Axis(value)
    }
}

impl From<PointConstraint> for Constraint {
    fn from(value: PointConstraint) -> Self {
        Constraint::Point(value)
    }
}

/// Maps registry handles to the handles a solver assigned on commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleTable {
    solver_handles: Vec<ConstraintHandle>,
}

impl HandleTable {
    pub fn resolve(&self, handle: ConstraintHandle) -> Result<ConstraintHandle, SolverError> {
        self.solver_handles
            .get(handle.index())
            .copied()
            .ok_or(SolverError::UnknownConstraint(handle))
    }

    pub(crate) fn len(&self) -> usize {
        self.solver_handles.len()
    }
}

/// Accumulates constraints, pins and per-particle weights until they are
/// committed to a solver in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintRegistry {
    constraints: Vec<Constraint>,
    pins: Vec<PointConstraint>,
    weights: Vec<(u32, f32)>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, constraint: impl Into<Constraint>) -> ConstraintHandle {
        let handle = ConstraintHandle(self.constraints.len());
        self.constraints.push(constraint.into());
        handle
    }

    pub fn pin(&mut self, pin: PointConstraint) {
        self.pins.push(pin);
    }

    pub fn set_weight(&mut self, index: u32, weight: f32) {
        self.weights.push((index, weight));
    }

    pub fn get(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle.index())
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn pins(&self) -> &[PointConstraint] {
        &self.pins
    }

    pub fn weights(&self) -> &[(u32, f32)] {
        &self.weights
    }

    /// Largest particle index referenced by any queued constraint or pin.
    pub fn max_index(&self) -> Option<u32> {
        self.constraints
            .iter()
            .filter_map(Constraint::max_index)
            .chain(self.pins.iter().map(|p| p.index))
            .chain(self.weights.iter().map(|(i, _)| *i))
            .max()
    }

    /// Hands every constraint to `solver` in queue order, then weights, then pins.
    pub fn commit<S: ConstraintSolver>(self, solver: &mut S) -> Result<HandleTable, SolverError> {
        let mut solver_handles = Vec::with_capacity(self.constraints.len());
        for constraint in self.constraints {
            solver_handles.push(solver.add_constraint(constraint)?);
        }
        for (index, weight) in self.weights {
            solver.set_weight(index, weight)?;
        }
        for pin in self.pins {
            solver.add_pin_constraint(pin)?;
        }
        Ok(HandleTable { solver_handles })
    }
}
