//! Pulse animation: a cyclic phase drives ring constraint ranges.
//!
//! Nothing is added or removed after assembly. Each frame only rewrites the
//! `[min, max]` of existing ring constraints and then ticks the solver.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constraint::HandleTable;
use crate::error::SolverError;
use crate::ring::RingRecord;
use crate::traits::ConstraintSolver;

/// Smooth 0 -> 1 -> 0 oscillation with period 2.
pub fn phase(time: f64) -> f64 {
    0.5 * ((time * PI - 0.5 * PI).sin() + 1.0)
}

/// Scalars a renderer feeds to shader uniforms each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameUniforms {
    pub phase: f32,
    pub time: f32,
}

/// Elapsed animation time. Advanced explicitly by the host, once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub elapsed: f64,
}

impl PhaseState {
    pub fn advance(self, dt: f64) -> Self {
        Self {
            elapsed: self.elapsed + dt,
        }
    }

    pub fn phase(&self) -> f64 {
        phase(self.elapsed)
    }

    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            phase: self.phase() as f32,
            time: self.elapsed as f32,
        }
    }
}

/// Radius boost for a ring at the given phase.
pub fn ring_boost(ring: &RingRecord, phase: f32, radius_offset: f32) -> f32 {
    ring.param * phase * radius_offset
}

/// Rewrites the outer, inner and spine ranges of every ring for `phase`.
pub fn retarget_rings<'a, S: ConstraintSolver>(
    rings: impl IntoIterator<Item = &'a RingRecord>,
    phase: f32,
    radius_offset: f32,
    handles: &HandleTable,
    solver: &mut S,
) -> Result<(), SolverError> {
    for ring in rings {
        let targets = ring.targets(ring_boost(ring, phase, radius_offset));
        let [min, max] = targets.outer;
        solver.set_distance_range(handles.resolve(ring.outer)?, min, max)?;
        let [min, max] = targets.inner;
        solver.set_distance_range(handles.resolve(ring.inner)?, min, max)?;
        if let (Some(link), Some([min, max])) = (ring.spine, targets.spine) {
            solver.set_distance_range(handles.resolve(link.handle)?, min, max)?;
        }
    }
    Ok(())
}
