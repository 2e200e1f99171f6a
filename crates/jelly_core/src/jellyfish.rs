//! Assembly of a generated jellyfish into a running solver, plus the
//! per-frame step and the read-only view handed to renderers.

use anyhow::{Context, Result};
use tracing::info;

use crate::animation::{retarget_rings, FrameUniforms, PhaseState};
use crate::builder::{GenerationContext, Generated, TopologyBuffers};
use crate::bulb::build_bulb;
use crate::constraint::HandleTable;
use crate::ring::RingRecord;
use crate::settings::JellyfishSettings;
use crate::solvers::VerletSystem;
use crate::spine::build_spine;
use crate::tail::build_tail;
use crate::traits::ConstraintSolver;

/// Runs every generator in order: spine, bulb, tail.
///
/// Generation is deterministic; the same settings always produce identical
/// buffers and constraints.
pub fn generate(settings: &JellyfishSettings) -> Generated {
    let mut ctx = GenerationContext::new();
    build_spine(&mut ctx, settings);
    build_bulb(&mut ctx, settings);
    build_tail(&mut ctx, settings);
    ctx.finish()
}

/// Borrowed buffers for one rendered frame. Positions are the solver's own
/// storage; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    pub positions: &'a [f32],
    pub positions_prev: &'a [f32],
    pub uvs: &'a [f32],
    pub links: &'a [u32],
    pub inner_links: &'a [u32],
    pub bulb_faces: &'a [u32],
    pub tail_faces: &'a [u32],
}

/// A generated jellyfish bound to a solver.
pub struct Jellyfish<S: ConstraintSolver = VerletSystem> {
    settings: JellyfishSettings,
    buffers: TopologyBuffers,
    bulb_rings: Vec<RingRecord>,
    tail_rings: Vec<RingRecord>,
    handles: HandleTable,
    solver: S,
    state: PhaseState,
    uniforms: FrameUniforms,
    frame: u64,
}

impl Jellyfish<VerletSystem> {
    /// Builds against the bundled [`VerletSystem`].
    pub fn build(settings: JellyfishSettings) -> Result<Self> {
        Self::build_with(settings)
    }
}

impl<S: ConstraintSolver> Jellyfish<S> {
    /// Validates settings, generates the topology, commits it to a fresh `S`
    /// and runs the settling pre-roll.
    pub fn build_with(settings: JellyfishSettings) -> Result<Self> {
        settings.validate()?;

        let Generated {
            buffers,
            registry,
            bulb_rings,
            tail_rings,
        } = generate(&settings);
        let mut solver = S::create(
            buffers.positions.clone(),
            settings.solver_iterations as usize,
        );
        let handles = registry
            .commit(&mut solver)
            .context("Failed to register constraints with the solver")?;
        info!(
            particles = buffers.particle_count(),
            constraints = handles.len(),
            bulb_rings = bulb_rings.len(),
            tail_rings = tail_rings.len(),
            "jellyfish generated"
        );

        for _ in 0..settings.preroll_steps {
            solver.tick(settings.preroll_dt);
        }
        info!(
            steps = settings.preroll_steps,
            dt = settings.preroll_dt,
            "pre-roll complete"
        );

        Ok(Self {
            settings,
            buffers,
            bulb_rings,
            tail_rings,
            handles,
            solver,
            state: PhaseState::default(),
            uniforms: FrameUniforms::default(),
            frame: 0,
        })
    }

    /// One frame: advance the phase clock, retarget every ring for the new
    /// phase, then tick the solver by `dt`.
    pub fn advance(&mut self, dt: f32) -> Result<FrameUniforms> {
        let state = self.state.advance(f64::from(dt));
        let phase = state.phase() as f32;
        retarget_rings(
            self.bulb_rings.iter().chain(&self.tail_rings),
            phase,
            self.settings.radius_offset,
            &self.handles,
            &mut self.solver,
        )
        .context("Failed to retarget ring constraints")?;
        self.solver.tick(dt);

        self.state = state;
        self.uniforms = state.uniforms();
        self.frame += 1;
        Ok(self.uniforms)
    }

    pub fn buffers(&self) -> BufferView<'_> {
        BufferView {
            positions: self.solver.positions(),
            positions_prev: self.solver.positions_prev(),
            uvs: &self.buffers.uvs,
            links: &self.buffers.links,
            inner_links: &self.buffers.inner_links,
            bulb_faces: &self.buffers.bulb_faces,
            tail_faces: &self.buffers.tail_faces,
        }
    }

    /// Bulb rings followed by tail rings.
    pub fn rings(&self) -> impl Iterator<Item = &RingRecord> {
        self.bulb_rings.iter().chain(&self.tail_rings)
    }

    pub fn bulb_rings(&self) -> &[RingRecord] {
        &self.bulb_rings
    }

    pub fn tail_rings(&self) -> &[RingRecord] {
        &self.tail_rings
    }

    /// Uniforms from the most recent [`advance`](Self::advance).
    pub fn uniforms(&self) -> FrameUniforms {
        self.uniforms
    }

    /// Number of completed frames. Changes exactly when the position buffers do.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn settings(&self) -> &JellyfishSettings {
        &self.settings
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }
}
