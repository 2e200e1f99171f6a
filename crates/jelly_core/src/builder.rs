//! Shared state threaded through the spine, bulb and tail builders.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintHandle, ConstraintRegistry};
use crate::ring::RingRecord;

/// Static buffers produced by generation. Lengths never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyBuffers {
    /// Initial particle positions as flat `[x, y, z]` triples.
    pub positions: Vec<f32>,
    /// One `[u, v]` pair per particle.
    pub uvs: Vec<f32>,
    /// Hood wireframe edges.
    pub links: Vec<u32>,
    /// Bracing and tail edges, for diagnostic point/line views.
    pub inner_links: Vec<u32>,
    pub bulb_faces: Vec<u32>,
    pub tail_faces: Vec<u32>,
}

impl TopologyBuffers {
    pub fn particle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, index: u32) -> Vector3<f32> {
        let i = index as usize * 3;
        Vector3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }
}

/// Output of a complete generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub buffers: TopologyBuffers,
    pub registry: ConstraintRegistry,
    pub bulb_rings: Vec<RingRecord>,
    pub tail_rings: Vec<RingRecord>,
}

/// Append-only builder owning every buffer during generation.
#[derive(Debug, Default)]
pub struct GenerationContext {
    buffers: TopologyBuffers,
    registry: ConstraintRegistry,
    bulb_rings: Vec<RingRecord>,
    tail_rings: Vec<RingRecord>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particle_count(&self) -> u32 {
        (self.buffers.positions.len() / 3) as u32
    }

    /// Appends one particle and returns its index.
    pub fn push_point(&mut self, position: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.particle_count();
        self.buffers.positions.extend_from_slice(&position);
        self.buffers.uvs.extend_from_slice(&uv);
        index
    }

    /// Appends a run of particles and their UVs, returning the first index.
    pub fn push_ring(&mut self, positions: &[f32], uvs: &[f32]) -> u32 {
        assert!(
            positions.len() % 3 == 0 && uvs.len() % 2 == 0,
            "ring buffers must hold whole points"
        );
        assert_eq!(
            positions.len() / 3,
            uvs.len() / 2,
            "ring has mismatched position and uv counts"
        );
        let start = self.particle_count();
        self.buffers.positions.extend_from_slice(positions);
        self.buffers.uvs.extend_from_slice(uvs);
        start
    }

    pub fn position(&self, index: u32) -> Vector3<f32> {
        assert!(
            index < self.particle_count(),
            "particle {index} has not been generated yet"
        );
        self.buffers.position(index)
    }

    pub fn distance(&self, a: u32, b: u32) -> f32 {
        (self.position(b) - self.position(a)).norm()
    }

    pub fn links_mut(&mut self) -> &mut Vec<u32> {
        &mut self.buffers.links
    }

    pub fn inner_links_mut(&mut self) -> &mut Vec<u32> {
        &mut self.buffers.inner_links
    }

    pub fn bulb_faces_mut(&mut self) -> &mut Vec<u32> {
        &mut self.buffers.bulb_faces
    }

    pub fn tail_faces_mut(&mut self) -> &mut Vec<u32> {
        &mut self.buffers.tail_faces
    }

    pub fn buffers(&self) -> &TopologyBuffers {
        &self.buffers
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ConstraintRegistry {
        &mut self.registry
    }

    pub fn queue(&mut self, constraint: impl Into<Constraint>) -> ConstraintHandle {
        self.registry.queue(constraint)
    }

    pub fn bulb_rings(&self) -> &[RingRecord] {
        &self.bulb_rings
    }

    pub fn tail_rings(&self) -> &[RingRecord] {
        &self.tail_rings
    }

    pub fn push_bulb_ring(&mut self, ring: RingRecord) {
        self.check_ring_range(&ring);
        self.bulb_rings.push(ring);
    }

    pub fn push_tail_ring(&mut self, ring: RingRecord) {
        self.check_ring_range(&ring);
        self.tail_rings.push(ring);
    }

    fn check_ring_range(&self, ring: &RingRecord) {
        assert!(
            ring.start + ring.count <= self.particle_count(),
            "ring [{}, +{}) extends past generated particles",
            ring.start,
            ring.count
        );
        let range = ring.indices();
        let overlaps = self
            .bulb_rings
            .iter()
            .chain(&self.tail_rings)
            .map(RingRecord::indices)
            .any(|other| range.start < other.end && other.start < range.end);
        assert!(
            !overlaps,
            "ring starting at {} overlaps an earlier ring",
            ring.start
        );
    }

    /// Freezes the buffers. Every index buffer and constraint must reference
    /// a generated particle.
    pub fn finish(self) -> Generated {
        let count = self.particle_count();
        let buffers = self.buffers;
        for (name, indices) in [
            ("links", &buffers.links),
            ("inner_links", &buffers.inner_links),
            ("bulb_faces", &buffers.bulb_faces),
            ("tail_faces", &buffers.tail_faces),
        ] {
            if let Some(bad) = indices.iter().find(|&&i| i >= count) {
                panic!("{name} references particle {bad} but only {count} exist");
            }
        }
        assert_eq!(buffers.links.len() % 2, 0, "links must hold index pairs");
        assert_eq!(buffers.inner_links.len() % 2, 0, "inner_links must hold index pairs");
        assert_eq!(buffers.bulb_faces.len() % 3, 0, "bulb_faces must hold triangles");
        assert_eq!(buffers.tail_faces.len() % 3, 0, "tail_faces must hold triangles");
        if let Some(max) = self.registry.max_index() {
            assert!(max < count, "constraint references particle {max} but only {count} exist");
        }

        Generated {
            buffers,
            registry: self.registry,
            bulb_rings: self.bulb_rings,
            tail_rings: self.tail_rings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationContext;
    use crate::constraint::{ConstraintHandle, DistanceConstraint};
    use crate::ring::{RingKind, RingRecord};
    use crate::topology::{fan_triangles, ring_points, ring_uvs};

    #[test]
    fn push_point_assigns_sequential_indices() {
        let mut ctx = GenerationContext::new();
        assert_eq!(ctx.push_point([0.0, 1.0, 0.0], [0.0, 0.0]), 0);
        assert_eq!(ctx.push_point([0.0, 4.0, 0.0], [0.0, 0.0]), 1);
        assert_eq!(ctx.distance(0, 1), 3.0);
    }

    #[test]
    fn faces_may_reference_rings_queued_later() {
        let mut ctx = GenerationContext::new();
        ctx.push_point([0.0; 3], [0.0; 2]);
        fan_triangles(0, 1, 6, ctx.bulb_faces_mut());

        let mut points = Vec::new();
        let mut uvs = Vec::new();
        ring_points(6, 1.0, 0.0, &mut points);
        ring_uvs(0.0, 6, &mut uvs);
        assert_eq!(ctx.push_ring(&points, &uvs), 1);

        let generated = ctx.finish();
        assert_eq!(generated.buffers.particle_count(), 7);
        assert_eq!(generated.buffers.bulb_faces.len(), 18);
    }

    #[test]
    #[should_panic(expected = "references particle")]
    fn finish_rejects_dangling_face_indices() {
        let mut ctx = GenerationContext::new();
        ctx.push_point([0.0; 3], [0.0; 2]);
        fan_triangles(0, 1, 6, ctx.bulb_faces_mut());
        ctx.finish();
    }

    #[test]
    #[should_panic(expected = "overlaps an earlier ring")]
    fn ring_records_may_not_share_particles() {
        let mut ctx = GenerationContext::new();
        let mut points = Vec::new();
        let mut uvs = Vec::new();
        ring_points(6, 1.0, 0.0, &mut points);
        ring_uvs(0.0, 6, &mut uvs);
        ctx.push_ring(&points, &uvs);
        ctx.push_ring(&points, &uvs);

        let ring = |start| RingRecord {
            kind: RingKind::Bulb,
            start,
            count: 6,
            param: 0.0,
            height: 0.0,
            radius: 1.0,
            outer_radius: None,
            outer: ConstraintHandle(0),
            inner: ConstraintHandle(1),
            spine: None,
        };
        ctx.push_bulb_ring(ring(0));
        ctx.push_tail_ring(ring(6));
        ctx.push_tail_ring(ring(3));
    }

    #[test]
    #[should_panic(expected = "constraint references particle")]
    fn finish_rejects_dangling_constraints() {
        let mut ctx = GenerationContext::new();
        ctx.push_point([0.0; 3], [0.0; 2]);
        ctx.queue(DistanceConstraint::new([0.0, 1.0], vec![0, 3]));
        ctx.finish();
    }
}
