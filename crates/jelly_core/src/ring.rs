//! Per-ring metadata kept after generation so constraint ranges can be retargeted.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::Range;

use crate::constraint::ConstraintHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingKind {
    Bulb,
    Tail,
}

impl RingKind {
    /// Upper slack of the outer loop relative to its rest length.
    /// The tail loop may stretch so it folds instead of staying rigid.
    pub fn outer_slack(self) -> f32 {
        match self {
            RingKind::Bulb => 1.0,
            RingKind::Tail => 1.5,
        }
    }
}

/// Radial spokes from a ring to a spine floater, with the range expressed as
/// multiples of the ring radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpineLink {
    pub handle: ConstraintHandle,
    pub center: u32,
    pub min_factor: f32,
    pub max_factor: f32,
}

impl SpineLink {
    pub fn range(&self, radius: f32) -> [f32; 2] {
        [radius * self.min_factor, radius * self.max_factor]
    }
}

/// `[0.9 L, slack * L]` with `L` the rest length of one loop edge.
pub fn outer_range(kind: RingKind, radius: f32, segments: u32) -> [f32; 2] {
    let edge = (2.0 * PI * radius) / segments as f32;
    [edge * 0.9, edge * kind.outer_slack()]
}

/// `[0.8 Li, Li]` with `Li` a third of the ring circumference.
pub fn inner_range(radius: f32) -> [f32; 2] {
    let edge = (2.0 * PI * radius) / 3.0;
    [edge * 0.8, edge]
}

/// Constraint ranges for a ring at a given radius boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingTargets {
    pub outer: [f32; 2],
    pub inner: [f32; 2],
    pub spine: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRecord {
    pub kind: RingKind,
    pub start: u32,
    pub count: u32,
    /// Amplitude parameter for the pulse. Bulb rings store `t`, tail rings `1 - t`.
    pub param: f32,
    pub height: f32,
    /// Structural radius.
    pub radius: f32,
    /// Looser target radius for the outer loop (tail rings only).
    pub outer_radius: Option<f32>,
    pub outer: ConstraintHandle,
    pub inner: ConstraintHandle,
    pub spine: Option<SpineLink>,
}

impl RingRecord {
    pub fn indices(&self) -> Range<u32> {
        self.start..self.start + self.count
    }

    /// Ranges with `boost` added to every radius. A zero boost gives the
    /// ranges used at construction.
    pub fn targets(&self, boost: f32) -> RingTargets {
        let radius = self.radius + boost;
        let outer_radius = self.outer_radius.unwrap_or(self.radius) + boost;
        RingTargets {
            outer: outer_range(self.kind, outer_radius, self.count),
            inner: inner_range(radius),
            spine: self.spine.map(|link| link.range(radius)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RingKind, outer_radius: Option<f32>, spine: Option<SpineLink>) -> RingRecord {
        RingRecord {
            kind,
            start: 8,
            count: 36,
            param: 0.5,
            height: 40.0,
            radius: 10.0,
            outer_radius,
            outer: ConstraintHandle(0),
            inner: ConstraintHandle(1),
            spine,
        }
    }

    #[test]
    fn bulb_outer_range_is_nearly_rigid() {
        let [min, max] = outer_range(RingKind::Bulb, 10.0, 36);
        let edge = 2.0 * PI * 10.0 / 36.0;
        assert!((max - edge).abs() < 1e-5);
        assert!((min - 0.9 * edge).abs() < 1e-5);
    }

    #[test]
    fn tail_outer_range_allows_stretch() {
        let [min, max] = outer_range(RingKind::Tail, 10.0, 36);
        assert!((max / min - 1.5 / 0.9).abs() < 1e-5);
    }

    #[test]
    fn targets_without_boost_reproduce_construction_ranges() {
        let spine = SpineLink {
            handle: ConstraintHandle(2),
            center: 5,
            min_factor: 0.5,
            max_factor: 1.25,
        };
        let ring = record(RingKind::Bulb, None, Some(spine));
        let targets = ring.targets(0.0);
        assert_eq!(targets.outer, outer_range(RingKind::Bulb, 10.0, 36));
        assert_eq!(targets.inner, inner_range(10.0));
        assert_eq!(targets.spine, Some([5.0, 12.5]));
    }

    #[test]
    fn tail_targets_use_outer_radius_for_loop_only() {
        let ring = record(RingKind::Tail, Some(14.0), None);
        let targets = ring.targets(2.0);
        assert_eq!(targets.outer, outer_range(RingKind::Tail, 16.0, 36));
        assert_eq!(targets.inner, inner_range(12.0));
        assert_eq!(targets.spine, None);
    }

    #[test]
    fn indices_cover_the_ring() {
        let ring = record(RingKind::Bulb, None, None);
        assert_eq!(ring.indices(), 8..44);
    }
}
