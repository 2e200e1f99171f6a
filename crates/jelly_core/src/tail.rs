//! The sub-umbrella: a funnel of loose rings hanging from the last bell ring.
//!
//! The first tail ring has the same radius as the last bell ring and is
//! skinned to it directly, so the two surfaces share a seam.

use tracing::debug;

use crate::builder::GenerationContext;
use crate::constraint::DistanceConstraint;
use crate::curves::tail_radius;
use crate::ring::{inner_range, outer_range, RingKind, RingRecord, SpineLink};
use crate::settings::JellyfishSettings;
use crate::spine::FLOATER_MID;
use crate::topology::{
    inner_brace_edges, loop_edges, radial_edges, ring_faces, ring_points, ring_to_ring_edges,
    ring_uvs,
};

pub fn build_tail(ctx: &mut GenerationContext, settings: &JellyfishSettings) {
    assert!(
        !ctx.bulb_rings().is_empty(),
        "the tail continues from the bulb, which must be generated first"
    );
    assert!(ctx.tail_rings().is_empty(), "tail already generated");

    for index in 0..settings.tail_ring_count {
        build_ring(ctx, settings, index);
        build_skin(ctx, index as usize);
    }

    let rings = ctx.tail_rings();
    debug!(
        rings = rings.len(),
        first = rings.first().map_or(0, |r| r.start),
        end = rings.last().map_or(0, |r| r.start + r.count),
        "tail generated"
    );
}

fn build_ring(ctx: &mut GenerationContext, settings: &JellyfishSettings, index: u32) {
    let segments = settings.segments();
    let total = settings.tail_ring_count;
    let rim = *ctx
        .bulb_rings()
        .last()
        .expect("bulb rings checked by build_tail");

    let t = index as f32 / total as f32;
    let height = rim.height - t * settings.size * 0.8;
    let radius = tail_radius(t) * rim.radius;
    let outer_radius = radius + t * settings.tail_radius_factor;

    let mut points = Vec::with_capacity(segments as usize * 3);
    let mut uvs = Vec::with_capacity(segments as usize * 2);
    ring_points(segments, radius, height, &mut points);
    ring_uvs(t, segments, &mut uvs);
    let start = ctx.push_ring(&points, &uvs);

    let spine = if index == total - 1 {
        let mut spokes = Vec::with_capacity(segments as usize * 2);
        radial_edges(FLOATER_MID, start, segments, &mut spokes);
        ctx.inner_links_mut().extend_from_slice(&spokes);
        let (min_factor, max_factor) = (0.8, 1.0);
        let handle = ctx.queue(DistanceConstraint::new(
            [radius * min_factor, radius * max_factor],
            spokes,
        ));
        Some(SpineLink {
            handle,
            center: FLOATER_MID,
            min_factor,
            max_factor,
        })
    } else {
        None
    };

    let mut outer_edges = Vec::with_capacity(segments as usize * 2);
    loop_edges(start, segments, &mut outer_edges);
    ctx.inner_links_mut().extend_from_slice(&outer_edges);
    let outer = ctx.queue(DistanceConstraint::new(
        outer_range(RingKind::Tail, outer_radius, segments),
        outer_edges,
    ));

    let mut inner_edges = Vec::new();
    inner_brace_edges(start, segments, settings.segment_groups, &mut inner_edges);
    ctx.inner_links_mut().extend_from_slice(&inner_edges);
    let inner = ctx.queue(DistanceConstraint::new(inner_range(radius), inner_edges));

    ctx.push_tail_ring(RingRecord {
        kind: RingKind::Tail,
        start,
        count: segments,
        // Inverted so the pulse is strongest next to the bell.
        param: 1.0 - t,
        height,
        radius,
        outer_radius: Some(outer_radius),
        outer,
        inner,
        spine,
    });
}

/// Skins tail ring `index` to the ring above it; ring 0 joins the last bell ring.
fn build_skin(ctx: &mut GenerationContext, index: usize) {
    let upper = match index.checked_sub(1) {
        Some(previous) => ctx.tail_rings()[previous],
        None => *ctx
            .bulb_rings()
            .last()
            .expect("bulb rings checked by build_tail"),
    };
    let lower = ctx.tail_rings()[index];
    assert_eq!(upper.count, lower.count, "skinned rings must match in size");
    let rest = ctx.distance(upper.start, lower.start);

    let mut edges = Vec::with_capacity(lower.count as usize * 2);
    ring_to_ring_edges(upper.start, lower.start, lower.count, &mut edges);
    ctx.inner_links_mut().extend_from_slice(&edges);
    ctx.queue(DistanceConstraint::new([rest * 0.5, rest], edges));
    ring_faces(upper.start, lower.start, lower.count, ctx.tail_faces_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulb::build_bulb;
    use crate::spine::build_spine;

    fn full_context(settings: &JellyfishSettings) -> (GenerationContext, usize, usize) {
        let mut ctx = GenerationContext::new();
        build_spine(&mut ctx, settings);
        build_bulb(&mut ctx, settings);
        let links = ctx.buffers().links.len();
        let constraints = ctx.registry().len();
        build_tail(&mut ctx, settings);
        (ctx, links, constraints)
    }

    #[test]
    fn rings_narrow_and_flare_below_the_rim() {
        let settings = JellyfishSettings::default();
        let (ctx, _, _) = full_context(&settings);
        let rim = *ctx.bulb_rings().last().expect("bulb rings");
        let rings = ctx.tail_rings();
        assert_eq!(rings.len(), 15);

        for (i, ring) in rings.iter().enumerate() {
            let t = i as f32 / 15.0;
            assert_eq!(ring.kind, RingKind::Tail);
            assert!((ring.height - (rim.height - t * 32.0)).abs() < 1e-4);
            assert!((ring.radius - tail_radius(t) * rim.radius).abs() < 1e-4);
            let outer = ring.outer_radius.expect("tail rings carry an outer radius");
            assert!((outer - (ring.radius + t * 20.0)).abs() < 1e-4);
            assert!((ring.param - (1.0 - t)).abs() < 1e-6);
        }
    }

    #[test]
    fn last_ring_anchors_to_mid_floater() {
        let settings = JellyfishSettings::default();
        let (ctx, _, _) = full_context(&settings);
        let rings = ctx.tail_rings();
        let spine = rings[14].spine.expect("last tail ring spokes");
        assert_eq!(spine.center, FLOATER_MID);
        assert_eq!((spine.min_factor, spine.max_factor), (0.8, 1.0));
        assert!(rings[..14].iter().all(|r| r.spine.is_none()));
    }

    #[test]
    fn tail_edges_stay_out_of_the_hood() {
        let settings = JellyfishSettings::default();
        let (ctx, links_before, _) = full_context(&settings);
        assert_eq!(ctx.buffers().links.len(), links_before);
        let first = ctx.tail_rings()[0].start;
        assert!(ctx
            .buffers()
            .inner_links
            .chunks_exact(2)
            .any(|p| p == [first, first + 1]));
    }

    #[test]
    fn seam_skin_has_zero_rest_length() {
        let settings = JellyfishSettings::default();
        let (ctx, _, before) = full_context(&settings);
        let rim = *ctx.bulb_rings().last().expect("bulb rings");
        let first = ctx.tail_rings()[0];
        // Ring 0 queues outer, inner, then the seam skin.
        let seam = ctx.registry().constraints()[before + 2]
            .as_distance()
            .expect("distance constraint");
        assert_eq!(seam.indices()[..2], [rim.start, first.start]);
        assert_eq!(seam.range(), [0.0, 0.0]);
        assert_eq!(ctx.buffers().tail_faces.len(), 15 * 36 * 6);
    }

    #[test]
    #[should_panic(expected = "the tail continues from the bulb")]
    fn tail_requires_a_bulb() {
        let settings = JellyfishSettings::default();
        let mut ctx = GenerationContext::new();
        build_spine(&mut ctx, &settings);
        build_tail(&mut ctx, &settings);
    }
}
