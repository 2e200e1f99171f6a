//! The bell: stacked rings from the apex down, joined by skins.

use tracing::debug;

use crate::builder::GenerationContext;
use crate::constraint::DistanceConstraint;
use crate::curves::bell_radius;
use crate::ring::{inner_range, outer_range, RingKind, RingRecord, SpineLink};
use crate::settings::JellyfishSettings;
use crate::spine::{FLOATER_BOTTOM, FLOATER_TOP, RING_START};
use crate::topology::{
    inner_brace_edges, loop_edges, radial_edges, ring_faces, ring_points, ring_to_ring_edges,
    ring_uvs,
};

pub fn build_bulb(ctx: &mut GenerationContext, settings: &JellyfishSettings) {
    assert!(ctx.bulb_rings().is_empty(), "bulb already generated");
    for index in 0..settings.ring_count {
        build_ring(ctx, settings, index);
        if index > 0 {
            build_skin(ctx, index as usize - 1, index as usize);
        }
    }

    let rings = ctx.bulb_rings();
    debug!(
        rings = rings.len(),
        first = rings.first().map_or(0, |r| r.start),
        end = rings.last().map_or(0, |r| r.start + r.count),
        "bulb generated"
    );
}

fn build_ring(ctx: &mut GenerationContext, settings: &JellyfishSettings, index: u32) {
    let segments = settings.segments();
    let total = settings.ring_count;
    let t = index as f32 / total as f32;
    let height = settings.size + settings.y_offset - t * settings.size;
    let radius = bell_radius(t) * settings.ring_radius;

    let mut points = Vec::with_capacity(segments as usize * 3);
    let mut uvs = Vec::with_capacity(segments as usize * 2);
    ring_points(segments, radius, height, &mut points);
    ring_uvs(t, segments, &mut uvs);
    let start = ctx.push_ring(&points, &uvs);
    assert_eq!(
        start,
        RING_START + index * segments,
        "bulb ring {index} does not start where the spine cap expects"
    );

    let is_top = index == 0;
    let is_bottom = index == total - 1;
    let spine = if is_top || is_bottom {
        let (center, max_factor) = if is_top {
            (FLOATER_TOP, 1.25)
        } else {
            (FLOATER_BOTTOM, 1.0)
        };
        let mut spokes = Vec::with_capacity(segments as usize * 2);
        radial_edges(center, start, segments, &mut spokes);
        if is_top {
            ctx.links_mut().extend_from_slice(&spokes);
        } else {
            ctx.inner_links_mut().extend_from_slice(&spokes);
        }
        let min_factor = 0.5;
        let handle = ctx.queue(DistanceConstraint::new(
            [radius * min_factor, radius * max_factor],
            spokes,
        ));
        let link = SpineLink {
            handle,
            center,
            min_factor,
            max_factor,
        };
        Some(link)
    } else {
        None
    };

    let mut outer_edges = Vec::with_capacity(segments as usize * 2);
    loop_edges(start, segments, &mut outer_edges);
    ctx.links_mut().extend_from_slice(&outer_edges);
    let outer = ctx.queue(DistanceConstraint::new(
        outer_range(RingKind::Bulb, radius, segments),
        outer_edges,
    ));

    let mut inner_edges = Vec::new();
    inner_brace_edges(start, segments, settings.segment_groups, &mut inner_edges);
    ctx.inner_links_mut().extend_from_slice(&inner_edges);
    let inner = ctx.queue(DistanceConstraint::new(
        inner_range(radius),
        inner_edges,
    ));

    ctx.push_bulb_ring(RingRecord {
        kind: RingKind::Bulb,
        start,
        count: segments,
        param: t,
        height,
        radius,
        outer_radius: None,
        outer,
        inner,
        spine,
    });
}

fn build_skin(ctx: &mut GenerationContext, upper: usize, lower: usize) {
    let a = ctx.bulb_rings()[upper];
    let b = ctx.bulb_rings()[lower];
    let rest = ctx.distance(a.start, b.start);

    let mut edges = Vec::with_capacity(a.count as usize * 2);
    ring_to_ring_edges(a.start, b.start, a.count, &mut edges);
    ctx.links_mut().extend_from_slice(&edges);
    ctx.queue(DistanceConstraint::new([rest * 0.5, rest], edges));
    ring_faces(a.start, b.start, a.count, ctx.bulb_faces_mut());
}
