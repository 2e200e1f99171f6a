//! Pins and floating spine particles on the vertical axis.
//!
//! Indices 0..=4 are pins held at absolute positions with zero weight;
//! indices 5..=7 float along the top-mid axis and anchor the radial spokes of
//! the first bulb ring, last bulb ring and last tail ring.

use tracing::debug;

use crate::builder::GenerationContext;
use crate::constraint::{AxisConstraint, DistanceConstraint, PointConstraint};
use crate::settings::JellyfishSettings;
use crate::topology::fan_triangles;

pub const PIN_TOP: u32 = 0;
pub const PIN_MID: u32 = 1;
pub const PIN_BOTTOM: u32 = 2;
pub const PIN_TAIL: u32 = 3;
pub const PIN_TENTACLE: u32 = 4;
pub const FLOATER_TOP: u32 = 5;
pub const FLOATER_MID: u32 = 6;
pub const FLOATER_BOTTOM: u32 = 7;
/// First index of the first bulb ring.
pub const RING_START: u32 = 8;

pub const PINS: [u32; 5] = [PIN_TOP, PIN_MID, PIN_BOTTOM, PIN_TAIL, PIN_TENTACLE];

/// Places the eight spine particles, queues their constraints and the cap fan
/// over the first bulb ring (which is generated next, starting at [`RING_START`]).
pub fn build_spine(ctx: &mut GenerationContext, settings: &JellyfishSettings) {
    assert_eq!(ctx.particle_count(), 0, "the spine must be generated first");

    let size = settings.size;
    let pins = settings.pin_heights();
    let floaters = settings.floater_heights();
    let heights = [
        pins.top,
        pins.mid,
        pins.bottom,
        pins.tail,
        pins.tentacle,
        floaters.top,
        floaters.mid,
        floaters.bottom,
    ];
    for y in heights {
        ctx.push_point([0.0, y, 0.0], [0.0, 0.0]);
    }
    debug_assert_eq!(ctx.particle_count(), RING_START);

    ctx.queue(DistanceConstraint::new(
        [0.0, size * 0.5],
        vec![PIN_TOP, FLOATER_TOP],
    ));
    ctx.queue(DistanceConstraint::new(
        [size * 0.5, size * 0.7],
        vec![FLOATER_TOP, FLOATER_MID],
    ));
    ctx.queue(DistanceConstraint::new(
        [0.0, size * 0.5],
        vec![PIN_BOTTOM, FLOATER_BOTTOM],
    ));
    ctx.queue(DistanceConstraint::new(
        [size, size * 2.0],
        vec![FLOATER_TOP, FLOATER_BOTTOM],
    ));
    ctx.queue(AxisConstraint::new(
        PIN_TOP,
        PIN_MID,
        vec![FLOATER_TOP, FLOATER_MID, FLOATER_BOTTOM],
    ));

    let registry = ctx.registry_mut();
    for (index, y) in PINS.iter().zip(heights) {
        registry.set_weight(*index, 0.0);
        registry.pin(PointConstraint::new(*index, [0.0, y, 0.0]));
    }

    fan_triangles(
        FLOATER_TOP,
        RING_START,
        settings.segments(),
        ctx.bulb_faces_mut(),
    );

    debug!(
        particles = ctx.particle_count(),
        constraints = ctx.registry().len(),
        "spine generated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;

    #[test]
    fn spine_places_pins_and_floaters_on_axis() {
        let settings = JellyfishSettings::default();
        let mut ctx = GenerationContext::new();
        build_spine(&mut ctx, &settings);

        assert_eq!(ctx.particle_count(), RING_START);
        let expected = [60.0, 20.0, -20.0, -80.0, -250.0, 60.0, -20.0, -40.0];
        for (index, y) in expected.iter().enumerate() {
            let p = ctx.position(index as u32);
            assert_eq!((p.x, p.y, p.z), (0.0, *y, 0.0));
        }
    }

    #[test]
    fn spine_queues_four_distances_and_an_axis() {
        let settings = JellyfishSettings::default();
        let mut ctx = GenerationContext::new();
        build_spine(&mut ctx, &settings);

        let registry = ctx.registry();
        let constraints = registry.constraints();
        assert_eq!(constraints.len(), 5);
        let [min, max] = constraints[1]
            .as_distance()
            .map(|c| c.range())
            .expect("distance constraint");
        assert!((min - 20.0).abs() < 1e-5 && (max - 28.0).abs() < 1e-5);
        match &constraints[4] {
            Constraint::Axis(axis) => {
                assert_eq!((axis.start, axis.end), (PIN_TOP, PIN_MID));
                assert_eq!(axis.indices, vec![FLOATER_TOP, FLOATER_MID, FLOATER_BOTTOM]);
            }
            other => panic!("expected axis constraint, got {other:?}"),
        }
        assert_eq!(registry.pins().len(), 5);
        assert!(registry.weights().iter().all(|(_, w)| *w == 0.0));
    }

    #[test]
    fn spine_queues_cap_fan_for_first_ring() {
        let settings = JellyfishSettings::default();
        let mut ctx = GenerationContext::new();
        build_spine(&mut ctx, &settings);

        let faces = &ctx.buffers().bulb_faces;
        assert_eq!(faces.len(), 36 * 3);
        assert_eq!(&faces[..3], &[FLOATER_TOP, RING_START + 1, RING_START]);
    }
}
