//! Index and vertex primitives for ring-based topology.
//!
//! A ring is `count` consecutive particles starting at `start`, laid out
//! counter-clockwise when viewed from +Y. Every primitive appends to a caller
//! supplied buffer; callers are responsible for the indices referring to
//! particles that exist (or will exist) once generation finishes.

use std::f32::consts::PI;

/// Appends `segments` points evenly spaced on a horizontal circle at `height`,
/// starting at angle 0.
pub fn ring_points(segments: u32, radius: f32, height: f32, out: &mut Vec<f32>) {
    assert!(segments >= 3, "a ring needs at least 3 segments, got {segments}");
    let step = (PI * 2.0) / segments as f32;
    out.reserve(segments as usize * 3);
    for i in 0..segments {
        let angle = step * i as f32;
        out.extend_from_slice(&[angle.cos() * radius, height, angle.sin() * radius]);
    }
}

/// Edges between consecutive ring particles, closed with a last-to-first edge.
pub fn loop_edges(start: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count >= 3, "a loop needs at least 3 particles, got {count}");
    for i in 0..count - 1 {
        out.extend_from_slice(&[start + i, start + i + 1]);
    }
    out.extend_from_slice(&[start, start + count - 1]);
}

/// Vertical skin edges `(a + i, b + i)` between two rings of equal size.
pub fn ring_to_ring_edges(start_a: u32, start_b: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count > 0, "ring_to_ring_edges needs a positive count");
    debug_assert!(
        start_a + count <= start_b || start_b + count <= start_a,
        "rings [{start_a}, +{count}) and [{start_b}, +{count}) overlap"
    );
    for i in 0..count {
        out.extend_from_slice(&[start_a + i, start_b + i]);
    }
}

/// Spokes `(center, start + i)` from one particle to every particle of a ring.
pub fn radial_edges(center: u32, start: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count > 0, "radial_edges needs a positive count");
    debug_assert!(
        center < start || center >= start + count,
        "spoke center {center} lies inside the ring it connects to"
    );
    for i in 0..count {
        out.extend_from_slice(&[center, start + i]);
    }
}

/// Triangle fan capping a ring around `center`. Winding matches [`ring_faces`]:
/// an edge shared with the ring below is traversed in the opposite direction.
pub fn fan_triangles(center: u32, start: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count >= 3, "a fan needs at least 3 rim particles, got {count}");
    for i in 0..count - 1 {
        out.extend_from_slice(&[center, start + i + 1, start + i]);
    }
    out.extend_from_slice(&[center, start, start + count - 1]);
}

/// Two triangles per quad between ring A and ring B, wrapping at the seam.
/// Quad `i` is `a = A[i], b = A[i + 1], c = B[i + 1], d = B[i]` split as
/// `(a, b, c)` and `(c, d, a)`.
pub fn ring_faces(start_a: u32, start_b: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count >= 3, "ring faces need at least 3 segments, got {count}");
    let mut quad = |a: u32, b: u32, c: u32, d: u32| {
        out.extend_from_slice(&[a, b, c, c, d, a]);
    };
    for i in 0..count - 1 {
        quad(start_a + i, start_a + i + 1, start_b + i + 1, start_b + i);
    }
    quad(start_a + count - 1, start_a, start_b, start_b + count - 1);
}

/// One bracing triangle inside a ring: three particles a third of the ring
/// apart, starting at angular `offset`. Emits three edges.
pub fn inner_triangle_edges(offset: u32, start: u32, count: u32, out: &mut Vec<u32>) {
    assert!(count >= 3, "bracing needs at least 3 particles, got {count}");
    let step = count / 3;
    for i in 0..3 {
        out.extend_from_slice(&[
            start + (offset + step * i) % count,
            start + (offset + step * (i + 1)) % count,
        ]);
    }
}

/// Bracing triangles for every sub-segment group of a ring, offset by 3
/// particles per group.
pub fn inner_brace_edges(start: u32, count: u32, groups: u32, out: &mut Vec<u32>) {
    for group in 0..groups {
        inner_triangle_edges(group * 3, start, count, out);
    }
}

/// UVs for one ring. `u` mirrors around the seam so the texture is continuous,
/// `v` is constant for the ring.
pub fn ring_uvs(v: f32, count: u32, out: &mut Vec<f32>) {
    assert!(count > 0, "ring_uvs needs a positive count");
    for i in 1..count {
        let s = i as f32 / count as f32;
        let u = if s <= 0.5 { s } else { 1.0 - s };
        out.extend_from_slice(&[u * 2.0, v]);
    }
    out.extend_from_slice(&[0.0, v]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn pairs(buf: &[u32]) -> Vec<(u32, u32)> {
        buf.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    }

    fn triangles(buf: &[u32]) -> Vec<[u32; 3]> {
        buf.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect()
    }

    fn directed_edges(tris: &[[u32; 3]]) -> Vec<(u32, u32)> {
        tris.iter()
            .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .collect()
    }

    #[test]
    fn ring_points_lie_on_circle_at_height() {
        let mut out = Vec::new();
        ring_points(36, 4.5, 12.0, &mut out);
        assert_eq!(out.len(), 36 * 3);
        for p in out.chunks_exact(3) {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - 4.5).abs() < 1e-4);
            assert_eq!(p[1], 12.0);
        }
        assert!((out[0] - 4.5).abs() < 1e-6);
        assert_eq!(out[2], 0.0);
        // Counter-clockwise from +Y: the second point has positive z.
        assert!(out[5] > 0.0);
    }

    #[test]
    fn loop_edges_form_single_closed_cycle() {
        for count in 3..40u32 {
            let start = 17;
            let mut out = Vec::new();
            loop_edges(start, count, &mut out);
            let edges = pairs(&out);
            assert_eq!(edges.len(), count as usize);

            let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();
            for (a, b) in &edges {
                adjacency.entry(*a).or_default().push(*b);
                adjacency.entry(*b).or_default().push(*a);
            }
            assert_eq!(adjacency.len(), count as usize);
            assert!(adjacency.values().all(|n| n.len() == 2));

            let mut visited = HashSet::new();
            let mut previous = start;
            let mut current = start;
            loop {
                visited.insert(current);
                let next = adjacency[&current]
                    .iter()
                    .copied()
                    .find(|n| *n != previous && !visited.contains(n));
                match next {
                    Some(n) => {
                        previous = current;
                        current = n;
                    }
                    None => break,
                }
            }
            assert_eq!(visited.len(), count as usize);
            assert!((start..start + count).all(|i| visited.contains(&i)));
        }
    }

    #[test]
    fn ring_to_ring_edges_align_by_angle() {
        let mut out = Vec::new();
        ring_to_ring_edges(8, 44, 36, &mut out);
        let edges = pairs(&out);
        assert_eq!(edges.len(), 36);
        assert!(edges.iter().all(|(a, b)| b - a == 36));
    }

    #[test]
    fn radial_edges_share_center() {
        let mut out = Vec::new();
        radial_edges(5, 8, 12, &mut out);
        let edges = pairs(&out);
        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(|(c, _)| *c == 5));
        let rim: Vec<u32> = edges.iter().map(|(_, r)| *r).collect();
        assert_eq!(rim, (8..20).collect::<Vec<_>>());
    }

    #[test]
    fn ring_faces_cover_both_rings() {
        for count in 3..20u32 {
            let mut out = Vec::new();
            ring_faces(100, 200, count, &mut out);
            let tris = triangles(&out);
            assert_eq!(tris.len(), 2 * count as usize);

            let used: HashSet<u32> = out.iter().copied().collect();
            let expected: HashSet<u32> = (100..100 + count).chain(200..200 + count).collect();
            assert_eq!(used, expected);
        }
    }

    #[test]
    fn ring_faces_are_consistently_wound() {
        let mut out = Vec::new();
        ring_faces(0, 10, 10, &mut out);
        let edges = directed_edges(&triangles(&out));
        let unique: HashSet<(u32, u32)> = edges.iter().copied().collect();
        // A consistently oriented surface never repeats a directed edge.
        assert_eq!(unique.len(), edges.len());
    }

    #[test]
    fn fan_and_ring_faces_share_rim_edges_in_opposite_directions() {
        let count = 12;
        let mut fan = Vec::new();
        fan_triangles(0, 1, count, &mut fan);
        let mut tube = Vec::new();
        ring_faces(1, 1 + count, count, &mut tube);

        let fan_edges: HashSet<(u32, u32)> =
            directed_edges(&triangles(&fan)).into_iter().collect();
        let tube_edges: HashSet<(u32, u32)> =
            directed_edges(&triangles(&tube)).into_iter().collect();

        let mut shared = 0;
        for (a, b) in &fan_edges {
            assert!(!tube_edges.contains(&(*a, *b)), "edge {a}->{b} repeated");
            if tube_edges.contains(&(*b, *a)) {
                shared += 1;
            }
        }
        assert_eq!(shared, count as usize);
    }

    #[test]
    fn fan_triangles_close_the_disc() {
        let mut out = Vec::new();
        fan_triangles(5, 8, 36, &mut out);
        let tris = triangles(&out);
        assert_eq!(tris.len(), 36);
        assert!(tris.iter().all(|t| t[0] == 5));
        assert_eq!(tris[35], [5, 8, 43]);
    }

    #[test]
    fn inner_triangle_edges_span_thirds() {
        let mut out = Vec::new();
        inner_triangle_edges(3, 8, 36, &mut out);
        assert_eq!(pairs(&out), vec![(11, 23), (23, 35), (35, 11)]);
    }

    #[test]
    fn inner_brace_edges_emit_three_edges_per_group() {
        let mut out = Vec::new();
        inner_brace_edges(8, 36, 4, &mut out);
        let edges = pairs(&out);
        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(|(a, b)| (8..44).contains(a) && (8..44).contains(b)));
    }

    #[test]
    fn ring_uvs_mirror_around_seam() {
        let mut out = Vec::new();
        ring_uvs(0.25, 4, &mut out);
        assert_eq!(out, vec![0.5, 0.25, 1.0, 0.25, 0.5, 0.25, 0.0, 0.25]);
    }

    #[test]
    #[should_panic(expected = "at least 3")]
    fn loop_edges_rejects_degenerate_ring() {
        loop_edges(0, 2, &mut Vec::new());
    }
}
