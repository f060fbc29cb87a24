use super::{
    broad::{TriangleIndex, candidate_box},
    narrow_phase::{closest_points_segment_triangle, triangle_normal},
    settings::DIST_EPS,
    types::{ResolveReport, Segment, SegmentTriangleClosest, Triangle, Vec3},
};

/// Push a capsule spine out of every triangle it penetrates.
///
/// - `segment` is in the index's local space and is corrected in place.
/// - The candidate box is taken once from the incoming segment; corrections
///   made during the pass do not widen it.
/// - Triangles are handled in traversal order and each push is applied
///   immediately, so later triangles see the already corrected segment.
///   Deeply interlocked contacts may keep a residual overlap that the next
///   substep works off.
pub fn resolve_capsule(index: &TriangleIndex, segment: &mut Segment, radius: f32) -> ResolveReport {
    let query = candidate_box(segment, radius);
    let mut report = ResolveReport::default();

    index.shapecast(&query, |idx, tri| {
        report.visited += 1;

        let hit = closest_points_segment_triangle(segment, tri);
        if hit.distance >= radius {
            return;
        }

        let push = push_out(segment, tri, &hit, radius);
        if push == Vec3::zeros() {
            return;
        }

        log::trace!(
            "triangle {idx}: distance {:.5} < radius {radius}, push {:?}",
            hit.distance,
            push
        );
        segment.a += push;
        segment.b += push;
        report.contacts += 1;
    });

    report
}

/// Translation that moves `segment` to `radius` away from `tri`.
///
/// Normally this is `radius - distance` along the line from the triangle to
/// the segment. When the two closest points coincide (the segment touches or
/// crosses the surface) that line is undefined, and the push follows the
/// triangle normal instead, towards the side holding most of the segment.
pub fn push_out(segment: &Segment, tri: &Triangle, hit: &SegmentTriangleClosest, radius: f32) -> Vec3 {
    let depth = radius - hit.distance;
    let away = hit.on_segment - hit.on_triangle;

    if let Some(dir) = away.try_normalize(DIST_EPS) {
        return dir * depth;
    }

    let Some(n) = triangle_normal(tri) else {
        return Vec3::zeros();
    };

    let da = n.dot(&(segment.a - tri.a));
    let db = n.dot(&(segment.b - tri.a));

    // Side with the larger share of the segment; ties go to the front face.
    let side = if da + db >= 0.0 { 1.0 } else { -1.0 };
    let deepest = (side * da).min(side * db);

    n * side * (radius - deepest)
}
