use super::{
    settings::{DEGENERATE_SEGMENT_SQ, DEGENERATE_TRIANGLE_SIN_SQ},
    types::{Point, Segment, SegmentTriangleClosest, Triangle, Vec3},
};

/// Closest points between a segment (capsule spine) and a triangle.
///
/// The minimum is found among:
/// - the point where the segment pierces the triangle, if it does (distance 0),
/// - each segment endpoint against the triangle face,
/// - the segment against each of the three triangle edges.
///
/// Zero-length segments and zero-area triangles are valid input: a triangle
/// without area is handled through its edges only, and the segment-segment
/// test tolerates point-like segments, so the result is always finite for
/// finite input.
pub fn closest_points_segment_triangle(
    segment: &Segment,
    tri: &Triangle,
) -> SegmentTriangleClosest {
    let normal = scaled_normal(tri);
    let has_area = !is_degenerate(tri, &normal);

    if has_area {
        if let Some(p) = segment_crossing(segment, tri, &normal) {
            return SegmentTriangleClosest {
                distance: 0.0,
                on_triangle: p,
                on_segment: p,
            };
        }
    }

    let mut best = Closest::new(tri.a, segment.a);

    if has_area {
        for endpoint in [segment.a, segment.b] {
            best.offer(closest_point_on_triangle(tri, endpoint), endpoint);
        }
    }

    for (p0, p1) in [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)] {
        let (on_edge, on_segment) = closest_points_segments(p0, p1, segment.a, segment.b);
        best.offer(on_edge, on_segment);
    }

    best.finish()
}

/// Unit normal following the `a -> b -> c` winding, or `None` for a triangle
/// without area.
pub fn triangle_normal(tri: &Triangle) -> Option<Vec3> {
    let n = scaled_normal(tri);
    if is_degenerate(tri, &n) {
        return None;
    }
    Some(n / n.norm())
}

/// Find the closest point on a triangle to a given point.
///
/// Walks the vertex, edge and face Voronoi regions using barycentric
/// coordinates. Requires a triangle with area; callers check that first.
pub fn closest_point_on_triangle(tri: &Triangle, p: Point) -> Point {
    let (a, b, c) = (tri.a, tri.b, tri.c);

    // Vertex region outside A.
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    // Vertex region outside B.
    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    // Edge region AB.
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    // Vertex region outside C.
    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    // Edge region AC.
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    // Edge region BC.
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Inside the face.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Closest points between segments `p1..q1` and `p2..q2`.
///
/// Returns `(on_first, on_second)`. Either segment may be a single point.
pub fn closest_points_segments(p1: Point, q1: Point, p2: Point, q2: Point) -> (Point, Point) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a <= DEGENERATE_SEGMENT_SQ && e <= DEGENERATE_SEGMENT_SQ {
        (0.0, 0.0)
    } else if a <= DEGENERATE_SEGMENT_SQ {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= DEGENERATE_SEGMENT_SQ {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments: any s works, pick the start and let t fix it up.
            let mut s = if denom > 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

#[inline]
fn scaled_normal(tri: &Triangle) -> Vec3 {
    (tri.b - tri.a).cross(&(tri.c - tri.a))
}

#[inline]
fn is_degenerate(tri: &Triangle, scaled_normal: &Vec3) -> bool {
    let scale = (tri.b - tri.a).norm_squared() * (tri.c - tri.a).norm_squared();
    scaled_normal.norm_squared() <= DEGENERATE_TRIANGLE_SIN_SQ * scale
}

/// Point where the segment passes through the triangle, if any.
///
/// A segment lying in the triangle's plane is left to the endpoint and edge
/// tests, which already report zero distance for it.
fn segment_crossing(segment: &Segment, tri: &Triangle, normal: &Vec3) -> Option<Point> {
    let da = normal.dot(&(segment.a - tri.a));
    let db = normal.dot(&(segment.b - tri.a));

    if (da > 0.0 && db > 0.0) || (da < 0.0 && db < 0.0) {
        return None;
    }

    let denom = da - db;
    if denom == 0.0 {
        return None;
    }

    let t = (da / denom).clamp(0.0, 1.0);
    let p = segment.a + (segment.b - segment.a) * t;
    contains_coplanar_point(tri, normal, &p).then_some(p)
}

/// Inside test for a point already on the triangle's plane.
fn contains_coplanar_point(tri: &Triangle, normal: &Vec3, p: &Point) -> bool {
    let c0 = (tri.b - tri.a).cross(&(p - tri.a)).dot(normal);
    let c1 = (tri.c - tri.b).cross(&(p - tri.b)).dot(normal);
    let c2 = (tri.a - tri.c).cross(&(p - tri.c)).dot(normal);
    c0 >= 0.0 && c1 >= 0.0 && c2 >= 0.0
}

/// Running minimum over candidate point pairs.
struct Closest {
    distance_sq: f32,
    on_triangle: Point,
    on_segment: Point,
}

impl Closest {
    fn new(on_triangle: Point, on_segment: Point) -> Self {
        Self {
            distance_sq: f32::INFINITY,
            on_triangle,
            on_segment,
        }
    }

    #[inline]
    fn offer(&mut self, on_triangle: Point, on_segment: Point) {
        let d = (on_segment - on_triangle).norm_squared();
        if d < self.distance_sq {
            self.distance_sq = d;
            self.on_triangle = on_triangle;
            self.on_segment = on_segment;
        }
    }

    fn finish(self) -> SegmentTriangleClosest {
        SegmentTriangleClosest {
            distance: self.distance_sq.sqrt(),
            on_triangle: self.on_triangle,
            on_segment: self.on_segment,
        }
    }
}
