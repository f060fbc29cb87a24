use nalgebra as na;
use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
};

use super::types::{Point, Segment, Triangle};

/// Acceleration structure for broad-phase queries over immutable triangle geometry.
///
/// Notes:
/// - One BVH leaf per triangle; leaf `i` bounds `triangles[i]`.
/// - Triangles are stored in collider-local space. Callers transform queries
///   into that space before asking for candidates.
pub struct TriangleIndex {
    /// BVH over per-triangle AABBs, `None` when there are no triangles.
    bvh: Option<Bvh>,
    /// Triangles in leaf order.
    triangles: Vec<Triangle>,
    /// Union of every leaf box, `None` when there are no triangles.
    bounds: Option<Aabb>,
}

impl TriangleIndex {
    /// Build the BVH over `triangles`.
    pub fn build(triangles: Vec<Triangle>) -> Self {
        let aabbs: Vec<Aabb> = triangles.iter().map(triangle_aabb).collect();
        let bounds = aabbs.iter().copied().reduce(|acc, b| aabb_union(&acc, &b));

        Self {
            bvh: (!aabbs.is_empty()).then(|| Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs)),
            triangles,
            bounds,
        }
    }

    /// Return true if this index holds no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles in this index.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Collider-local box enclosing every triangle.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Indices of the triangles whose leaf box intersects `query`.
    ///
    /// Internal nodes whose box misses `query` are skipped along with their
    /// whole subtree. Order is whatever the traversal yields.
    pub fn query_candidates<'a>(&'a self, query: &'a Aabb) -> impl Iterator<Item = usize> + 'a {
        self.bvh
            .iter()
            .flat_map(move |bvh| bvh.intersect_aabb(query).map(|leaf| leaf as usize))
    }

    /// Visit every triangle that passes the `query` box test.
    ///
    /// The box test is only a necessary condition; `visit` is expected to run
    /// an exact test on the triangle it receives.
    pub fn shapecast<F>(&self, query: &Aabb, mut visit: F)
    where
        F: FnMut(usize, &Triangle),
    {
        for idx in self.query_candidates(query) {
            visit(idx, &self.triangles[idx]);
        }
    }
}

/// Box around a capsule spine: both endpoints, inflated by `radius` on every axis.
///
/// Every triangle that comes within `radius` of the segment overlaps this box.
pub fn candidate_box(segment: &Segment, radius: f32) -> Aabb {
    let spine = Aabb::new(segment.a.inf(&segment.b), segment.a.sup(&segment.b));
    aabb_inflate(&spine, radius)
}

/// Tight world-axis box around a triangle.
pub fn triangle_aabb(tri: &Triangle) -> Aabb {
    let mins: Point = tri.a.inf(&tri.b).inf(&tri.c);
    let maxs: Point = tri.a.sup(&tri.b).sup(&tri.c);
    Aabb::new(mins, maxs)
}

/// Compute the union of two AABBs.
pub fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb::new(a.mins.inf(&b.mins), a.maxs.sup(&b.maxs))
}

/// Grow an AABB by `margin` on all sides.
///
/// A negative margin shrinks it and may leave `mins > maxs`; such a box
/// intersects nothing.
pub fn aabb_inflate(a: &Aabb, margin: f32) -> Aabb {
    let delta = na::Vector3::new(margin, margin, margin);
    Aabb::new(a.mins - delta, a.maxs + delta)
}

/// Test two AABBs for intersection (touching counts).
pub fn aabb_intersects(a: &Aabb, b: &Aabb) -> bool {
    !(a.maxs.x < b.mins.x
        || a.mins.x > b.maxs.x
        || a.maxs.y < b.mins.y
        || a.mins.y > b.maxs.y
        || a.maxs.z < b.mins.z
        || a.mins.z > b.maxs.z)
}
