//! Static collider: immutable environment triangles plus their BVH.
//!
//! This is what the actor collides against. It is built once, when the
//! environment finishes loading, and never changes afterwards.
//!
//! Design goals
//! - Merged: any number of mesh instances, each with its own transform, are
//!   baked into one collider-local triangle list and one BVH.
//! - Query-focused: the collider only answers "which triangles are near this
//!   box"; exact tests live in `collision`.
//! - Validated up front: bad indices, non-finite vertices and singular
//!   transforms are rejected here so the per-substep path never has to check.

use rapier3d::parry::bounding_volume::Aabb;
use thiserror::Error;

use crate::collision::{Mat4, Point, Triangle, TriangleIndex, broad::aabb_union};

/// Reasons a static collider cannot be built.
#[derive(Debug, Error, PartialEq)]
pub enum ColliderError {
    #[error("mesh {mesh}: index count {count} is not a multiple of 3")]
    RaggedIndices { mesh: usize, count: usize },

    #[error("mesh {mesh}: index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("triangle {triangle} has a non-finite vertex")]
    NonFiniteVertex { triangle: usize },

    #[error("collider world transform is not invertible")]
    SingularTransform,
}

/// One piece of environment geometry before merging.
#[derive(Clone, Debug)]
pub struct MeshInstance {
    pub vertices: Vec<Point>,
    /// Triangle list: every three indices form one triangle.
    pub indices: Vec<u32>,
    /// Placement of this mesh inside the collider.
    pub transform: Mat4,
}

impl MeshInstance {
    #[inline]
    pub fn new(vertices: Vec<Point>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            transform: Mat4::identity(),
        }
    }

    #[inline]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// Merged static triangle geometry, its BVH and its world placement.
pub struct StaticCollider {
    index: TriangleIndex,
    world_transform: Mat4,
    inverse_transform: Mat4,
}

impl StaticCollider {
    /// Build from a plain triangle list already expressed in collider space.
    pub fn from_triangles(
        triangles: Vec<Triangle>,
        world_transform: Mat4,
    ) -> Result<Self, ColliderError> {
        let inverse_transform = invert(&world_transform)?;

        if let Some(triangle) = triangles.iter().position(|t| !is_finite_triangle(t)) {
            return Err(ColliderError::NonFiniteVertex { triangle });
        }

        let index = TriangleIndex::build(triangles);
        log::debug!("static collider built: {} triangles", index.len());

        Ok(Self {
            index,
            world_transform,
            inverse_transform,
        })
    }

    /// Merge mesh instances into one collider.
    ///
    /// Each instance's transform is baked into its vertices, so the resulting
    /// triangles are in collider space and `world_transform` places the whole
    /// collider in the world.
    pub fn from_meshes(
        meshes: &[MeshInstance],
        world_transform: Mat4,
    ) -> Result<Self, ColliderError> {
        let mut triangles = Vec::with_capacity(meshes.iter().map(|m| m.indices.len() / 3).sum());

        for (mesh_idx, mesh) in meshes.iter().enumerate() {
            if mesh.indices.len() % 3 != 0 {
                return Err(ColliderError::RaggedIndices {
                    mesh: mesh_idx,
                    count: mesh.indices.len(),
                });
            }

            let baked: Vec<Point> = mesh
                .vertices
                .iter()
                .map(|v| mesh.transform.transform_point(v))
                .collect();

            for tri in mesh.indices.chunks_exact(3) {
                let vertex = |index: u32| {
                    baked
                        .get(index as usize)
                        .copied()
                        .ok_or(ColliderError::IndexOutOfRange {
                            mesh: mesh_idx,
                            index,
                            vertex_count: baked.len(),
                        })
                };
                triangles.push(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?));
            }
        }

        Self::from_triangles(triangles, world_transform)
    }

    #[inline]
    pub fn index(&self) -> &TriangleIndex {
        &self.index
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn world_transform(&self) -> &Mat4 {
        &self.world_transform
    }

    /// Map a world-space point into collider space.
    #[inline]
    pub fn world_to_local(&self, p: &Point) -> Point {
        self.inverse_transform.transform_point(p)
    }

    /// Map a collider-space point back into the world.
    #[inline]
    pub fn local_to_world(&self, p: &Point) -> Point {
        self.world_transform.transform_point(p)
    }

    /// World-space box around all geometry, `None` for an empty collider.
    pub fn world_bounds(&self) -> Option<Aabb> {
        let local = self.index.bounds()?;
        local
            .vertices()
            .iter()
            .map(|corner| {
                let p = self.local_to_world(corner);
                Aabb::new(p, p)
            })
            .reduce(|acc, b| aabb_union(&acc, &b))
    }
}

fn invert(m: &Mat4) -> Result<Mat4, ColliderError> {
    if !m.iter().all(|v| v.is_finite()) {
        return Err(ColliderError::SingularTransform);
    }
    m.try_inverse()
        .filter(|inv| inv.iter().all(|v| v.is_finite()))
        .ok_or(ColliderError::SingularTransform)
}

#[inline]
fn is_finite_triangle(t: &Triangle) -> bool {
    [t.a, t.b, t.c]
        .iter()
        .all(|p| p.coords.iter().all(|v| v.is_finite()))
}
