use glam::Vec3;
use terrastream_common::{Aabb, Transform};

/// Geometry of a collision shape, in shape-local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned (in local space) box.
    Box { half_extents: Vec3 },
    /// Triangle soup with explicit index triples.
    TriangleMesh {
        vertices: Vec<Vec3>,
        indices: Vec<[u32; 3]>,
    },
}

/// A simplified collision proxy for one render mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionShape {
    /// Name of the mesh this shape was extracted from.
    pub source: String,
    pub kind: ShapeKind,
    /// World placement captured at extraction. Scale applies to the local
    /// geometry; position and rotation place the static body.
    pub placement: Transform,
}

impl CollisionShape {
    pub fn is_box(&self) -> bool {
        matches!(self.kind, ShapeKind::Box { .. })
    }

    pub fn triangle_count(&self) -> usize {
        match &self.kind {
            ShapeKind::Box { .. } => 12,
            ShapeKind::TriangleMesh { indices, .. } => indices.len(),
        }
    }

    /// World-space bounds of the placed shape.
    pub fn world_aabb(&self) -> Option<Aabb> {
        match &self.kind {
            ShapeKind::Box { half_extents } => {
                let h = *half_extents;
                let corners = (0..8).map(|i| {
                    Vec3::new(
                        if i & 1 == 0 { -h.x } else { h.x },
                        if i & 2 == 0 { -h.y } else { h.y },
                        if i & 4 == 0 { -h.z } else { h.z },
                    )
                });
                Aabb::from_points(corners.map(|c| self.placement.transform_point(c)))
            }
            ShapeKind::TriangleMesh { vertices, .. } => Aabb::from_points(
                vertices.iter().map(|v| self.placement.transform_point(*v)),
            ),
        }
    }
}
