use glam::Vec3;
use terrastream_common::{Aabb, Transform};

/// A renderable triangle mesh as supplied by the scene layer.
///
/// `indices` is optional: without it, every three consecutive positions form
/// one triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    pub name: String,
    /// Vertex positions in mesh-local space.
    pub positions: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
    /// One normal per triangle, in mesh-local space.
    pub normals: Vec<Vec3>,
    pub transform: Transform,
}

impl RenderMesh {
    /// Build a mesh at the origin and derive its flat normals.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        let mut mesh = Self {
            name: name.into(),
            positions,
            indices,
            normals: Vec::new(),
            transform: Transform::default(),
        };
        mesh.recompute_normals();
        mesh
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Recompute per-triangle normals from the current positions.
    ///
    /// Triangles referencing missing vertices get a zero normal.
    pub fn recompute_normals(&mut self) {
        self.normals = self
            .triangles()
            .map(|[a, b, c]| {
                match (
                    self.positions.get(a as usize),
                    self.positions.get(b as usize),
                    self.positions.get(c as usize),
                ) {
                    (Some(a), Some(b), Some(c)) => face_normal(*a, *b, *c),
                    _ => Vec3::ZERO,
                }
            })
            .collect();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Triangle index triples. Trailing indices that do not complete a
    /// triangle are ignored.
    pub fn triangles(&self) -> Box<dyn Iterator<Item = [u32; 3]> + '_> {
        match &self.indices {
            Some(indices) => Box::new(indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])),
            None => {
                let count = (self.positions.len() / 3) as u32;
                Box::new((0..count).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]))
            }
        }
    }

    /// Whether the mesh carries anything a collision shape can be made from.
    pub fn has_geometry(&self) -> bool {
        !self.positions.is_empty() && self.triangle_count() > 0
    }

    /// Vertex positions mapped through the world transform.
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .iter()
            .map(|p| self.transform.transform_point(*p))
    }

    /// World-space bounding box, `None` for a mesh without vertices.
    pub fn world_aabb(&self) -> Option<Aabb> {
        Aabb::from_points(self.world_positions())
    }
}

/// Unit normal of triangle `abc` with counter-clockwise front face.
///
/// Degenerate triangles yield `Vec3::ZERO`.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> RenderMesh {
        RenderMesh::new(
            "quad",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            Some(vec![0, 1, 2, 0, 2, 3]),
        )
    }

    #[test]
    fn normals_are_per_triangle() {
        let m = quad();
        assert_eq!(m.triangle_count(), 2);
        assert_eq!(m.normals.len(), 2);
        for n in &m.normals {
            assert_eq!(*n, Vec3::Y);
        }
    }

    #[test]
    fn unindexed_mesh_uses_consecutive_triples() {
        let m = RenderMesh::new(
            "soup",
            vec![Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::ONE],
            None,
        );
        let tris: Vec<_> = m.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn empty_mesh_has_no_geometry() {
        let m = RenderMesh::new("empty", Vec::new(), None);
        assert!(!m.has_geometry());
        assert!(m.world_aabb().is_none());
    }

    #[test]
    fn world_aabb_follows_transform() {
        let m = quad().with_position(Vec3::new(5.0, 1.0, -2.0));
        let b = m.world_aabb().unwrap();
        assert_eq!(b.min, Vec3::new(5.0, 1.0, -2.0));
        assert_eq!(b.max, Vec3::new(6.0, 1.0, -1.0));
    }

    #[test]
    fn out_of_range_index_gives_zero_normal() {
        let m = RenderMesh::new("bad", vec![Vec3::ZERO, Vec3::X], Some(vec![0, 1, 7]));
        assert_eq!(m.normals, vec![Vec3::ZERO]);
    }
}
