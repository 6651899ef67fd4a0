use serde::{Deserialize, Serialize};
use terrastream_common::{Aabb, Transform};
use terrastream_render::RenderMesh;

use crate::shape::{CollisionShape, ShapeKind};

/// How render meshes are reduced to collision shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// One box covering the mesh's world-space bounds.
    BoundingBox,
    /// The mesh's own triangles, placed by the mesh transform.
    #[default]
    TriangleMesh,
}

/// Reasons a mesh cannot be turned into a collision shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("mesh {0:?} has no vertices")]
    NoVertices(String),
    #[error("mesh {0:?} has no complete triangles")]
    NoTriangles(String),
    #[error("mesh {mesh:?} references vertex {index} but has {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh {0:?} has a non-finite vertex or transform")]
    NonFinite(String),
}

/// Converts render meshes into collision shapes.
#[derive(Debug, Clone, Default)]
pub struct CollisionExtractor {
    pub strategy: ExtractionStrategy,
}

impl CollisionExtractor {
    pub fn new(strategy: ExtractionStrategy) -> Self {
        Self { strategy }
    }

    pub fn extract(&self, mesh: &RenderMesh) -> Result<CollisionShape, ExtractError> {
        if mesh.positions.is_empty() {
            return Err(ExtractError::NoVertices(mesh.name.clone()));
        }
        if !mesh.transform.is_finite() || mesh.positions.iter().any(|p| !p.is_finite()) {
            return Err(ExtractError::NonFinite(mesh.name.clone()));
        }
        if mesh.triangle_count() == 0 {
            return Err(ExtractError::NoTriangles(mesh.name.clone()));
        }

        match self.strategy {
            ExtractionStrategy::BoundingBox => mesh
                .world_aabb()
                .map(|bounds| bounding_box(mesh, bounds))
                .ok_or_else(|| ExtractError::NoVertices(mesh.name.clone())),
            ExtractionStrategy::TriangleMesh => triangle_mesh(mesh),
        }
    }

    /// Extract every mesh, skipping (and logging) the ones that fail.
    pub fn extract_all<'a>(
        &self,
        meshes: impl IntoIterator<Item = &'a RenderMesh>,
    ) -> Vec<CollisionShape> {
        meshes
            .into_iter()
            .filter_map(|mesh| match self.extract(mesh) {
                Ok(shape) => Some(shape),
                Err(e) => {
                    tracing::warn!(mesh = %mesh.name, "skipping mesh: {e}");
                    None
                }
            })
            .collect()
    }
}

fn bounding_box(mesh: &RenderMesh, bounds: Aabb) -> CollisionShape {
    CollisionShape {
        source: mesh.name.clone(),
        kind: ShapeKind::Box {
            half_extents: bounds.half_extents(),
        },
        placement: Transform::from_position(bounds.center()),
    }
}

fn triangle_mesh(mesh: &RenderMesh) -> Result<CollisionShape, ExtractError> {
    let vertex_count = mesh.positions.len();
    let indices: Vec<[u32; 3]> = mesh.triangles().collect();
    if let Some(&index) = indices
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(ExtractError::IndexOutOfRange {
            mesh: mesh.name.clone(),
            index,
            vertex_count,
        });
    }

    Ok(CollisionShape {
        source: mesh.name.clone(),
        kind: ShapeKind::TriangleMesh {
            vertices: mesh.positions.clone(),
            indices,
        },
        placement: mesh.transform,
    })
}
