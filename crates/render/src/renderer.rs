use crate::mesh::RenderMesh;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer only reads meshes; it never mutates generated geometry.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given meshes.
    fn render(&self, meshes: &[RenderMesh]) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the meshes. Useful for CLI output,
/// logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Maximum number of meshes listed individually; the rest are counted.
    pub max_listed: usize,
}

impl DebugTextRenderer {
    pub fn new(max_listed: usize) -> Self {
        Self { max_listed }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, meshes: &[RenderMesh]) -> String {
        let vertices: usize = meshes.iter().map(RenderMesh::vertex_count).sum();
        let triangles: usize = meshes.iter().map(RenderMesh::triangle_count).sum();

        let mut out = String::new();
        out.push_str(&format!(
            "=== Meshes: {} (vertices={}, triangles={}) ===\n",
            meshes.len(),
            vertices,
            triangles
        ));

        for mesh in meshes.iter().take(self.max_listed) {
            let p = mesh.transform.position;
            out.push_str(&format!(
                "  {} pos=({:.2}, {:.2}, {:.2}) verts={} tris={}\n",
                mesh.name,
                p.x,
                p.y,
                p.z,
                mesh.vertex_count(),
                mesh.triangle_count()
            ));
        }
        if meshes.len() > self.max_listed {
            out.push_str(&format!("  ... {} more\n", meshes.len() - self.max_listed));
        }

        out
    }
}
