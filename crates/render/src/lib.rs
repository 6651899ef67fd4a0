//! Rendering boundary: the mesh data the scene layer hands to terrain
//! generation and collision extraction.
//!
//! # Invariants
//! - Vertex positions are stored in mesh-local space; the world transform is
//!   carried alongside and never baked into the buffer.
//! - Normals are flat: one per triangle, derived from the triangle's edges.
//!
//! Nothing here draws. The `Renderer` trait exists so that a GPU backend can
//! consume the same meshes as the debug text renderer.

mod mesh;
mod primitives;
mod renderer;

pub use mesh::{RenderMesh, face_normal};
pub use primitives::{closed_prism, cuboid, octahedron};
pub use renderer::{DebugTextRenderer, Renderer};
