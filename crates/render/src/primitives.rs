use glam::Vec3;

use crate::mesh::RenderMesh;

/// Triangles of a closed 8-vertex prism.
///
/// Vertices 0..4 are the base corners `(x0,z0) (x1,z0) (x1,z1) (x0,z1)`,
/// vertices 4..8 the top corners above them. Winding is counter-clockwise
/// seen from outside: 2 bottom, 2 top, 8 side triangles.
const PRISM_INDICES: [u32; 36] = [
    // bottom
    0, 1, 2, 0, 2, 3, //
    // top
    4, 7, 6, 4, 6, 5, //
    // -z side
    0, 4, 5, 0, 5, 1, //
    // +x side
    1, 5, 6, 1, 6, 2, //
    // +z side
    2, 6, 7, 2, 7, 3, //
    // -x side
    3, 7, 4, 3, 4, 0,
];

/// Closed prism over the XZ rectangle `[x0,x1] × [z0,z1]`.
///
/// The base is flat at `base_y`; `tops` gives the top height of each corner in
/// the order `(x0,z0) (x1,z0) (x1,z1) (x0,z1)`.
pub fn closed_prism(
    name: impl Into<String>,
    (x0, z0): (f32, f32),
    (x1, z1): (f32, f32),
    base_y: f32,
    tops: [f32; 4],
) -> RenderMesh {
    let corners = [(x0, z0), (x1, z0), (x1, z1), (x0, z1)];
    let mut positions = Vec::with_capacity(8);
    positions.extend(corners.iter().map(|&(x, z)| Vec3::new(x, base_y, z)));
    positions.extend(
        corners
            .iter()
            .zip(tops)
            .map(|(&(x, z), y)| Vec3::new(x, y, z)),
    );
    RenderMesh::new(name, positions, Some(PRISM_INDICES.to_vec()))
}

/// Axis-aligned box of the given full size, centered on the local origin.
pub fn cuboid(name: impl Into<String>, size: Vec3) -> RenderMesh {
    let h = size * 0.5;
    closed_prism(name, (-h.x, -h.z), (h.x, h.z), -h.y, [h.y; 4])
}

/// Octahedron centered on the local origin with horizontal radius `radius`
/// and vertical half-height `half_height`.
pub fn octahedron(name: impl Into<String>, radius: f32, half_height: f32) -> RenderMesh {
    let positions = vec![
        Vec3::new(radius, 0.0, 0.0),
        Vec3::new(-radius, 0.0, 0.0),
        Vec3::new(0.0, half_height, 0.0),
        Vec3::new(0.0, -half_height, 0.0),
        Vec3::new(0.0, 0.0, radius),
        Vec3::new(0.0, 0.0, -radius),
    ];
    let indices = vec![
        2, 4, 0, 2, 0, 5, 2, 5, 1, 2, 1, 4, //
        3, 0, 4, 3, 5, 0, 3, 1, 5, 3, 4, 1,
    ];
    RenderMesh::new(name, positions, Some(indices))
}
