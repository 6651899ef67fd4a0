use std::collections::BTreeMap;

use glam::Vec3;
use terrastream_common::Aabb;
use terrastream_physics::{BodyHandle, CollisionExtractor, CollisionShape};
use terrastream_render::RenderMesh;

use crate::config::{ConfigError, MAX_CHUNKS_PER_AXIS, PartitionConfig};

/// A 2D chunk coordinate in the world grid (ignoring Y axis for partitioning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// A fixed-size cell of the world owning the collision shapes of every mesh
/// that overlaps it.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    bounds: Aabb,
    shapes: Vec<CollisionShape>,
    pub(crate) loaded: bool,
    pub(crate) bodies: Vec<BodyHandle>,
}

impl Chunk {
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space bounds, spanning the full Y extent of the source meshes.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn center(&self) -> Vec3 {
        self.bounds.center()
    }

    pub fn shapes(&self) -> &[CollisionShape] {
        &self.shapes
    }

    /// Whether this chunk's shapes currently have bodies in the physics world.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Handles of the bodies lent to the physics world; empty when unloaded.
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }
}

/// Uniform XZ grid of chunks built once from a set of meshes.
///
/// Meshes are assigned whole to every chunk their bounds overlap; nothing is
/// split. Chunk content is fixed after `build`; only the loaded state changes.
#[derive(Debug)]
pub struct ChunkStore {
    chunk_size: f32,
    bounds: Option<Aabb>,
    extent: (i32, i32),
    chunks: BTreeMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    /// Partition `meshes` and extract collision shapes for every chunk.
    ///
    /// Meshes without geometry are dropped here, once, with a warning. Chunks
    /// that end up with no shapes are not created.
    pub fn build(
        meshes: &[RenderMesh],
        config: &PartitionConfig,
        extractor: &CollisionExtractor,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let _span = tracing::info_span!("chunk_store_build", meshes = meshes.len()).entered();
        let chunk_size = config.chunk_size;

        let ingested: Vec<(&RenderMesh, Aabb)> = meshes
            .iter()
            .filter_map(|mesh| {
                let bounds = mesh
                    .has_geometry()
                    .then(|| mesh.world_aabb())
                    .flatten()
                    .filter(|b| b.min.is_finite() && b.max.is_finite());
                if bounds.is_none() {
                    tracing::warn!(mesh = %mesh.name, "mesh has no usable geometry, skipping");
                }
                bounds.map(|b| (mesh, b))
            })
            .collect();

        let Some(bounds) = ingested.iter().map(|(_, b)| *b).reduce(|a, b| a.union(&b)) else {
            tracing::warn!("no meshes with geometry, chunk store is empty");
            return Ok(Self {
                chunk_size,
                bounds: None,
                extent: (0, 0),
                chunks: BTreeMap::new(),
            });
        };

        let size = bounds.size();
        let cells_x = grid_cells(size.x, chunk_size)?;
        let cells_z = grid_cells(size.z, chunk_size)?;

        let mut chunks = BTreeMap::new();
        for cz in 0..cells_z {
            for cx in 0..cells_x {
                let coord = ChunkCoord::new(cx, cz);
                let chunk_bounds = cell_bounds(&bounds, chunk_size, coord);

                let mut members: Vec<&RenderMesh> = Vec::new();
                let mut over_cap = 0usize;
                for (mesh, mesh_bounds) in &ingested {
                    if !mesh_bounds.overlaps_xz(&chunk_bounds) {
                        continue;
                    }
                    if members.len() >= config.max_meshes_per_chunk {
                        over_cap += 1;
                        continue;
                    }
                    members.push(*mesh);
                }
                if over_cap > 0 {
                    tracing::warn!(
                        ?coord,
                        cap = config.max_meshes_per_chunk,
                        skipped = over_cap,
                        "chunk mesh cap reached"
                    );
                }
                if members.is_empty() {
                    continue;
                }

                let shapes = extractor.extract_all(members.iter().copied());
                if shapes.is_empty() {
                    tracing::warn!(?coord, meshes = members.len(), "no shapes extracted, chunk dropped");
                    continue;
                }
                tracing::debug!(?coord, shapes = shapes.len(), "chunk built");
                chunks.insert(
                    coord,
                    Chunk {
                        coord,
                        bounds: chunk_bounds,
                        shapes,
                        loaded: false,
                        bodies: Vec::new(),
                    },
                );
            }
        }

        tracing::debug!(
            chunks = chunks.len(),
            grid_x = cells_x,
            grid_z = cells_z,
            "chunk store built"
        );

        Ok(Self {
            chunk_size,
            bounds: Some(bounds),
            extent: (cells_x, cells_z),
            chunks,
        })
    }

    /// Chunk size used for this partition.
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Bounds of all ingested meshes, `None` for an empty store.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Grid cells along X and Z, including cells that produced no chunk.
    pub fn grid_extent(&self) -> (i32, i32) {
        self.extent
    }

    /// Convert a world position to the coordinate of the grid cell under it.
    pub fn position_to_chunk(&self, pos: Vec3) -> Option<ChunkCoord> {
        let origin = self.bounds?.min;
        Some(ChunkCoord {
            x: ((pos.x - origin.x) / self.chunk_size).floor() as i32,
            z: ((pos.z - origin.z) / self.chunk_size).floor() as i32,
        })
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Chunks in coordinate order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub(crate) fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.values().filter(|c| c.loaded).count()
    }

    /// Total shapes across all chunks (a mesh spanning chunks counts once per chunk).
    pub fn shape_count(&self) -> usize {
        self.chunks.values().map(|c| c.shapes.len()).sum()
    }
}

/// Cells needed to cover `extent`, at least one.
fn grid_cells(extent: f32, chunk_size: f32) -> Result<i32, ConfigError> {
    let cells = (extent / chunk_size).ceil().max(1.0);
    // Also rejects NaN and infinite extents.
    if !(cells <= MAX_CHUNKS_PER_AXIS as f32) {
        return Err(ConfigError::GridTooLarge {
            cells,
            max: MAX_CHUNKS_PER_AXIS,
        });
    }
    Ok(cells as i32)
}

fn cell_bounds(bounds: &Aabb, chunk_size: f32, coord: ChunkCoord) -> Aabb {
    let x0 = bounds.min.x + coord.x as f32 * chunk_size;
    let z0 = bounds.min.z + coord.z as f32 * chunk_size;
    Aabb::new(
        Vec3::new(x0, bounds.min.y, z0),
        Vec3::new(x0 + chunk_size, bounds.max.y, z0 + chunk_size),
    )
}
