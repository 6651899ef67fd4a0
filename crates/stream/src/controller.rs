use std::time::{Duration, Instant};

use glam::Vec3;
use terrastream_physics::PhysicsWorld;

use crate::config::{ConfigError, StreamConfig};
use crate::grid::{Chunk, ChunkStore};

/// Per-update streaming statistics for instrumentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub chunks_loaded: usize,
    pub chunks_unloaded: usize,
    pub bodies_added: usize,
    pub bodies_removed: usize,
    /// Shapes the physics world refused during this update.
    pub add_failures: usize,
    pub total_loaded_chunks: usize,
    pub update_time: Duration,
}

/// Decides, once per tick, which chunks have bodies in the physics world.
///
/// A chunk loads when the observer is within `load_radius` of its center and
/// unloads once the observer is farther than `unload_radius`. In between it
/// keeps its state.
#[derive(Debug)]
pub struct StreamingController {
    config: StreamConfig,
    stats: StreamStats,
}

impl StreamingController {
    pub fn new(config: StreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Statistics from the last update.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Apply load/unload transitions for `observer` and return this tick's stats.
    ///
    /// Physics failures are logged and counted, never returned: a chunk whose
    /// shapes are partly rejected is still marked loaded with the bodies that
    /// were accepted.
    pub fn update<W: PhysicsWorld + ?Sized>(
        &mut self,
        store: &mut ChunkStore,
        physics: &mut W,
        observer: Vec3,
    ) -> &StreamStats {
        let _span = tracing::info_span!("stream_update").entered();
        let start = Instant::now();
        let mut stats = StreamStats::default();

        for chunk in store.chunks_mut() {
            let distance = observer.distance(chunk.center());
            if !chunk.loaded && distance <= self.config.load_radius {
                tracing::debug!(coord = ?chunk.coord(), distance, "loading chunk");
                load_chunk(chunk, physics, &mut stats);
            } else if chunk.loaded && distance > self.config.unload_radius {
                tracing::debug!(coord = ?chunk.coord(), distance, "unloading chunk");
                unload_chunk(chunk, physics, &mut stats);
            }
        }

        stats.total_loaded_chunks = store.loaded_count();
        stats.update_time = start.elapsed();
        tracing::trace!(
            loaded = stats.chunks_loaded,
            unloaded = stats.chunks_unloaded,
            total = stats.total_loaded_chunks,
            "stream update complete"
        );
        self.stats = stats;
        &self.stats
    }

    /// Return every outstanding body to the physics world. Returns the number
    /// of chunks that were unloaded.
    pub fn release_all<W: PhysicsWorld + ?Sized>(
        &mut self,
        store: &mut ChunkStore,
        physics: &mut W,
    ) -> usize {
        let mut stats = StreamStats::default();
        for chunk in store.chunks_mut().filter(|c| c.loaded) {
            unload_chunk(chunk, physics, &mut stats);
        }
        tracing::debug!(
            chunks = stats.chunks_unloaded,
            bodies = stats.bodies_removed,
            "released all chunks"
        );
        stats.chunks_unloaded
    }
}

fn load_chunk<W: PhysicsWorld + ?Sized>(
    chunk: &mut Chunk,
    physics: &mut W,
    stats: &mut StreamStats,
) {
    let mut bodies = Vec::with_capacity(chunk.shapes().len());
    for shape in chunk.shapes() {
        match physics.add_static_body(shape) {
            Ok(handle) => bodies.push(handle),
            Err(e) => {
                stats.add_failures += 1;
                tracing::warn!(
                    coord = ?chunk.coord(),
                    shape = %shape.source,
                    "body add failed: {e}"
                );
            }
        }
    }
    stats.bodies_added += bodies.len();
    stats.chunks_loaded += 1;
    chunk.bodies = bodies;
    chunk.loaded = true;
}

fn unload_chunk<W: PhysicsWorld + ?Sized>(
    chunk: &mut Chunk,
    physics: &mut W,
    stats: &mut StreamStats,
) {
    for handle in chunk.bodies.drain(..) {
        match physics.remove_body(handle) {
            Ok(()) => stats.bodies_removed += 1,
            Err(e) => tracing::warn!(?handle, "body remove failed: {e}"),
        }
    }
    stats.chunks_unloaded += 1;
    chunk.loaded = false;
}
