use serde::{Deserialize, Serialize};

/// Configuration errors, reported at setup time rather than per frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unload radius {unload} must be greater than load radius {load}")]
    HysteresisCollapsed { load: f32, unload: f32 },
    #[error("load radius must be finite and non-negative, got {0}")]
    InvalidLoadRadius(f32),
    #[error("chunk size must be finite and positive, got {0}")]
    InvalidChunkSize(f32),
    #[error("per-chunk mesh cap must be at least 1")]
    ZeroMeshCap,
    #[error("partition needs {cells} chunks along one axis, more than {max}")]
    GridTooLarge { cells: f32, max: i32 },
}

/// Largest number of grid cells along either axis of a chunk store.
pub const MAX_CHUNKS_PER_AXIS: i32 = 4096;

/// Streaming radii around the observer, measured to chunk centers.
///
/// Chunks within `load_radius` get bodies; chunks beyond `unload_radius` lose
/// them; chunks in between keep whatever state they have.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub load_radius: f32,
    pub unload_radius: f32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            load_radius: 24.0,
            unload_radius: 32.0,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.load_radius.is_finite() || self.load_radius < 0.0 {
            return Err(ConfigError::InvalidLoadRadius(self.load_radius));
        }
        // Also rejects a NaN unload radius.
        if !(self.unload_radius > self.load_radius) {
            return Err(ConfigError::HysteresisCollapsed {
                load: self.load_radius,
                unload: self.unload_radius,
            });
        }
        Ok(())
    }
}

/// How source meshes are grouped into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Edge length of a chunk on X and Z.
    pub chunk_size: f32,
    /// Meshes a single chunk may absorb; later overlapping meshes are skipped
    /// for that chunk only.
    pub max_meshes_per_chunk: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8.0,
            max_meshes_per_chunk: 512,
        }
    }
}

impl PartitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if self.max_meshes_per_chunk == 0 {
            return Err(ConfigError::ZeroMeshCap);
        }
        Ok(())
    }
}
