//! Streaming: chunked collision partition and observer-driven body streaming.
//!
//! # Invariants
//! - Every chunk built by [`ChunkStore::build`] holds at least one shape and
//!   starts unloaded.
//! - Only [`StreamingController`] adds or removes bodies. An unloaded chunk
//!   holds no body handles; a loaded chunk holds one per shape the physics
//!   world accepted, which may be none if every add was rejected.
//! - `unload_radius > load_radius`, checked when the controller is created.
//!
//! Chunk membership is fixed at build time. Meshes that straddle a chunk
//! boundary contribute a shape to every chunk they overlap.

mod config;
mod controller;
mod grid;

pub use config::{ConfigError, MAX_CHUNKS_PER_AXIS, PartitionConfig, StreamConfig};
pub use controller::{StreamStats, StreamingController};
pub use grid::{Chunk, ChunkCoord, ChunkStore};
