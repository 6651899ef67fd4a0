//! Terrain: corner-indexed height fields and the generator that turns them
//! into renderable wall and slope blocks.
//!
//! # Invariants
//! - Heights are corner-indexed: a `size × size` cell grid has
//!   `(size + 1) × (size + 1)` corners.
//! - Effective corner height (`base + offset`) is never negative.
//! - Malformed level data is recovered with defaults and a warning; only
//!   whole-file failures (I/O, YAML syntax) surface as errors.

mod generator;
mod heightfield;
mod level;

pub use generator::{
    CellKind, DECORATION_LIFT, GenerationReport, TerrainCell, TerrainGenerator, WALL_THRESHOLD,
};
pub use heightfield::{HeightField, MAX_LEVEL_SIZE, ObjectKind};
pub use level::{
    LevelDocument, LevelError, format_numeric_grid, format_object_grid, load_level,
    parse_numeric_grid, parse_object_grid, save_level,
};
