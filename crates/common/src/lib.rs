//! Shared types used across the terrastream crates.

mod types;

pub use types::{Aabb, Transform};
