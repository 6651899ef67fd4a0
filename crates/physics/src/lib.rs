//! Physics boundary: collision shapes extracted from render meshes, and the
//! narrow interface the streaming core uses to lend them to a physics world.
//!
//! # Invariants
//! - A shape's placement is a snapshot taken at extraction time; moving the
//!   source mesh afterwards does not move the shape.
//! - A mesh that cannot be turned into a shape is skipped with a warning and
//!   never blocks its siblings.

mod extract;
mod rapier;
mod shape;
mod world;

pub use extract::{CollisionExtractor, ExtractError, ExtractionStrategy};
pub use rapier::RapierWorld;
pub use shape::{CollisionShape, ShapeKind};
pub use world::{BodyHandle, PhysicsError, PhysicsWorld};
