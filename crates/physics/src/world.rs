use glam::Vec3;

use crate::shape::CollisionShape;

/// Opaque handle to a body lent to a physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Errors reported by a physics world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("physics world rejected shape {shape:?}: {reason}")]
    Rejected { shape: String, reason: String },
    #[error("unknown body handle {0:?}")]
    UnknownBody(BodyHandle),
}

/// What the streaming core needs from a physics world.
///
/// The world may change gravity between ticks; static bodies are unaffected
/// and nothing here caches it.
pub trait PhysicsWorld {
    /// Insert a static body for `shape` at the shape's captured placement.
    fn add_static_body(&mut self, shape: &CollisionShape) -> Result<BodyHandle, PhysicsError>;

    /// Remove a body previously returned by `add_static_body`.
    fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError>;

    fn set_gravity(&mut self, gravity: Vec3);

    fn gravity(&self) -> Vec3;
}
