use std::collections::BTreeMap;

use glam::Vec3;
use rapier3d::prelude::*;

use crate::shape::{CollisionShape, ShapeKind};
use crate::world::{BodyHandle, PhysicsError, PhysicsWorld};

/// Physics simulation world backed by Rapier.
///
/// Static terrain bodies come and go through [`PhysicsWorld`]; the observer
/// is an ordinary dynamic body created with [`RapierWorld::add_dynamic_ball`].
pub struct RapierWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    gravity: Vector<Real>,
    handles: BTreeMap<BodyHandle, RigidBodyHandle>,
    next_handle: u64,
}

impl RapierWorld {
    /// Create an empty world with the given gravity.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: vector![gravity.x, gravity.y, gravity.z],
            handles: BTreeMap::new(),
            next_handle: 0,
        }
    }

    /// Step the simulation forward by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a dynamic sphere, e.g. a tracked observer.
    pub fn add_dynamic_ball(&mut self, position: Vec3, radius: f32) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::ball(radius).build();
        self.insert(body, collider)
    }

    /// Current world position of a body.
    pub fn body_position(&self, handle: BodyHandle) -> Option<Vec3> {
        let body = self.rigid_body_set.get(*self.handles.get(&handle)?)?;
        let t = body.translation();
        Some(Vec3::new(t.x, t.y, t.z))
    }

    /// Number of rigid bodies in the world, static and dynamic.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyHandle {
        let rb = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, rb, &mut self.rigid_body_set);
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, rb);
        handle
    }
}

/// Build a collider for `shape`, applying its placement scale to the local
/// geometry.
fn collider_for(shape: &CollisionShape) -> Result<Collider, PhysicsError> {
    let reject = |reason: &str| PhysicsError::Rejected {
        shape: shape.source.clone(),
        reason: reason.to_owned(),
    };
    if !shape.placement.is_finite() {
        return Err(reject("non-finite placement"));
    }
    let scale = shape.placement.scale;

    let builder = match &shape.kind {
        ShapeKind::Box { half_extents } => {
            let h = *half_extents * scale.abs();
            if !h.is_finite() {
                return Err(reject("non-finite half extents"));
            }
            ColliderBuilder::cuboid(h.x, h.y, h.z)
        }
        ShapeKind::TriangleMesh { vertices, indices } => {
            let corner = |i: u32| {
                vertices
                    .get(i as usize)
                    .map(|v| {
                        let v = *v * scale;
                        point![v.x, v.y, v.z]
                    })
                    .ok_or_else(|| reject("triangle index out of range"))
            };
            let mut triangles = Vec::with_capacity(indices.len());
            for &[a, b, c] in indices {
                triangles.push((
                    Isometry::identity(),
                    SharedShape::triangle(corner(a)?, corner(b)?, corner(c)?),
                ));
            }
            if triangles.is_empty() {
                return Err(reject("triangle mesh has no triangles"));
            }
            ColliderBuilder::compound(triangles)
        }
    };
    Ok(builder.build())
}

impl PhysicsWorld for RapierWorld {
    fn add_static_body(&mut self, shape: &CollisionShape) -> Result<BodyHandle, PhysicsError> {
        let collider = collider_for(shape)?;
        let p = shape.placement.position;
        let axis = shape.placement.rotation.to_scaled_axis();
        let body = RigidBodyBuilder::fixed()
            .translation(vector![p.x, p.y, p.z])
            .rotation(vector![axis.x, axis.y, axis.z])
            .build();
        Ok(self.insert(body, collider))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        let rb = self
            .handles
            .remove(&handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        self.rigid_body_set.remove(
            rb,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        Ok(())
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = vector![gravity.x, gravity.y, gravity.z];
    }

    fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{CollisionExtractor, ExtractionStrategy};
    use terrastream_common::Transform;
    use terrastream_render::{closed_prism, cuboid};

    fn floor_box() -> CollisionShape {
        CollisionShape {
            source: "floor".into(),
            kind: ShapeKind::Box {
                half_extents: Vec3::new(10.0, 0.5, 10.0),
            },
            placement: Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
        }
    }

    #[test]
    fn world_creation() {
        let world = RapierWorld::new(Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(world.gravity(), Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_can_change_between_steps() {
        let mut world = RapierWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let ball = world.add_dynamic_ball(Vec3::new(0.0, 10.0, 0.0), 0.5);
        world.step(1.0 / 60.0);
        world.set_gravity(Vec3::new(9.81, 0.0, 0.0));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let p = world.body_position(ball).unwrap();
        assert!(p.x > 0.0);
    }

    #[test]
    fn static_box_stops_a_falling_ball() {
        let mut world = RapierWorld::new(Vec3::new(0.0, -9.81, 0.0));
        world.add_static_body(&floor_box()).unwrap();
        let ball = world.add_dynamic_ball(Vec3::new(0.0, 2.0, 0.0), 0.5);
        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        let y = world.body_position(ball).unwrap().y;
        assert!(y > 0.25 && y < 1.0, "ball at y={y}");
    }

    #[test]
    fn triangle_mesh_stops_a_falling_ball() {
        let mut world = RapierWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let slab = closed_prism("slab", (-5.0, -5.0), (5.0, 5.0), -1.0, [0.0; 4]);
        let shape = CollisionExtractor::new(ExtractionStrategy::TriangleMesh)
            .extract(&slab)
            .unwrap();
        world.add_static_body(&shape).unwrap();
        let ball = world.add_dynamic_ball(Vec3::new(0.0, 2.0, 0.0), 0.5);
        for _ in 0..120 {
            world.step(1.0 / 60.0);
        }
        let y = world.body_position(ball).unwrap().y;
        assert!(y > 0.25 && y < 1.0, "ball at y={y}");
    }

    #[test]
    fn remove_body_releases_collider() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let shape = CollisionExtractor::default()
            .extract(&cuboid("c", Vec3::ONE))
            .unwrap();
        let handle = world.add_static_body(&shape).unwrap();
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);

        world.remove_body(handle).unwrap();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 0);
        assert_eq!(
            world.remove_body(handle),
            Err(PhysicsError::UnknownBody(handle))
        );
    }

    #[test]
    fn empty_triangle_mesh_is_rejected() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let shape = CollisionShape {
            source: "empty".into(),
            kind: ShapeKind::TriangleMesh {
                vertices: vec![],
                indices: vec![],
            },
            placement: Transform::default(),
        };
        let err = world.add_static_body(&shape).unwrap_err();
        assert!(matches!(err, PhysicsError::Rejected { .. }));
        assert_eq!(world.body_count(), 0);
    }
}
