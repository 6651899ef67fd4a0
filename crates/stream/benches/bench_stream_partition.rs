use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use terrastream_physics::{
    BodyHandle, CollisionExtractor, CollisionShape, ExtractionStrategy, PhysicsError, PhysicsWorld,
};
use terrastream_render::{RenderMesh, cuboid};
use terrastream_stream::{ChunkStore, PartitionConfig, StreamConfig, StreamingController};

/// Accepts every body without simulating anything.
#[derive(Default)]
struct NullWorld {
    next: u64,
}

impl PhysicsWorld for NullWorld {
    fn add_static_body(&mut self, _shape: &CollisionShape) -> Result<BodyHandle, PhysicsError> {
        self.next += 1;
        Ok(BodyHandle(self.next))
    }

    fn remove_body(&mut self, _handle: BodyHandle) -> Result<(), PhysicsError> {
        Ok(())
    }

    fn set_gravity(&mut self, _gravity: Vec3) {}

    fn gravity(&self) -> Vec3 {
        Vec3::ZERO
    }
}

fn make_meshes(mesh_count: usize, spacing: f32) -> Vec<RenderMesh> {
    let side = (mesh_count as f32).sqrt().ceil() as usize;
    (0..mesh_count)
        .map(|i| {
            let x = (i % side) as f32 * spacing;
            let z = (i / side) as f32 * spacing;
            cuboid(format!("block_{i}"), Vec3::ONE).with_position(Vec3::new(x, 0.5, z))
        })
        .collect()
}

fn bench_build(mesh_count: usize, strategy: ExtractionStrategy, iterations: usize) {
    let meshes = make_meshes(mesh_count, 2.0);
    let config = PartitionConfig::default();
    let extractor = CollisionExtractor::new(strategy);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(ChunkStore::build(black_box(&meshes), &config, &extractor));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build ({mesh_count} meshes, {strategy:?}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_stream_update(mesh_count: usize, iterations: usize) {
    let meshes = make_meshes(mesh_count, 2.0);
    let Ok(mut store) = ChunkStore::build(
        &meshes,
        &PartitionConfig::default(),
        &CollisionExtractor::default(),
    ) else {
        println!("  stream update: partition config rejected");
        return;
    };
    let Ok(mut controller) = StreamingController::new(StreamConfig::default()) else {
        println!("  stream update: stream config rejected");
        return;
    };
    let mut world = NullWorld::default();

    let start = Instant::now();
    for i in 0..iterations {
        // Observer walks back and forth along X.
        let observer = Vec3::new((i % 100) as f32 * 2.0, 1.0, 0.0);
        let _ = black_box(controller.update(&mut store, &mut world, black_box(observer)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  stream update ({mesh_count} meshes, {} chunks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        store.len()
    );
}

fn main() {
    println!("=== Stream Partition Benchmarks ===\n");

    println!("Chunk store build:");
    bench_build(100, ExtractionStrategy::BoundingBox, 1000);
    bench_build(1000, ExtractionStrategy::BoundingBox, 100);
    bench_build(1000, ExtractionStrategy::TriangleMesh, 100);
    bench_build(10000, ExtractionStrategy::TriangleMesh, 10);

    println!("\nStream update (hysteresis load/unload):");
    bench_stream_update(100, 10000);
    bench_stream_update(1000, 1000);
    bench_stream_update(10000, 100);

    println!("\n=== Done ===");
}
