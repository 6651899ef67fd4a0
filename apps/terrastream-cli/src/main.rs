mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Quat, Vec3};
use terrastream_physics::{CollisionExtractor, PhysicsWorld, RapierWorld};
use terrastream_render::{DebugTextRenderer, Renderer};
use terrastream_stream::{ChunkStore, StreamingController};
use terrastream_terrain::{
    DECORATION_LIFT, LevelDocument, TerrainGenerator, WALL_THRESHOLD, load_level, save_level,
};
use tracing_subscriber::EnvFilter;

use crate::config::SimulationConfig;

#[derive(Parser)]
#[command(name = "terrastream-cli", about = "CLI tool for terrastream terrain streaming")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and generator constants
    Info,
    /// Generate meshes for a level and print a summary
    Generate {
        /// Level file (YAML)
        level: PathBuf,
        /// Number of meshes listed individually
        #[arg(short, long, default_value = "20")]
        list: usize,
    },
    /// Parse a level and write it back out in canonical form
    Level {
        /// Level file (YAML)
        level: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run the streaming frame loop with a falling observer
    Simulate {
        /// Level file (YAML)
        level: PathBuf,
        /// Simulation settings (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks, overriding the config file
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Peak gravity tilt in degrees, swept slowly about the Z axis
        #[arg(long, default_value = "0")]
        tilt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("terrastream-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("terrain: wall threshold={WALL_THRESHOLD}, decoration lift={DECORATION_LIFT}");
            let sim = SimulationConfig::default();
            println!(
                "stream: load radius={}, unload radius={}, chunk size={}",
                sim.stream.load_radius, sim.stream.unload_radius, sim.partition.chunk_size
            );
            println!("physics: extraction={:?}", sim.extraction);
        }
        Commands::Generate { level, list } => {
            let field = load_level(&level)
                .with_context(|| format!("loading level {}", level.display()))?;
            let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);
            print!("{}", DebugTextRenderer::new(list).render(&meshes));
            println!(
                "Cells: {}x{}, walls={}, slopes={}, decorations={}, skipped={}",
                field.size(),
                field.size(),
                report.walls,
                report.slopes,
                report.decorations,
                report.skipped
            );
        }
        Commands::Level { level, out } => {
            let field = load_level(&level)
                .with_context(|| format!("loading level {}", level.display()))?;
            match out {
                Some(path) => {
                    save_level(&field, &path)
                        .with_context(|| format!("saving level {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", LevelDocument::from_height_field(&field).to_yaml()?),
            }
        }
        Commands::Simulate {
            level,
            config,
            ticks,
            tilt,
        } => {
            let config = match config {
                Some(path) => SimulationConfig::load(&path)?,
                None => SimulationConfig::default(),
            };
            simulate(&level, &config, ticks.unwrap_or(config.ticks), tilt)?;
        }
    }

    Ok(())
}

/// The frame loop: stream chunks around the observer, step physics, sample
/// the observer.
fn simulate(level: &Path, config: &SimulationConfig, ticks: u64, tilt: f32) -> anyhow::Result<()> {
    let field =
        load_level(level).with_context(|| format!("loading level {}", level.display()))?;
    let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);
    let extractor = CollisionExtractor::new(config.extraction);
    let mut store = ChunkStore::build(&meshes, &config.partition, &extractor)?;
    let mut controller = StreamingController::new(config.stream)?;
    tracing::info!(
        meshes = report.mesh_count(),
        chunks = store.len(),
        shapes = store.shape_count(),
        "world prepared"
    );

    let mut world = RapierWorld::new(config.gravity);
    let start = config.observer_start.unwrap_or_else(|| {
        let center = field.size() as f32 / 2.0;
        let top = store.bounds().map_or(0.0, |b| b.max.y);
        Vec3::new(center, top + 2.0, center)
    });
    let observer_body = world.add_dynamic_ball(start, config.observer_radius);
    let mut observer = start;

    for tick in 0..ticks {
        let stats = controller.update(&mut store, &mut world, observer);
        if stats.chunks_loaded + stats.chunks_unloaded > 0 {
            tracing::debug!(tick, ?stats, "chunks changed");
        }

        if tilt != 0.0 {
            let t = tick as f32 * config.dt;
            let angle = tilt.to_radians() * (t * 0.5).sin();
            world.set_gravity(Quat::from_rotation_z(angle) * config.gravity);
        }

        world.step(config.dt);
        observer = world
            .body_position(observer_body)
            .context("observer body missing from physics world")?;

        if tick % 60 == 0 {
            tracing::info!(
                tick,
                x = observer.x,
                y = observer.y,
                z = observer.z,
                loaded = controller.stats().total_loaded_chunks,
                "observer"
            );
        }
    }

    println!(
        "Observer after {ticks} ticks: ({:.2}, {:.2}, {:.2})",
        observer.x, observer.y, observer.z
    );
    println!(
        "Chunks loaded: {}/{}, bodies in world: {}",
        store.loaded_count(),
        store.len(),
        world.body_count()
    );

    let released = controller.release_all(&mut store, &mut world);
    println!(
        "Released {released} chunks, bodies remaining: {}",
        world.body_count()
    );
    Ok(())
}
