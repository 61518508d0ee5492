//! Particles bouncing inside a box around a dynamic mesh.
//!
//! Headless counterpart of the original particle demo: load a mesh, build
//! its distance field, scatter particles around it, and let everything
//! collide for a fixed number of steps.

use std::path::PathBuf;

use anyhow::ensure;
use clap::Parser;
use field_types::Aabb;
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{CollisionObject, Simulation};
use tracing::info;

/// Number of particles in the demo.
const PARTICLE_COUNT: usize = 100;

/// Mass given to the mesh so particles can push it around.
const OBJECT_MASS: f64 = 50.0;

#[derive(Parser)]
#[command(name = "particle_simulation")]
#[command(about = "Particle-vs-mesh demo on a signed distance field", version)]
struct Cli {
    /// Distance-field grid resolution per axis.
    #[arg(default_value_t = 64)]
    resolution: usize,

    /// Mesh to load.
    #[arg(long, default_value = "data/bunny.obj")]
    mesh: PathBuf,

    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 2000)]
    steps: usize,

    /// Seed for the particle scatter; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    sim_cli::init_tracing();
    let cli: Cli = sim_cli::parse_or_exit();
    ensure!(cli.resolution >= 2, "resolution must be at least 2");

    info!(
        resolution = cli.resolution,
        mesh = %cli.mesh.display(),
        "particle simulation starting"
    );

    let mut object = CollisionObject::from_obj_file(&cli.mesh, cli.resolution)?;

    // Simulation box: the object's bounds padded by half their extent.
    let object_bounds = object.world_bounds();
    let padding = object_bounds.size() * 0.5;
    let bounds = Aabb::new(object_bounds.min - padding, object_bounds.max + padding);

    object.set_mass(OBJECT_MASS);
    object.set_position(bounds.center());
    object.set_velocity(Vector3::new(1.0, 0.5, 0.0));

    // Particle size and speed track the mesh dimensions.
    let max_dimension = object_bounds.size().max();
    let particle_radius = max_dimension * 0.01;
    let particle_speed = max_dimension * 0.8;

    info!(
        particle_radius,
        particle_speed,
        bounds_min = format_args!("({:.3}, {:.3}, {:.3})", bounds.min.x, bounds.min.y, bounds.min.z),
        bounds_max = format_args!("({:.3}, {:.3}, {:.3})", bounds.max.x, bounds.max.y, bounds.max.z),
        "scene configured"
    );

    let mut sim = Simulation::new(bounds);
    sim.add_object(object);

    let mut rng = cli
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    sim.scatter_particles(&mut rng, PARTICLE_COUNT, particle_speed, particle_radius);

    sim_cli::drive(&mut sim, 1.0 / 120.0, cli.steps);
    Ok(())
}
