//! Mesh-vs-mesh collision demo: two dynamic objects and a static platform.

use std::path::PathBuf;

use anyhow::ensure;
use clap::Parser;
use field_types::Aabb;
use nalgebra::{Point3, Vector3};
use sim_core::{CollisionObject, Simulation};
use tracing::info;

/// Timestep cap keeping the collision resolution stable.
const MAX_DT: f64 = 0.008;

#[derive(Parser)]
#[command(name = "collision_simulation")]
#[command(about = "Mesh-vs-mesh collision demo on signed distance fields", version)]
struct Cli {
    /// Distance-field grid resolution per axis.
    #[arg(default_value_t = 32)]
    resolution: usize,

    /// Mesh to load; all three objects share it.
    #[arg(long, default_value = "data/bunny.obj")]
    mesh: PathBuf,

    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 1500)]
    steps: usize,
}

fn main() -> anyhow::Result<()> {
    sim_cli::init_tracing();
    let cli: Cli = sim_cli::parse_or_exit();
    ensure!(cli.resolution >= 2, "resolution must be at least 2");

    info!(
        resolution = cli.resolution,
        mesh = %cli.mesh.display(),
        "collision simulation starting"
    );

    let mesh = field_io::load_obj(&cli.mesh)?;
    let size = mesh.bounds().size();
    let max_dimension = size.max();

    // Arena a few object-lengths across, flattened on Y.
    let extent = max_dimension * 2.5;
    let bounds = Aabb::new(
        Point3::new(-extent, -extent * 0.6, -extent),
        Point3::new(extent, extent * 0.6, extent),
    );
    let spacing = max_dimension * 1.5;

    let mut left = CollisionObject::from_mesh(mesh.clone(), cli.resolution)?;
    left.set_mass(10.0);
    left.set_position(Point3::new(-spacing, 0.0, 0.0));
    left.set_velocity(Vector3::new(max_dimension * 0.8, 0.0, 0.0));

    let mut right = CollisionObject::from_mesh(mesh.clone(), cli.resolution)?;
    right.set_mass(15.0);
    right.set_position(Point3::new(spacing, 0.0, 0.0));
    right.set_velocity(Vector3::new(-max_dimension * 0.6, 0.0, 0.0));
    right.set_scale(Vector3::new(2.0, 2.0, 2.0));

    // A flattened static platform above the collision course.
    let mut platform = CollisionObject::from_mesh(mesh, cli.resolution)?;
    platform.set_mass(0.0);
    platform.set_position(Point3::new(0.0, max_dimension * 0.5, 0.0));
    platform.set_scale(Vector3::new(2.0, 0.5, 2.0));

    info!(
        spacing,
        max_dimension,
        bounds_min = format_args!("({:.3}, {:.3}, {:.3})", bounds.min.x, bounds.min.y, bounds.min.z),
        bounds_max = format_args!("({:.3}, {:.3}, {:.3})", bounds.max.x, bounds.max.y, bounds.max.z),
        "scene configured: two dynamic objects, one static platform"
    );

    let mut sim = Simulation::new(bounds);
    sim.add_object(left);
    sim.add_object(right);
    sim.add_object(platform);

    sim_cli::drive(&mut sim, MAX_DT, cli.steps);
    Ok(())
}
