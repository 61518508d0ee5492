//! Shared plumbing for the demo binaries.
//!
//! The renderer of the original demos is out of scope here; the binaries
//! drive the simulation core headless for a fixed number of steps and
//! report state through `tracing`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use clap::error::ErrorKind;
use clap::Parser;
use sim_core::Simulation;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` and defaulting to
/// `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Parse CLI arguments, exiting with status 1 on invalid input (help and
/// version still exit 0).
#[must_use]
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

/// Step the simulation `steps` times at a fixed `dt`, logging progress
/// roughly ten times over the run.
pub fn drive(sim: &mut Simulation, dt: f64, steps: usize) {
    let report_every = (steps / 10).max(1);
    for step in 0..steps {
        sim.update(dt);
        if (step + 1) % report_every == 0 {
            log_state(sim);
        }
    }
    info!(
        time = sim.time(),
        steps = sim.step_count(),
        "simulation run complete"
    );
}

fn log_state(sim: &Simulation) {
    for (index, object) in sim.objects().iter().enumerate() {
        let p = object.position();
        let v = object.velocity();
        info!(
            index,
            position = format_args!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z),
            velocity = format_args!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
            "object state"
        );
    }
    if !sim.particles().is_empty() {
        let kinetic: f64 = sim
            .particles()
            .iter()
            .map(|p| 0.5 * p.mass() * p.velocity.norm_squared())
            .sum();
        info!(
            time = format_args!("{:.2}", sim.time()),
            particles = sim.particles().len(),
            kinetic_energy = format_args!("{kinetic:.4}"),
            "particle state"
        );
    }
}
