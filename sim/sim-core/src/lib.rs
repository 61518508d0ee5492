//! Rigid-body and particle simulation core with SDF mesh collision.
//!
//! The centre of the crate is [`Simulation`]: a fixed containment box, a
//! [`ParticleSystem`], and a list of [`CollisionObject`]s. Each object wraps
//! a triangle mesh and a [`field_sdf::SignedDistanceGrid`] built once in the
//! object's local frame; at runtime the simulation asks "how deep is this
//! world-space point inside that object, and which way is out?" and resolves
//! the answers with momentum-conserving impulses.
//!
//! One call to [`Simulation::update`] runs a tick: integrate objects, bounce
//! them off the walls, resolve object pairs, integrate particles, bounce
//! them off the walls, resolve particles against objects, in that order.
//! Everything is synchronous and single-threaded; the caller owns the
//! simulation exclusively for the duration of the call, and with a seeded
//! RNG the whole run is deterministic.
//!
//! # Example
//!
//! ```
//! use field_types::Aabb;
//! use nalgebra::Point3;
//! use rand::SeedableRng;
//! use sim_core::Simulation;
//!
//! let bounds = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
//! let mut sim = Simulation::new(bounds);
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! sim.scatter_particles(&mut rng, 20, 1.0, 0.05);
//!
//! for _ in 0..100 {
//!     sim.update(1.0 / 120.0);
//! }
//! assert_eq!(sim.particles().len(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod object;
mod particle;
mod response;
mod simulation;

pub use error::{SimError, SimResult};
pub use object::CollisionObject;
pub use particle::{Particle, ParticleSystem};
pub use response::{reflect, resolve_impulse, Body};
pub use simulation::Simulation;
