//! Geometric core types for the fieldbox simulator.
//!
//! This crate holds the primitives everything else is built on:
//!
//! - [`Triangle`]: three vertices plus a cached unit normal
//! - [`Aabb`]: axis-aligned bounding box with the spatial queries the
//!   collision pipeline needs (overlap, ray-slab, point distance)
//! - [`TriangleMesh`]: an indexed triangle list with bounds
//! - [`generators`]: analytic meshes (sphere, cuboid) for tests and demos
//!
//! All coordinates are `f64` via [`nalgebra`].
//!
//! # Example
//!
//! ```
//! use field_types::{generators, Aabb};
//!
//! let sphere = generators::uv_sphere(1.0, 8, 12);
//! let bounds = sphere.bounds();
//! assert!(bounds.contains(&nalgebra::Point3::origin()));
//! assert!(bounds.diagonal() > 3.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
pub mod generators;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use mesh::TriangleMesh;
pub use triangle::Triangle;

pub use nalgebra::{Point3, Vector3};
