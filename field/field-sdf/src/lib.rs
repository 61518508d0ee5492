//! Signed distance field construction and sampling for triangle meshes.
//!
//! The pipeline has three layers:
//!
//! 1. [`query`]: closest-point-on-triangle and Möller–Trumbore ray tests
//! 2. [`Bvh`]: a median-split bounding volume hierarchy serving both
//!    nearest-triangle and ray-crossing-count queries
//! 3. [`SignedDistanceGrid`]: a uniform voxel grid of signed distances
//!    built once per mesh and sampled with trilinear interpolation at
//!    runtime
//!
//! The sign convention is the usual one: negative inside the surface,
//! positive outside, determined during the build by ray parity (a point is
//! inside a closed manifold iff a fixed-direction ray crosses the surface an
//! odd number of times).
//!
//! # Example
//!
//! ```
//! use field_types::generators::uv_sphere;
//! use field_sdf::SignedDistanceGrid;
//! use nalgebra::Point3;
//!
//! let sphere = uv_sphere(1.0, 8, 12);
//! let grid = SignedDistanceGrid::build(&sphere, 24).unwrap();
//!
//! assert!(grid.sample(&Point3::origin()) < 0.0);
//! assert!(grid.sample(&Point3::new(1.1, 0.0, 0.0)) > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod grid;
pub mod query;

pub use bvh::Bvh;
pub use error::{SdfError, SdfResult};
pub use grid::SignedDistanceGrid;
